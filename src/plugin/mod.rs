//! Extension hooks.
//!
//! A pool holds at most one plugin. Which hooks are dispatched is decided by
//! the pool's [`PluginConfig`] mask, and every dispatched hook must answer with
//! its own [`Selector`] or the whole operation aborts.

use std::fmt;

use ethnum::U256;
use minicbor::{Decode, Encode};

use crate::{
    balances::types::AccountId,
    libraries::balance_delta::BalanceDelta,
    pool::types::{FlashParams, GlobalState, ModifyPositionParams, SwapParams, SwapSummary},
};


/// Hook mask of a pool.
#[derive(Encode, Decode, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PluginConfig(#[n(0)] pub u8);

impl PluginConfig {
    pub const BEFORE_SWAP: u8 = 1;
    pub const AFTER_SWAP: u8 = 1 << 1;
    pub const BEFORE_POSITION_MODIFY: u8 = 1 << 2;
    pub const AFTER_POSITION_MODIFY: u8 = 1 << 3;
    pub const BEFORE_FLASH: u8 = 1 << 4;
    pub const AFTER_FLASH: u8 = 1 << 5;
    pub const AFTER_INIT: u8 = 1 << 6;
    pub const DYNAMIC_FEE: u8 = 1 << 7;

    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn dynamic_fee(self) -> bool {
        self.has(Self::DYNAMIC_FEE)
    }
}

/// Acknowledgement a hook returns to prove it handled the call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selector(pub [u8; 4]);

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({self})")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    AfterInitialize,
    BeforeModifyPosition,
    AfterModifyPosition,
    BeforeSwap,
    AfterSwap,
    BeforeFlash,
    AfterFlash,
}

impl HookKind {
    pub fn flag(self) -> u8 {
        match self {
            HookKind::AfterInitialize => PluginConfig::AFTER_INIT,
            HookKind::BeforeModifyPosition => PluginConfig::BEFORE_POSITION_MODIFY,
            HookKind::AfterModifyPosition => PluginConfig::AFTER_POSITION_MODIFY,
            HookKind::BeforeSwap => PluginConfig::BEFORE_SWAP,
            HookKind::AfterSwap => PluginConfig::AFTER_SWAP,
            HookKind::BeforeFlash => PluginConfig::BEFORE_FLASH,
            HookKind::AfterFlash => PluginConfig::AFTER_FLASH,
        }
    }

    pub fn selector(self) -> Selector {
        Selector(match self {
            HookKind::AfterInitialize => [0x82, 0xdd, 0x64, 0x22],
            HookKind::BeforeModifyPosition => [0x5e, 0x2a, 0xda, 0xb1],
            HookKind::AfterModifyPosition => [0xd6, 0xcb, 0x8c, 0x6a],
            HookKind::BeforeSwap => [0x02, 0x9c, 0x1c, 0xb7],
            HookKind::AfterSwap => [0x9c, 0xb5, 0xa9, 0x63],
            HookKind::BeforeFlash => [0x8d, 0xe0, 0xa8, 0xee],
            HookKind::AfterFlash => [0x34, 0x3d, 0x37, 0xff],
        })
    }

    /// Only these hooks may replace the active fee, and only while the
    /// dynamic fee flag is set.
    pub fn may_override_fee(self) -> bool {
        matches!(self, HookKind::AfterInitialize | HookKind::BeforeSwap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PluginError(pub String);

/// What a hook sees of the pool: the global state as of the call and a slot
/// for a fee override.
pub struct HookContext<'a> {
    global: &'a GlobalState,
    fee_override: Option<u16>,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(global: &'a GlobalState) -> Self {
        Self {
            global,
            fee_override: None,
        }
    }

    pub fn global_state(&self) -> &GlobalState {
        self.global
    }

    /// Requests a new active fee. Honoured only from hooks that may override
    /// the fee, otherwise the operation aborts.
    pub fn set_fee(&mut self, fee: u16) {
        self.fee_override = Some(fee);
    }

    pub(crate) fn fee_override(&self) -> Option<u16> {
        self.fee_override
    }
}

pub type HookResult = Result<Selector, PluginError>;

/// An extension attached to a pool. Every hook defaults to a plain
/// acknowledgement.
pub trait Plugin {
    /// Identity used for the Plugin event and the unchanged check.
    fn address(&self) -> AccountId;

    fn after_initialize(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _sqrt_price_x96: U256,
        _tick: i32,
    ) -> HookResult {
        Ok(HookKind::AfterInitialize.selector())
    }

    fn before_modify_position(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _sender: AccountId,
        _params: &ModifyPositionParams,
    ) -> HookResult {
        Ok(HookKind::BeforeModifyPosition.selector())
    }

    fn after_modify_position(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _sender: AccountId,
        _params: &ModifyPositionParams,
        _delta: BalanceDelta,
    ) -> HookResult {
        Ok(HookKind::AfterModifyPosition.selector())
    }

    fn before_swap(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _sender: AccountId,
        _params: &SwapParams,
    ) -> HookResult {
        Ok(HookKind::BeforeSwap.selector())
    }

    fn after_swap(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _sender: AccountId,
        _params: &SwapParams,
        _summary: &SwapSummary,
    ) -> HookResult {
        Ok(HookKind::AfterSwap.selector())
    }

    fn before_flash(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _sender: AccountId,
        _params: &FlashParams,
    ) -> HookResult {
        Ok(HookKind::BeforeFlash.selector())
    }

    fn after_flash(
        &mut self,
        _ctx: &mut HookContext<'_>,
        _sender: AccountId,
        _params: &FlashParams,
        _paid0: U256,
        _paid1: U256,
    ) -> HookResult {
        Ok(HookKind::AfterFlash.selector())
    }
}
