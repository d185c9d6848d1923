use ethnum::{I256, U256};
use minicbor::{Decode, Encode};

use crate::{
    balances::types::AccountId, libraries::balance_delta::BalanceDelta, plugin::PluginConfig,
};

#[derive(Encode, Decode, Clone, Debug, Default, Eq, PartialEq)]
pub struct GlobalState {
    #[cbor(n(0), with = "crate::cbor::u256")]
    pub sqrt_price_x96: U256, // Current price in Q64.96 format, zero until initialized
    #[n(1)]
    pub tick: i32, // Greatest tick whose price is at or below the current price
    #[n(2)]
    pub fee: u16, // Active fee in hundredths of a basis point
    #[n(3)]
    pub community_fee: u16, // Per-mille share of every fee kept for the community
    #[n(4)]
    pub plugin_config: PluginConfig,
    #[n(5)]
    pub tick_spacing: i32,
    #[cbor(n(6), with = "crate::cbor::u128")]
    pub liquidity: u128, // In-range liquidity
    #[cbor(n(7), with = "crate::cbor::u256")]
    pub fee_growth_global_0_x128: U256,
    #[cbor(n(8), with = "crate::cbor::u256")]
    pub fee_growth_global_1_x128: U256,
    #[cbor(n(9), with = "crate::cbor::u128")]
    pub reserve0: u128,
    #[cbor(n(10), with = "crate::cbor::u128")]
    pub reserve1: u128,
    #[cbor(n(11), with = "crate::cbor::u128")]
    pub community_fee_pending0: u128,
    #[cbor(n(12), with = "crate::cbor::u128")]
    pub community_fee_pending1: u128,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintParams {
    /// Receives whatever the payment callback delivered beyond the final amounts.
    pub leftovers_recipient: AccountId,
    /// Owner of the position.
    pub recipient: AccountId,
    pub bottom_tick: i32,
    pub top_tick: i32,
    pub liquidity_desired: u128,
    pub data: Vec<u8>,
}

impl MintParams {
    /// One-sided liquidity on a single tick, owned and refunded to `owner`.
    pub fn single_tick(owner: AccountId, tick: i32, liquidity_desired: u128) -> Self {
        Self {
            leftovers_recipient: owner,
            recipient: owner,
            bottom_tick: tick,
            top_tick: tick + 1,
            liquidity_desired,
            data: vec![],
        }
    }

    pub fn is_single_tick(&self) -> bool {
        self.top_tick.checked_sub(self.bottom_tick) == Some(1)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintResult {
    pub amount0: U256,
    pub amount1: U256,
    pub liquidity_actual: u128,
}

/// A liquidity change of one position, as seen by the position hooks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifyPositionParams {
    pub owner: AccountId,
    pub bottom_tick: i32,
    pub top_tick: i32,
    pub liquidity_delta: i128,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapParams {
    pub recipient: AccountId,
    pub zero_for_one: bool,
    /// Positive for exact input, negative for exact output.
    pub amount_required: I256,
    /// Price the swap may not cross. `None` allows the whole range.
    pub limit_sqrt_price: Option<U256>,
    pub data: Vec<u8>,
}

/// Outcome of a swap, handed to the after-swap hook.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapSummary {
    pub delta: BalanceDelta,
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub liquidity: u128,
    pub crossed_ticks: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlashParams {
    pub recipient: AccountId,
    pub amount0: U256,
    pub amount1: U256,
    pub data: Vec<u8>,
}
