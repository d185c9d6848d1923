use ethnum::U256;
use minicbor::{Decode, Encode};

use crate::balances::types::AccountId;

#[derive(Encode, Decode, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey {
    #[n(0)]
    pub owner: AccountId,
    #[n(1)]
    pub bottom_tick: i32,
    #[n(2)]
    pub top_tick: i32,
}

impl PositionKey {
    /// Key of a one-sided position on `tick`, stored as the one tick wide
    /// range above it.
    pub fn single_tick(owner: AccountId, tick: i32) -> Self {
        Self {
            owner,
            bottom_tick: tick,
            top_tick: tick + 1,
        }
    }
}

#[derive(Encode, Decode, Clone, PartialEq, Eq, Debug, Default)]
pub struct PositionInfo {
    #[cbor(n(0), with = "crate::cbor::u128")]
    pub liquidity: u128,
    // Fee growth inside the range at the last update
    #[cbor(n(1), with = "crate::cbor::u256")]
    pub fee_growth_inside_0_last_x128: U256,
    #[cbor(n(2), with = "crate::cbor::u256")]
    pub fee_growth_inside_1_last_x128: U256,
    // Collectable amounts: accrued fees plus burned principal
    #[cbor(n(3), with = "crate::cbor::u128")]
    pub fees_owed_0: u128,
    #[cbor(n(4), with = "crate::cbor::u128")]
    pub fees_owed_1: u128,
}

impl PositionInfo {
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.fees_owed_0 == 0 && self.fees_owed_1 == 0
    }
}
