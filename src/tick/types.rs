use ethnum::U256;
use minicbor::{Decode, Encode};

#[derive(Encode, Decode, Clone, Debug, Default, PartialEq, Eq)]
#[cbor(map)]
pub struct TickInfo {
    // Total liquidity of all positions referencing this tick
    #[cbor(n(0), with = "crate::cbor::u128")]
    pub liquidity_gross: u128,
    // Liquidity added when the tick is crossed left to right
    #[cbor(n(1), with = "crate::cbor::i128")]
    pub liquidity_net: i128,
    #[cbor(n(2), with = "crate::cbor::u256")]
    pub fee_growth_outside_0_x128: U256,
    #[cbor(n(3), with = "crate::cbor::u256")]
    pub fee_growth_outside_1_x128: U256,
    // Neighbours in the chain of initialized ticks
    #[n(4)]
    pub prev_tick: i32,
    #[n(5)]
    pub next_tick: i32,
}

impl TickInfo {
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }
}
