use std::collections::BTreeMap;

use ethnum::U256;
use types::{PositionInfo, PositionKey};

use crate::{
    libraries::{
        constants::Q128,
        full_math::mul_div,
        liquidity_math::{self, AddDeltaError},
        safe_cast::u256_to_u128_saturating,
    },
    tick::TickTable,
};

pub mod types;


#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("position liquidity would drop below zero")]
    LiquiditySub,
    #[error("position liquidity overflows")]
    LiquidityAdd,
}

impl From<AddDeltaError> for PositionError {
    fn from(err: AddDeltaError) -> Self {
        match err {
            AddDeltaError::Underflow => PositionError::LiquiditySub,
            AddDeltaError::Overflow => PositionError::LiquidityAdd,
        }
    }
}

/// Liquidity and collectable amounts per (owner, range).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PositionLedger {
    positions: BTreeMap<PositionKey, PositionInfo>,
}

impl PositionLedger {
    pub fn get(&self, key: &PositionKey) -> Option<&PositionInfo> {
        self.positions.get(key)
    }

    pub fn get_or_default(&self, key: &PositionKey) -> PositionInfo {
        self.positions.get(key).cloned().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &PositionInfo)> {
        self.positions.iter()
    }

    /// Credits the fees accrued since the last update, snapshots the inner
    /// fee growth and applies `liquidity_delta`.
    ///
    /// Accrued fees are `(inside - inside_last) * liquidity_before / 2^128` with
    /// a wrapping subtraction; owed amounts saturate instead of failing. An
    /// update of an empty position with a zero delta changes nothing.
    pub fn update(
        &mut self,
        key: &PositionKey,
        liquidity_delta: i128,
        fee_growth_inside_0_x128: U256,
        fee_growth_inside_1_x128: U256,
    ) -> Result<(), PositionError> {
        let mut position = self.get_or_default(key);
        if liquidity_delta == 0 && position.liquidity == 0 {
            return Ok(());
        }

        let liquidity_before = position.liquidity;
        let liquidity_after = liquidity_math::add_delta(liquidity_before, liquidity_delta)?;

        if liquidity_before > 0 {
            let owed_0 = accrued(
                fee_growth_inside_0_x128,
                position.fee_growth_inside_0_last_x128,
                liquidity_before,
            );
            let owed_1 = accrued(
                fee_growth_inside_1_x128,
                position.fee_growth_inside_1_last_x128,
                liquidity_before,
            );
            position.fees_owed_0 = position.fees_owed_0.saturating_add(owed_0);
            position.fees_owed_1 = position.fees_owed_1.saturating_add(owed_1);
        }

        position.liquidity = liquidity_after;
        position.fee_growth_inside_0_last_x128 = fee_growth_inside_0_x128;
        position.fee_growth_inside_1_last_x128 = fee_growth_inside_1_x128;
        self.store(*key, position);
        Ok(())
    }

    /// Credits burned principal. Saturates.
    pub fn add_owed(&mut self, key: &PositionKey, amount0: u128, amount1: u128) {
        if amount0 == 0 && amount1 == 0 {
            return;
        }
        let mut position = self.get_or_default(key);
        position.fees_owed_0 = position.fees_owed_0.saturating_add(amount0);
        position.fees_owed_1 = position.fees_owed_1.saturating_add(amount1);
        self.store(*key, position);
    }

    /// Takes up to the requested amounts out of what the position is owed.
    pub fn collect(&mut self, key: &PositionKey, amount0_max: u128, amount1_max: u128) -> (u128, u128) {
        let Some(mut position) = self.positions.get(key).cloned() else {
            return (0, 0);
        };
        let amount0 = position.fees_owed_0.min(amount0_max);
        let amount1 = position.fees_owed_1.min(amount1_max);
        position.fees_owed_0 -= amount0;
        position.fees_owed_1 -= amount1;
        self.store(*key, position);
        (amount0, amount1)
    }

    fn store(&mut self, key: PositionKey, position: PositionInfo) {
        if position.is_empty() {
            self.positions.remove(&key);
        } else {
            self.positions.insert(key, position);
        }
    }
}

fn accrued(inside: U256, inside_last: U256, liquidity: u128) -> u128 {
    // liquidity < 2^128 so the quotient fits 256 bits
    let owed = mul_div(inside.wrapping_sub(inside_last), U256::from(liquidity), *Q128)
        .unwrap_or(U256::MAX);
    u256_to_u128_saturating(owed)
}

/// Fee growth per unit of liquidity accrued inside `[bottom_tick, top_tick)`.
///
/// Uninitialized boundaries count as zero outside growth. All subtractions are
/// modular.
pub fn inner_fee_growth(
    ticks: &TickTable,
    bottom_tick: i32,
    top_tick: i32,
    current_tick: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> (U256, U256) {
    let bottom = ticks.get_or_default(bottom_tick);
    let top = ticks.get_or_default(top_tick);

    if current_tick < bottom_tick {
        (
            bottom
                .fee_growth_outside_0_x128
                .wrapping_sub(top.fee_growth_outside_0_x128),
            bottom
                .fee_growth_outside_1_x128
                .wrapping_sub(top.fee_growth_outside_1_x128),
        )
    } else if current_tick >= top_tick {
        (
            top.fee_growth_outside_0_x128
                .wrapping_sub(bottom.fee_growth_outside_0_x128),
            top.fee_growth_outside_1_x128
                .wrapping_sub(bottom.fee_growth_outside_1_x128),
        )
    } else {
        (
            fee_growth_global_0_x128
                .wrapping_sub(bottom.fee_growth_outside_0_x128)
                .wrapping_sub(top.fee_growth_outside_0_x128),
            fee_growth_global_1_x128
                .wrapping_sub(bottom.fee_growth_outside_1_x128)
                .wrapping_sub(top.fee_growth_outside_1_x128),
        )
    }
}
