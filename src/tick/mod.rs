use std::collections::BTreeMap;

use crate::libraries::constants::{MAX_LIQUIDITY_PER_TICK, MAX_TICK, MIN_TICK};
use crate::libraries::liquidity_math::{self, AddDeltaError};
use ethnum::U256;
use types::TickInfo;

pub mod tree;
pub mod types;


/// Derives max liquidity per tick from tick spacing.
pub const fn max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u128 + 1;
    u128::MAX / num_ticks
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickError {
    #[error("liquidity of tick {0} exceeds the per-tick cap")]
    LiquidityOverflow(i32),
    #[error(transparent)]
    Liquidity(#[from] AddDeltaError),
    #[error("liquidity net of tick {0} overflows")]
    LiquidityNetOverflow(i32),
    #[error("invalid neighbour links for tick {0}")]
    InvalidLinks(i32),
    #[error("tick {0} is not initialized")]
    NotInitialized(i32),
}

/// Arena of tick records keyed by tick, threaded by a doubly linked chain of
/// initialized ticks anchored at MIN_TICK and MAX_TICK.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickTable {
    ticks: BTreeMap<i32, TickInfo>,
}

impl TickTable {
    pub fn get(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(&tick)
    }

    pub fn get_or_default(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).cloned().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, &TickInfo)> {
        self.ticks.iter().map(|(tick, info)| (*tick, info))
    }

    /// Creates the two permanent chain anchors.
    pub fn init_boundaries(&mut self) {
        for tick in [MIN_TICK, MAX_TICK] {
            let info = self.ticks.entry(tick).or_default();
            info.prev_tick = MIN_TICK;
            info.next_tick = MAX_TICK;
        }
    }

    /// Applies a liquidity delta to the lower (`upper == false`) or upper boundary
    /// of a position. Returns whether the tick flipped between initialized and
    /// uninitialized.
    pub fn update(
        &mut self,
        tick: i32,
        current_tick: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
        upper: bool,
    ) -> Result<bool, TickError> {
        let mut info = self.get_or_default(tick);

        let liquidity_gross_before = info.liquidity_gross;
        let liquidity_gross_after =
            liquidity_math::add_delta(liquidity_gross_before, liquidity_delta)?;
        if liquidity_gross_after > MAX_LIQUIDITY_PER_TICK {
            return Err(TickError::LiquidityOverflow(tick));
        }

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        // all growth before a tick was initialized is assumed to have happened below it
        if liquidity_gross_before == 0 && tick <= current_tick {
            info.fee_growth_outside_0_x128 = fee_growth_global_0_x128;
            info.fee_growth_outside_1_x128 = fee_growth_global_1_x128;
        }

        info.liquidity_gross = liquidity_gross_after;
        info.liquidity_net = if upper {
            info.liquidity_net.checked_sub(liquidity_delta)
        } else {
            info.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(TickError::LiquidityNetOverflow(tick))?;

        self.ticks.insert(tick, info);
        Ok(flipped)
    }

    /// Moves the price across `tick`: outside growth becomes global minus
    /// outside. Returns the tick's liquidity net.
    pub fn cross(
        &mut self,
        tick: i32,
        fee_growth_global_0_x128: U256,
        fee_growth_global_1_x128: U256,
    ) -> Result<i128, TickError> {
        let info = self
            .ticks
            .get_mut(&tick)
            .ok_or(TickError::NotInitialized(tick))?;
        info.fee_growth_outside_0_x128 =
            fee_growth_global_0_x128.wrapping_sub(info.fee_growth_outside_0_x128);
        info.fee_growth_outside_1_x128 =
            fee_growth_global_1_x128.wrapping_sub(info.fee_growth_outside_1_x128);
        Ok(info.liquidity_net)
    }

    /// Drops the record of a tick no position references anymore. Anchors keep
    /// their links.
    pub fn clear(&mut self, tick: i32) {
        if tick == MIN_TICK || tick == MAX_TICK {
            if let Some(info) = self.ticks.get_mut(&tick) {
                *info = TickInfo {
                    prev_tick: info.prev_tick,
                    next_tick: info.next_tick,
                    ..TickInfo::default()
                };
            }
        } else {
            self.ticks.remove(&tick);
        }
    }

    /// Links `tick` between its neighbours `prev` and `next`, which must be
    /// adjacent in the chain.
    pub fn insert(&mut self, tick: i32, prev: i32, next: i32) -> Result<(), TickError> {
        if tick == MIN_TICK || tick == MAX_TICK {
            return Ok(());
        }
        if !(prev < tick && tick < next) {
            return Err(TickError::InvalidLinks(tick));
        }
        if !self.ticks.contains_key(&tick) {
            return Err(TickError::NotInitialized(tick));
        }
        let prev_next = self.ticks.get(&prev).map(|info| info.next_tick);
        let next_prev = self.ticks.get(&next).map(|info| info.prev_tick);
        if prev_next != Some(next) || next_prev != Some(prev) {
            return Err(TickError::InvalidLinks(tick));
        }

        if let Some(info) = self.ticks.get_mut(&prev) {
            info.next_tick = tick;
        }
        if let Some(info) = self.ticks.get_mut(&next) {
            info.prev_tick = tick;
        }
        if let Some(info) = self.ticks.get_mut(&tick) {
            info.prev_tick = prev;
            info.next_tick = next;
        }
        Ok(())
    }

    /// Unlinks `tick` from the chain, joining its neighbours.
    pub fn remove(&mut self, tick: i32) -> Result<(), TickError> {
        if tick == MIN_TICK || tick == MAX_TICK {
            return Ok(());
        }
        let info = self
            .ticks
            .get(&tick)
            .ok_or(TickError::NotInitialized(tick))?;
        let (prev, next) = (info.prev_tick, info.next_tick);
        if !(prev < tick && tick < next)
            || !self.ticks.contains_key(&prev)
            || !self.ticks.contains_key(&next)
        {
            return Err(TickError::InvalidLinks(tick));
        }

        if let Some(info) = self.ticks.get_mut(&prev) {
            info.next_tick = next;
        }
        if let Some(info) = self.ticks.get_mut(&next) {
            info.prev_tick = prev;
        }
        if let Some(info) = self.ticks.get_mut(&tick) {
            info.prev_tick = 0;
            info.next_tick = 0;
        }
        Ok(())
    }

    /// Walks the chain upwards starting at `from` (which must be linked) and
    /// stops at the first tick above `to`.
    pub fn walk(&self, from: i32, to: i32) -> ChainWalk<'_> {
        ChainWalk {
            table: self,
            cursor: Some(from),
            to,
        }
    }
}

pub struct ChainWalk<'a> {
    table: &'a TickTable,
    cursor: Option<i32>,
    to: i32,
}

impl<'a> Iterator for ChainWalk<'a> {
    type Item = (i32, &'a TickInfo);

    fn next(&mut self) -> Option<Self::Item> {
        let tick = self.cursor.take()?;
        if tick > self.to {
            return None;
        }
        let info = self.table.get(tick)?;
        if info.next_tick > tick {
            self.cursor = Some(info.next_tick);
        }
        Some((tick, info))
    }
}
