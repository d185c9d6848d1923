use ethnum::U256;

use crate::{
    error::PoolError,
    libraries::{
        amount_delta::{token0_delta, token1_delta},
        constants::MIN_TICK,
        liquidity_math,
        tick_math::TickMath,
    },
    position::{inner_fee_growth, types::PositionKey},
    state::State,
};

use super::types::{GlobalState, ModifyPositionParams};

/// Applies a liquidity change to a position, its two boundary ticks, the tick
/// index and, when the range holds the current tick, the in-range liquidity.
///
/// Returns the token amounts backing the change: rounded up when liquidity is
/// added (owed to the pool), rounded down when it is removed (owed to the
/// owner).
pub fn modify_position(
    state: &mut State,
    params: &ModifyPositionParams,
) -> Result<(U256, U256), PoolError> {
    let ModifyPositionParams {
        owner,
        bottom_tick,
        top_tick,
        liquidity_delta,
    } = *params;
    let key = PositionKey {
        owner,
        bottom_tick,
        top_tick,
    };
    let current_tick = state.global.tick;
    let fee_growth_global_0_x128 = state.global.fee_growth_global_0_x128;
    let fee_growth_global_1_x128 = state.global.fee_growth_global_1_x128;

    let mut flipped = vec![];
    if liquidity_delta != 0 {
        for (tick, upper) in [(bottom_tick, false), (top_tick, true)] {
            if state.ticks.update(
                tick,
                current_tick,
                liquidity_delta,
                fee_growth_global_0_x128,
                fee_growth_global_1_x128,
                upper,
            )? {
                flipped.push(tick);
            }
        }
        if liquidity_delta > 0 {
            for tick in &flipped {
                link_tick(state, *tick)?;
            }
        }
    }

    let (fee_growth_inside_0_x128, fee_growth_inside_1_x128) = inner_fee_growth(
        &state.ticks,
        bottom_tick,
        top_tick,
        current_tick,
        fee_growth_global_0_x128,
        fee_growth_global_1_x128,
    );
    state.positions.update(
        &key,
        liquidity_delta,
        fee_growth_inside_0_x128,
        fee_growth_inside_1_x128,
    )?;

    if liquidity_delta < 0 {
        for tick in &flipped {
            state.tick_tree.toggle(*tick)?;
            state.ticks.remove(*tick)?;
            state.ticks.clear(*tick);
        }
    }

    if liquidity_delta == 0 {
        return Ok((U256::ZERO, U256::ZERO));
    }

    if bottom_tick <= current_tick && current_tick < top_tick {
        state.global.liquidity = liquidity_math::add_delta(state.global.liquidity, liquidity_delta)?;
    }
    amounts_for_liquidity(
        &state.global,
        bottom_tick,
        top_tick,
        liquidity_delta.unsigned_abs(),
        liquidity_delta > 0,
    )
}

/// Marks a freshly initialized tick in the tick index and links it behind the
/// closest initialized tick below it.
fn link_tick(state: &mut State, tick: i32) -> Result<(), PoolError> {
    state.tick_tree.toggle(tick)?;
    if tick == MIN_TICK {
        return Ok(());
    }
    let prev = match state.tick_tree.next(tick - 1, true) {
        (prev, true) => prev,
        (_, false) => MIN_TICK,
    };
    let next = state
        .ticks
        .get(prev)
        .map(|info| info.next_tick)
        .ok_or(PoolError::TickIsNotInitialized(prev))?;
    state.ticks.insert(tick, prev, next)?;
    Ok(())
}

/// Token amounts `liquidity` represents over `[bottom_tick, top_tick)` at the
/// current price.
pub fn amounts_for_liquidity(
    global: &GlobalState,
    bottom_tick: i32,
    top_tick: i32,
    liquidity: u128,
    round_up: bool,
) -> Result<(U256, U256), PoolError> {
    let price_bottom = TickMath::sqrt_price_at_tick(bottom_tick)?;
    let price_top = TickMath::sqrt_price_at_tick(top_tick)?;

    if global.tick < bottom_tick {
        // range above the price, only token0
        Ok((
            token0_delta(price_bottom, price_top, liquidity, round_up)?,
            U256::ZERO,
        ))
    } else if global.tick < top_tick {
        Ok((
            token0_delta(global.sqrt_price_x96, price_top, liquidity, round_up)?,
            token1_delta(price_bottom, global.sqrt_price_x96, liquidity, round_up)?,
        ))
    } else {
        Ok((
            U256::ZERO,
            token1_delta(price_bottom, price_top, liquidity, round_up)?,
        ))
    }
}
