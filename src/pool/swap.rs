use ethnum::{I256, U256};
use tracing::debug;

use crate::{
    error::PoolError,
    libraries::{
        balance_delta::BalanceDelta,
        constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO},
        fee_math::{fee_growth_delta, split_community_fee},
        liquidity_math,
        safe_cast::{u256_to_i256, u256_to_u128_saturating},
        swap_math::{SwapStep, move_price_towards_target, target_price},
        tick_math::TickMath,
    },
    logs::SWAP,
    state::State,
};

use super::types::SwapSummary;

// Tracks the state of a pool throughout a swap
#[derive(Clone, PartialEq, Eq, Debug)]
struct SwapCursor {
    // the amount still to be swapped in (positive) or out (negative)
    remaining: I256,
    // the amount of the other token swapped out (negative) or in (positive)
    calculated: I256,
    sqrt_price_x96: U256,
    tick: i32,
    liquidity: u128,
    // fee growth of the input token
    fee_growth_global_x128: U256,
    community_fee: U256,
}

/// Walks the curve from the current price until `amount_required` is used up
/// or the price reaches the limit, crossing initialized ticks on the way.
///
/// Ticks, fee growth, pending community fees, price, tick and liquidity are
/// written to `state`; moving tokens is left to the caller. Exact output swaps
/// that run out of liquidity stop at the limit and report the partial fill.
pub fn swap_inner(
    state: &mut State,
    zero_for_one: bool,
    amount_required: I256,
    limit_sqrt_price: Option<U256>,
) -> Result<SwapSummary, PoolError> {
    if amount_required == I256::ZERO {
        return Err(PoolError::ZeroAmountRequired);
    }
    if amount_required == I256::MIN {
        return Err(PoolError::InvalidAmountRequired);
    }

    let global = &state.global;
    let limit = resolve_limit(zero_for_one, limit_sqrt_price, global.sqrt_price_x96)?;
    let fee = u32::from(global.fee);
    let community_fee = global.community_fee;
    let exact_input = amount_required > I256::ZERO;

    let mut cursor = SwapCursor {
        remaining: amount_required,
        calculated: I256::ZERO,
        sqrt_price_x96: global.sqrt_price_x96,
        tick: global.tick,
        liquidity: global.liquidity,
        fee_growth_global_x128: if zero_for_one {
            global.fee_growth_global_0_x128
        } else {
            global.fee_growth_global_1_x128
        },
        community_fee: U256::ZERO,
    };
    let mut crossed_ticks = vec![];

    while cursor.remaining != I256::ZERO && cursor.sqrt_price_x96 != limit {
        let sqrt_price_start_x96 = cursor.sqrt_price_x96;
        let (tick_next, initialized) = state.tick_tree.next(cursor.tick, zero_for_one);
        let sqrt_price_next_x96 = TickMath::sqrt_price_at_tick(tick_next)?;

        let step = move_price_towards_target(
            cursor.sqrt_price_x96,
            target_price(zero_for_one, sqrt_price_next_x96, limit),
            cursor.liquidity,
            cursor.remaining,
            fee,
        )?;
        cursor.sqrt_price_x96 = step.sqrt_price_next_x96;
        update_amounts(exact_input, &mut cursor, &step)?;

        let (lp_fee, community) = split_community_fee(step.fee_amount, community_fee);
        cursor.community_fee = cursor.community_fee.saturating_add(community);
        // with no liquidity in range the fee is zero and nobody accrues it
        if cursor.liquidity > 0 {
            cursor.fee_growth_global_x128 = cursor
                .fee_growth_global_x128
                .wrapping_add(fee_growth_delta(lp_fee, cursor.liquidity)?);
        }

        if cursor.sqrt_price_x96 == sqrt_price_next_x96 {
            if initialized {
                let (fee_growth_0, fee_growth_1) = if zero_for_one {
                    (
                        cursor.fee_growth_global_x128,
                        state.global.fee_growth_global_1_x128,
                    )
                } else {
                    (
                        state.global.fee_growth_global_0_x128,
                        cursor.fee_growth_global_x128,
                    )
                };
                let mut liquidity_net = state.ticks.cross(tick_next, fee_growth_0, fee_growth_1)?;
                // moving leftward the net liquidity applies with the opposite sign
                if zero_for_one {
                    liquidity_net = liquidity_net
                        .checked_neg()
                        .ok_or(PoolError::LiquidityNetOverflow(tick_next))?;
                }
                cursor.liquidity = liquidity_math::add_delta(cursor.liquidity, liquidity_net)?;
                crossed_ticks.push(tick_next);
                debug!(target: SWAP, tick = tick_next, liquidity = cursor.liquidity, "[swap]: crossed tick");
            }
            cursor.tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if cursor.sqrt_price_x96 != sqrt_price_start_x96 {
            cursor.tick = TickMath::tick_at_sqrt_price(cursor.sqrt_price_x96)?;
        }
    }

    let delta = compute_swap_delta(
        zero_for_one,
        exact_input,
        amount_required,
        cursor.remaining,
        cursor.calculated,
    );

    let global = &mut state.global;
    global.sqrt_price_x96 = cursor.sqrt_price_x96;
    global.tick = cursor.tick;
    global.liquidity = cursor.liquidity;
    let community = u256_to_u128_saturating(cursor.community_fee);
    if zero_for_one {
        global.fee_growth_global_0_x128 = cursor.fee_growth_global_x128;
        global.community_fee_pending0 = global.community_fee_pending0.saturating_add(community);
    } else {
        global.fee_growth_global_1_x128 = cursor.fee_growth_global_x128;
        global.community_fee_pending1 = global.community_fee_pending1.saturating_add(community);
    }

    Ok(SwapSummary {
        delta,
        sqrt_price_x96: cursor.sqrt_price_x96,
        tick: cursor.tick,
        liquidity: cursor.liquidity,
        crossed_ticks,
    })
}

/// Checks the price limit against the current price and the global bounds. A
/// missing limit is the most extreme allowed one.
pub fn resolve_limit(
    zero_for_one: bool,
    limit_sqrt_price: Option<U256>,
    sqrt_price_current_x96: U256,
) -> Result<U256, PoolError> {
    let limit = limit_sqrt_price.unwrap_or(if zero_for_one {
        *MIN_SQRT_RATIO + U256::ONE
    } else {
        *MAX_SQRT_RATIO - U256::ONE
    });
    let valid = if zero_for_one {
        *MIN_SQRT_RATIO < limit && limit < sqrt_price_current_x96
    } else {
        sqrt_price_current_x96 < limit && limit < *MAX_SQRT_RATIO
    };
    if valid {
        Ok(limit)
    } else {
        Err(PoolError::InvalidLimitSqrtPrice)
    }
}

fn to_i256(value: U256) -> Result<I256, PoolError> {
    u256_to_i256(value).map_err(|_| PoolError::AmountOverflow(value))
}

fn update_amounts(exact_input: bool, cursor: &mut SwapCursor, step: &SwapStep) -> Result<(), PoolError> {
    let paid = step
        .amount_in
        .checked_add(step.fee_amount)
        .ok_or(PoolError::AmountOverflow(step.amount_in))?;
    let paid = to_i256(paid)?;
    let amount_out = to_i256(step.amount_out)?;

    let overflow = || PoolError::InvalidAmountRequired;
    if exact_input {
        cursor.remaining = cursor.remaining.checked_sub(paid).ok_or_else(overflow)?;
        cursor.calculated = cursor.calculated.checked_sub(amount_out).ok_or_else(overflow)?;
    } else {
        cursor.remaining = cursor.remaining.checked_add(amount_out).ok_or_else(overflow)?;
        cursor.calculated = cursor.calculated.checked_add(paid).ok_or_else(overflow)?;
    }
    Ok(())
}

/// Token amounts of the swap seen from the pool: the specified token gets what
/// was actually used of `amount_required`, the other one the calculated side.
fn compute_swap_delta(
    zero_for_one: bool,
    exact_input: bool,
    amount_required: I256,
    remaining: I256,
    calculated: I256,
) -> BalanceDelta {
    let specified = amount_required - remaining;
    if zero_for_one == exact_input {
        BalanceDelta::new(specified, calculated)
    } else {
        BalanceDelta::new(calculated, specified)
    }
}
