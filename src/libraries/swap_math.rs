use ethnum::{I256, U256};

use super::{
    amount_delta::{AmountDeltaError, token0_delta, token1_delta},
    constants::FEE_DENOMINATOR,
    full_math::{FullMathError, mul_div, mul_div_rounding_up},
    sqrt_price_math::{SqrtPriceMathError, price_after_input, price_after_output},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputeSwapError {
    #[error("fee must be below 1000000")]
    InvalidFee,
    #[error(transparent)]
    PriceMath(#[from] SqrtPriceMathError),
    #[error(transparent)]
    AmountDelta(#[from] AmountDeltaError),
    #[error(transparent)]
    FullMath(#[from] FullMathError),
}

/// Result of moving the price within a single step of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next_x96: U256,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
}

/// Price the current step moves towards: the next initialized tick's price,
/// unless the price limit is closer.
pub fn target_price(zero_for_one: bool, sqrt_price_next_x96: U256, limit_sqrt_price_x96: U256) -> U256 {
    if zero_for_one {
        sqrt_price_next_x96.max(limit_sqrt_price_x96)
    } else {
        sqrt_price_next_x96.min(limit_sqrt_price_x96)
    }
}

/// Moves the price from `current` towards `target` at constant liquidity.
///
/// `amount_remaining` is positive for exact input and negative for exact
/// output. The trade direction follows from the relative position of the two
/// prices. With exact input the step consumes either the whole remaining
/// amount (fee included) or exactly what is needed to reach the target; with
/// exact output it produces either the whole remaining amount or everything
/// available before the target.
///
/// Zero liquidity moves the price straight to the target for free.
pub fn move_price_towards_target(
    current_sqrt_price_x96: U256,
    target_sqrt_price_x96: U256,
    liquidity: u128,
    amount_remaining: I256,
    fee: u32,
) -> Result<SwapStep, ComputeSwapError> {
    if fee >= FEE_DENOMINATOR {
        return Err(ComputeSwapError::InvalidFee);
    }
    let zero_for_one = current_sqrt_price_x96 >= target_sqrt_price_x96;
    let exact_input = amount_remaining >= I256::ZERO;
    let fee_complement = U256::from(FEE_DENOMINATOR - fee);

    // amount of the input token needed to reach the target, rounded up
    let input_to_target = |liquidity: u128| -> Result<U256, AmountDeltaError> {
        if zero_for_one {
            token0_delta(target_sqrt_price_x96, current_sqrt_price_x96, liquidity, true)
        } else {
            token1_delta(current_sqrt_price_x96, target_sqrt_price_x96, liquidity, true)
        }
    };
    // amount of the output token released by a move to `next`, rounded down
    let output_to = |next: U256, liquidity: u128| -> Result<U256, AmountDeltaError> {
        if zero_for_one {
            token1_delta(next, current_sqrt_price_x96, liquidity, false)
        } else {
            token0_delta(current_sqrt_price_x96, next, liquidity, false)
        }
    };

    if liquidity == 0 {
        return Ok(SwapStep {
            sqrt_price_next_x96: target_sqrt_price_x96,
            amount_in: U256::ZERO,
            amount_out: U256::ZERO,
            fee_amount: U256::ZERO,
        });
    }

    if exact_input {
        let amount_available = amount_remaining.as_u256();
        let amount_available_less_fee =
            mul_div(amount_available, fee_complement, U256::from(FEE_DENOMINATOR))?;
        let amount_in = input_to_target(liquidity)?;

        if amount_available_less_fee >= amount_in {
            let fee_amount = mul_div_rounding_up(amount_in, U256::from(fee), fee_complement)?;
            Ok(SwapStep {
                sqrt_price_next_x96: target_sqrt_price_x96,
                amount_in,
                amount_out: output_to(target_sqrt_price_x96, liquidity)?,
                fee_amount,
            })
        } else {
            let sqrt_price_next_x96 = price_after_input(
                current_sqrt_price_x96,
                liquidity,
                amount_available_less_fee,
                zero_for_one,
            )?;
            Ok(SwapStep {
                sqrt_price_next_x96,
                amount_in: amount_available_less_fee,
                amount_out: output_to(sqrt_price_next_x96, liquidity)?,
                fee_amount: amount_available - amount_available_less_fee,
            })
        }
    } else {
        let amount_wanted = amount_remaining.wrapping_neg().as_u256();
        let amount_out_to_target = output_to(target_sqrt_price_x96, liquidity)?;

        let (sqrt_price_next_x96, amount_out) = if amount_wanted >= amount_out_to_target {
            (target_sqrt_price_x96, amount_out_to_target)
        } else {
            let next = price_after_output(
                current_sqrt_price_x96,
                liquidity,
                amount_wanted,
                zero_for_one,
            )?;
            (next, amount_wanted)
        };

        let amount_in = if zero_for_one {
            token0_delta(sqrt_price_next_x96, current_sqrt_price_x96, liquidity, true)?
        } else {
            token1_delta(current_sqrt_price_x96, sqrt_price_next_x96, liquidity, true)?
        };
        let fee_amount = mul_div_rounding_up(amount_in, U256::from(fee), fee_complement)?;

        Ok(SwapStep {
            sqrt_price_next_x96,
            amount_in,
            amount_out,
            fee_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQRT_PRICE_1_1: U256 = U256::new(79228162514264337593543950336);
    const SQRT_PRICE_1_4: U256 = U256::new(39614081257132168796771975168);
    const SQRT_PRICE_101_100: U256 = U256::new(79623317895830914510639640423);
    const SQRT_PRICE_1000_100: U256 = U256::new(250541448375047931186413801569);
    const SQRT_PRICE_10000_100: U256 = U256::new(792281625142643375935439503360);
    const ONE_ETHER: i128 = 1_000_000_000_000_000_000;

    #[test]
    fn target_is_the_closer_of_next_and_limit() {
        let thousand = U256::new(1000);
        let below = SQRT_PRICE_1_1 - thousand;
        let above = SQRT_PRICE_1_1 + thousand;
        assert_eq!(target_price(true, below, SQRT_PRICE_1_1), SQRT_PRICE_1_1);
        assert_eq!(target_price(true, above, SQRT_PRICE_1_1), above);
        assert_eq!(target_price(false, above, SQRT_PRICE_1_1), SQRT_PRICE_1_1);
        assert_eq!(target_price(false, below, SQRT_PRICE_1_1), below);
    }

    #[test]
    fn exact_input_capped_at_price_target() {
        let liquidity = 2 * ONE_ETHER as u128;
        let amount = I256::new(ONE_ETHER);
        let step =
            move_price_towards_target(SQRT_PRICE_1_1, SQRT_PRICE_101_100, liquidity, amount, 600)
                .unwrap();

        assert_eq!(step.amount_in, U256::new(9975124224178055));
        assert_eq!(step.amount_out, U256::new(9925619580021728));
        assert_eq!(step.fee_amount, U256::new(5988667735148));
        assert!(step.amount_in + step.fee_amount < amount.as_u256());

        let price_after_whole_input =
            price_after_input(SQRT_PRICE_1_1, liquidity, amount.as_u256(), false).unwrap();
        assert_eq!(step.sqrt_price_next_x96, SQRT_PRICE_101_100);
        assert!(step.sqrt_price_next_x96 < price_after_whole_input);
    }

    #[test]
    fn exact_output_capped_at_price_target() {
        let liquidity = 2 * ONE_ETHER as u128;
        let amount = I256::new(-ONE_ETHER);
        let step =
            move_price_towards_target(SQRT_PRICE_1_1, SQRT_PRICE_101_100, liquidity, amount, 600)
                .unwrap();

        assert_eq!(step.amount_in, U256::new(9975124224178055));
        assert_eq!(step.amount_out, U256::new(9925619580021728));
        assert_eq!(step.fee_amount, U256::new(5988667735148));
        assert!(step.amount_out < amount.wrapping_neg().as_u256());
        assert_eq!(step.sqrt_price_next_x96, SQRT_PRICE_101_100);
    }

    #[test]
    fn exact_input_fully_spent() {
        let liquidity = 2 * ONE_ETHER as u128;
        let amount = I256::new(ONE_ETHER);
        let step =
            move_price_towards_target(SQRT_PRICE_1_1, SQRT_PRICE_1000_100, liquidity, amount, 600)
                .unwrap();

        assert_eq!(step.amount_in, U256::new(999400000000000000));
        assert_eq!(step.amount_out, U256::new(666399946655997866));
        assert_eq!(step.fee_amount, U256::new(600000000000000));
        assert_eq!(step.amount_in + step.fee_amount, amount.as_u256());

        let price_after_input_less_fee = price_after_input(
            SQRT_PRICE_1_1,
            liquidity,
            amount.as_u256() - step.fee_amount,
            false,
        )
        .unwrap();
        assert!(step.sqrt_price_next_x96 < SQRT_PRICE_1000_100);
        assert_eq!(step.sqrt_price_next_x96, price_after_input_less_fee);
    }

    #[test]
    fn exact_output_fully_received() {
        let liquidity = 2 * ONE_ETHER as u128;
        let amount = I256::new(-ONE_ETHER);
        let step = move_price_towards_target(
            SQRT_PRICE_1_1,
            SQRT_PRICE_10000_100,
            liquidity,
            amount,
            600,
        )
        .unwrap();

        assert_eq!(step.amount_in, U256::new(2000000000000000000));
        assert_eq!(step.fee_amount, U256::new(1200720432259356));
        assert_eq!(step.amount_out, amount.wrapping_neg().as_u256());

        let price_after_whole_output =
            price_after_output(SQRT_PRICE_1_1, liquidity, amount.wrapping_neg().as_u256(), false).unwrap();
        assert!(step.sqrt_price_next_x96 < SQRT_PRICE_10000_100);
        assert_eq!(step.sqrt_price_next_x96, price_after_whole_output);
    }

    #[test]
    fn amount_out_capped_at_desired_amount_out() {
        let step = move_price_towards_target(
            U256::new(417332158212080721273783715441582),
            U256::new(1452870262520218020823638996),
            159344665391607089467575320103,
            I256::new(-1),
            1,
        )
        .unwrap();

        assert_eq!(step.amount_in, U256::ONE);
        assert_eq!(step.fee_amount, U256::ONE);
        assert_eq!(step.amount_out, U256::ONE);
        assert_eq!(step.sqrt_price_next_x96, U256::new(417332158212080721273783715441581));
    }

    #[test]
    fn target_price_of_one_uses_partial_input_amount() {
        let amount = 3915081100057732413702495386755767u128;
        let step = move_price_towards_target(
            U256::new(2),
            U256::ONE,
            1,
            I256::new(amount as i128),
            1,
        )
        .unwrap();

        assert_eq!(step.amount_in, SQRT_PRICE_1_4);
        assert_eq!(step.fee_amount, U256::new(39614120871253040049813));
        assert!(step.amount_in + step.fee_amount <= U256::new(amount));
        assert_eq!(step.amount_out, U256::ZERO);
        assert_eq!(step.sqrt_price_next_x96, U256::ONE);
    }

    #[test]
    fn rounding_leftover_goes_to_fee() {
        let step = move_price_towards_target(
            U256::new(2413),
            U256::new(79887613182836312),
            1985041575832132834610021537970,
            I256::new(10),
            1872,
        )
        .unwrap();

        assert_eq!(step.amount_in, U256::new(9));
        assert_eq!(step.fee_amount, U256::ONE);
        assert_eq!(step.amount_out, U256::ZERO);
        assert_eq!(step.sqrt_price_next_x96, U256::new(2413));
    }

    #[test]
    fn insufficient_liquidity_exact_output_price_up() {
        let sqrt_p = U256::new(20282409603651670423947251286016);
        let target = sqrt_p * U256::new(11) / U256::new(10);
        let step = move_price_towards_target(sqrt_p, target, 1024, I256::new(-4), 3000).unwrap();

        assert_eq!(step.amount_out, U256::ZERO);
        assert_eq!(step.sqrt_price_next_x96, target);
        assert_eq!(step.amount_in, U256::new(26215));
        assert_eq!(step.fee_amount, U256::new(79));
    }

    #[test]
    fn insufficient_liquidity_exact_output_price_down() {
        let sqrt_p = U256::new(20282409603651670423947251286016);
        let target = sqrt_p * U256::new(9) / U256::new(10);
        let step =
            move_price_towards_target(sqrt_p, target, 1024, I256::new(-263000), 3000).unwrap();

        assert_eq!(step.amount_out, U256::new(26214));
        assert_eq!(step.sqrt_price_next_x96, target);
        assert_eq!(step.amount_in, U256::ONE);
        assert_eq!(step.fee_amount, U256::ONE);
    }

    #[test]
    fn zero_liquidity_jumps_to_target() {
        let step = move_price_towards_target(
            SQRT_PRICE_1_1,
            SQRT_PRICE_101_100,
            0,
            I256::new(ONE_ETHER),
            3000,
        )
        .unwrap();
        assert_eq!(step.sqrt_price_next_x96, SQRT_PRICE_101_100);
        assert_eq!(step.amount_in, U256::ZERO);
        assert_eq!(step.amount_out, U256::ZERO);
        assert_eq!(step.fee_amount, U256::ZERO);
    }

    #[test]
    fn full_fee_is_rejected() {
        assert_eq!(
            move_price_towards_target(SQRT_PRICE_1_1, SQRT_PRICE_101_100, 1, I256::ONE, FEE_DENOMINATOR),
            Err(ComputeSwapError::InvalidFee)
        );
    }
}
