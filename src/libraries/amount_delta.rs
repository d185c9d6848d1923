use ethnum::U256;

use super::{
    constants::Q96,
    full_math::{FullMathError, div_rounding_up, mul_div, mul_div_rounding_up},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountDeltaError {
    #[error("sqrt price must be positive")]
    InvalidPrice,
    #[error("amount overflow")]
    Overflow,
}

impl From<FullMathError> for AmountDeltaError {
    fn from(_: FullMathError) -> Self {
        AmountDeltaError::Overflow
    }
}

fn sorted(a: U256, b: U256) -> (U256, U256) {
    if a > b { (b, a) } else { (a, b) }
}

/// Amount of token0 between two prices at constant liquidity:
/// L * (sqrt(upper) - sqrt(lower)) / (sqrt(upper) * sqrt(lower))
pub fn token0_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, AmountDeltaError> {
    let (lower, upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);
    if lower == U256::ZERO {
        return Err(AmountDeltaError::InvalidPrice);
    }

    let numerator1: U256 = U256::from(liquidity) << 96;
    let numerator2 = upper - lower;

    if round_up {
        Ok(div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, upper)?,
            lower,
        ))
    } else {
        Ok(mul_div(numerator1, numerator2, upper)? / lower)
    }
}

/// Amount of token1 between two prices at constant liquidity:
/// L * (sqrt(upper) - sqrt(lower))
pub fn token1_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, AmountDeltaError> {
    let (lower, upper) = sorted(sqrt_price_a_x96, sqrt_price_b_x96);
    let liquidity = U256::from(liquidity);
    let diff = upper - lower;

    if round_up {
        Ok(mul_div_rounding_up(liquidity, diff, *Q96)?)
    } else {
        Ok(mul_div(liquidity, diff, *Q96)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;
    const SQRT_PRICE_1_1: U256 = U256::new(79228162514264337593543950336);
    const SQRT_PRICE_2_1: U256 = U256::new(112045541949572279837463876454);
    const SQRT_PRICE_121_100: U256 = U256::new(87150978765690771352898345369);

    #[test]
    fn zero_liquidity_or_equal_prices_give_zero() {
        assert_eq!(token0_delta(SQRT_PRICE_1_1, SQRT_PRICE_2_1, 0, true), Ok(U256::ZERO));
        assert_eq!(token0_delta(SQRT_PRICE_1_1, SQRT_PRICE_1_1, 1, true), Ok(U256::ZERO));
        assert_eq!(token1_delta(SQRT_PRICE_1_1, SQRT_PRICE_2_1, 0, true), Ok(U256::ZERO));
        assert_eq!(token1_delta(SQRT_PRICE_1_1, SQRT_PRICE_1_1, 1, true), Ok(U256::ZERO));
    }

    #[test]
    fn token0_rejects_zero_price() {
        assert_eq!(
            token0_delta(U256::ZERO, U256::ONE, 1, true),
            Err(AmountDeltaError::InvalidPrice)
        );
    }

    #[test]
    fn token0_for_price_1_to_1_21() {
        let up = token0_delta(SQRT_PRICE_1_1, SQRT_PRICE_121_100, ONE_ETHER, true).unwrap();
        assert_eq!(up, U256::new(90909090909090910));
        let down = token0_delta(SQRT_PRICE_1_1, SQRT_PRICE_121_100, ONE_ETHER, false).unwrap();
        assert_eq!(down, up - U256::ONE);
    }

    #[test]
    fn token1_for_price_1_to_1_21() {
        let up = token1_delta(SQRT_PRICE_1_1, SQRT_PRICE_121_100, ONE_ETHER, true).unwrap();
        assert_eq!(up, U256::new(100000000000000000));
        let down = token1_delta(SQRT_PRICE_1_1, SQRT_PRICE_121_100, ONE_ETHER, false).unwrap();
        assert_eq!(down, up - U256::ONE);
    }

    #[test]
    fn order_of_prices_does_not_matter() {
        assert_eq!(
            token0_delta(SQRT_PRICE_121_100, SQRT_PRICE_1_1, ONE_ETHER, true),
            token0_delta(SQRT_PRICE_1_1, SQRT_PRICE_121_100, ONE_ETHER, true)
        );
        assert_eq!(
            token1_delta(SQRT_PRICE_121_100, SQRT_PRICE_1_1, ONE_ETHER, false),
            token1_delta(SQRT_PRICE_1_1, SQRT_PRICE_121_100, ONE_ETHER, false)
        );
    }

    #[test]
    fn token0_for_prices_whose_product_overflows() {
        let sqrt_p_1 =
            U256::from_str_radix("2787593149816327892691964784081045188247552", 10).unwrap();
        let sqrt_p_2 =
            U256::from_str_radix("22300745198530623141535718272648361505980416", 10).unwrap();
        let up = token0_delta(sqrt_p_1, sqrt_p_2, ONE_ETHER, true).unwrap();
        let down = token0_delta(sqrt_p_1, sqrt_p_2, ONE_ETHER, false).unwrap();
        assert_eq!(up, down + U256::ONE);
    }

    #[test]
    fn token0_when_sqrt_p_times_sqrt_q_overflows() {
        let sqrt_p =
            U256::from_str_radix("1025574284609383690408304870162715216695788925244", 10).unwrap();
        let sqrt_q =
            U256::from_str_radix("1025574284609383582644711336373707553698163132913", 10).unwrap();
        let liquidity = 50_015_962_439_936_049_619_261_659_728_067_971_248u128;
        assert_eq!(token0_delta(sqrt_q, sqrt_p, liquidity, true), Ok(U256::new(406)));
    }
}
