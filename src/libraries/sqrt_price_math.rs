use ethnum::U256;

use super::{
    constants::{Q96, U160_MAX},
    full_math::{FullMathError, div_rounding_up, mul_div, mul_div_rounding_up},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SqrtPriceMathError {
    #[error("price does not fit in 160 bits")]
    PriceOverflow,
    #[error("requested output exceeds the virtual reserves")]
    NotEnoughLiquidity,
    #[error("price and liquidity must be positive")]
    InvalidPriceOrLiquidity,
}

impl From<FullMathError> for SqrtPriceMathError {
    fn from(_: FullMathError) -> Self {
        SqrtPriceMathError::PriceOverflow
    }
}

fn fit_u160(price: U256) -> Result<U256, SqrtPriceMathError> {
    if price > *U160_MAX {
        Err(SqrtPriceMathError::PriceOverflow)
    } else {
        Ok(price)
    }
}

/// Price after adding (`add`) or removing token0 at constant liquidity.
/// Always rounds up so that the price moves less than the exact amount allows:
/// far enough when token0 is paid in, not too far when it is taken out.
///
/// sqrt(P') = L * sqrt(P) / (L + amount * sqrt(P))
fn price_from_token0_rounding_up(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, SqrtPriceMathError> {
    if amount == U256::ZERO {
        return Ok(sqrt_price_x96);
    }
    let numerator1: U256 = U256::from(liquidity) << 96;

    if add {
        if let Some(product) = amount.checked_mul(sqrt_price_x96) {
            if let Some(denominator) = numerator1.checked_add(product) {
                return fit_u160(mul_div_rounding_up(
                    numerator1,
                    sqrt_price_x96,
                    denominator,
                )?);
            }
        }
        // L / (L / sqrt(P) + amount), saturates towards a price of 1
        let denominator = (numerator1 / sqrt_price_x96).saturating_add(amount);
        fit_u160(div_rounding_up(numerator1, denominator))
    } else {
        let product = amount
            .checked_mul(sqrt_price_x96)
            .ok_or(SqrtPriceMathError::PriceOverflow)?;
        if numerator1 <= product {
            return Err(SqrtPriceMathError::NotEnoughLiquidity);
        }
        let denominator = numerator1 - product;
        fit_u160(mul_div_rounding_up(
            numerator1,
            sqrt_price_x96,
            denominator,
        )?)
    }
}

/// Price after adding (`add`) or removing token1 at constant liquidity,
/// rounding down.
///
/// sqrt(P') = sqrt(P) +- amount / L
fn price_from_token1_rounding_down(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, SqrtPriceMathError> {
    let liquidity = U256::from(liquidity);

    if add {
        let quotient = if amount <= *U160_MAX {
            (amount << 96) / liquidity
        } else {
            mul_div(amount, *Q96, liquidity)?
        };
        let price = sqrt_price_x96
            .checked_add(quotient)
            .ok_or(SqrtPriceMathError::PriceOverflow)?;
        fit_u160(price)
    } else {
        let quotient = if amount <= *U160_MAX {
            div_rounding_up(amount << 96, liquidity)
        } else {
            mul_div_rounding_up(amount, *Q96, liquidity)?
        };
        if sqrt_price_x96 <= quotient {
            return Err(SqrtPriceMathError::NotEnoughLiquidity);
        }
        Ok(sqrt_price_x96 - quotient)
    }
}

/// Price after `amount_in` of the input token is paid into the pool.
/// `zero_for_one` means token0 is the input and the price moves down.
pub fn price_after_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, SqrtPriceMathError> {
    if sqrt_price_x96 == U256::ZERO || liquidity == 0 {
        return Err(SqrtPriceMathError::InvalidPriceOrLiquidity);
    }
    if zero_for_one {
        price_from_token0_rounding_up(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        price_from_token1_rounding_down(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Price after `amount_out` of the output token leaves the pool.
/// Fails with `NotEnoughLiquidity` if the output reaches the virtual reserve.
pub fn price_after_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, SqrtPriceMathError> {
    if sqrt_price_x96 == U256::ZERO || liquidity == 0 {
        return Err(SqrtPriceMathError::InvalidPriceOrLiquidity);
    }
    if zero_for_one {
        price_from_token1_rounding_down(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        price_from_token0_rounding_up(sqrt_price_x96, liquidity, amount_out, false)
    }
}
