use ethnum::U256;
use num_traits::Zero;

use super::safe_cast::{big_uint_to_u256, u256_to_big_uint};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FullMathError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("result does not fit in 256 bits")]
    Overflow,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Rounding {
    Down,
    Up,
}

/// floor(a * b / denominator) with a 512 bit intermediate product.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    mul_div_with_rounding(a, b, denominator, Rounding::Down)
}

/// ceil(a * b / denominator) with a 512 bit intermediate product.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    mul_div_with_rounding(a, b, denominator, Rounding::Up)
}

fn mul_div_with_rounding(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, FullMathError> {
    if denominator == U256::ZERO {
        return Err(FullMathError::DivisionByZero);
    }

    // Product fits in 256 bits, no need for the wide path
    if let Some(product) = a.checked_mul(b) {
        let quotient = product / denominator;
        if rounding == Rounding::Up && product % denominator != U256::ZERO {
            return quotient.checked_add(U256::ONE).ok_or(FullMathError::Overflow);
        }
        return Ok(quotient);
    }

    let product = u256_to_big_uint(a) * u256_to_big_uint(b);
    let denominator = u256_to_big_uint(denominator);
    let mut quotient = &product / &denominator;
    if rounding == Rounding::Up && !(&product % &denominator).is_zero() {
        quotient += 1u32;
    }

    big_uint_to_u256(quotient).map_err(|_| FullMathError::Overflow)
}

/// ceil(x / y), returns zero when y is zero.
pub fn div_rounding_up(x: U256, y: U256) -> U256 {
    if y == U256::ZERO {
        return U256::ZERO;
    }
    let quotient = x / y;
    if x % y == U256::ZERO {
        quotient
    } else {
        quotient + U256::ONE
    }
}
