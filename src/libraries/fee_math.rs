use ethnum::U256;

use super::{
    constants::{COMMUNITY_FEE_DENOMINATOR, FEE_DENOMINATOR, Q128},
    full_math::{FullMathError, mul_div, mul_div_rounding_up},
};

/// Splits a collected fee into the provider share and the community share.
/// The community share rounds down.
pub fn split_community_fee(fee_amount: U256, community_fee: u16) -> (U256, U256) {
    if community_fee == 0 || fee_amount == U256::ZERO {
        return (fee_amount, U256::ZERO);
    }
    // community_fee <= denominator, the quotient never exceeds fee_amount
    let community = mul_div(
        fee_amount,
        U256::from(community_fee),
        U256::from(COMMUNITY_FEE_DENOMINATOR),
    )
    .unwrap_or(fee_amount);
    (fee_amount - community, community)
}

/// Fee growth per unit of liquidity produced by `fee_amount`, in Q128.
pub fn fee_growth_delta(fee_amount: U256, liquidity: u128) -> Result<U256, FullMathError> {
    mul_div(fee_amount, *Q128, U256::from(liquidity))
}

/// Minimum fee a flash borrower has to pay on top of the borrowed amount.
pub fn flash_fee(amount: U256, fee: u16) -> Result<U256, FullMathError> {
    mul_div_rounding_up(amount, U256::from(fee), U256::from(FEE_DENOMINATOR))
}
