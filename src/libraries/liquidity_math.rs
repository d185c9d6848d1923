#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddDeltaError {
    #[error("liquidity add overflow")]
    Overflow,
    #[error("liquidity sub underflow")]
    Underflow,
}

/// Applies a signed liquidity delta.
pub fn add_delta(liquidity: u128, delta: i128) -> Result<u128, AddDeltaError> {
    if delta >= 0 {
        liquidity
            .checked_add(delta as u128)
            .ok_or(AddDeltaError::Overflow)
    } else {
        liquidity
            .checked_sub(delta.unsigned_abs())
            .ok_or(AddDeltaError::Underflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_and_subtracts() {
        assert_eq!(add_delta(1, 0), Ok(1));
        assert_eq!(add_delta(1, -1), Ok(0));
        assert_eq!(add_delta(1, 1), Ok(2));
        assert_eq!(add_delta(u128::MAX - 15, 15), Ok(u128::MAX));
    }

    #[test]
    fn underflow() {
        assert_eq!(add_delta(0, -1), Err(AddDeltaError::Underflow));
        assert_eq!(add_delta(3, -4), Err(AddDeltaError::Underflow));
    }

    #[test]
    fn overflow() {
        assert_eq!(add_delta(u128::MAX, 1), Err(AddDeltaError::Overflow));
        assert_eq!(add_delta(u128::MAX - 14, 15), Err(AddDeltaError::Overflow));
    }

    #[test]
    fn min_delta_uses_full_magnitude() {
        let magnitude = i128::MIN.unsigned_abs();
        assert_eq!(add_delta(magnitude, i128::MIN), Ok(0));
    }
}
