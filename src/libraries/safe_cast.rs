use ethnum::{I256, U256};
use num_bigint::BigUint;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafeCastError {
    #[error("value does not fit in 256 bits")]
    U256Overflow,
    #[error("value does not fit in a signed 256 bit integer")]
    I256Overflow,
}

pub fn big_uint_to_u256(value: BigUint) -> Result<U256, SafeCastError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(SafeCastError::U256Overflow);
    }
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(U256::from_be_bytes(buf))
}

pub fn u256_to_big_uint(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes())
}

/// Amounts handed to the swap loop must stay positive when reinterpreted as I256.
pub fn u256_to_i256(value: U256) -> Result<I256, SafeCastError> {
    if value > I256::MAX.as_u256() {
        return Err(SafeCastError::I256Overflow);
    }
    Ok(value.as_i256())
}

pub fn u256_to_u128(value: U256) -> Option<u128> {
    if value > U256::from(u128::MAX) {
        None
    } else {
        Some(value.as_u128())
    }
}

pub fn u256_to_u128_saturating(value: U256) -> u128 {
    u256_to_u128(value).unwrap_or(u128::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_uint_round_trip() {
        let value = U256::MAX - U256::new(12345);
        assert_eq!(big_uint_to_u256(u256_to_big_uint(value)), Ok(value));
    }

    #[test]
    fn big_uint_wider_than_256_bits_is_rejected() {
        let value = u256_to_big_uint(U256::MAX) + 1u32;
        assert_eq!(big_uint_to_u256(value), Err(SafeCastError::U256Overflow));
    }

    #[test]
    fn i256_cast_rejects_top_bit() {
        assert_eq!(u256_to_i256(U256::MAX), Err(SafeCastError::I256Overflow));
        assert_eq!(u256_to_i256(U256::new(7)), Ok(I256::new(7)));
    }

    #[test]
    fn u128_cast_saturates() {
        assert_eq!(u256_to_u128_saturating(U256::MAX), u128::MAX);
        assert_eq!(u256_to_u128_saturating(U256::new(42)), 42);
        assert_eq!(u256_to_u128(U256::from(u128::MAX) + U256::ONE), None);
    }
}
