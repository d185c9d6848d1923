use ethnum::U256;

// Position of the most significant set bit, None for zero
pub fn most_significant_bit(value: U256) -> Option<u8> {
    if value == U256::ZERO {
        None
    } else {
        Some((255 - value.leading_zeros()) as u8)
    }
}

// Position of the least significant set bit, None for zero
pub fn least_significant_bit(value: U256) -> Option<u8> {
    if value == U256::ZERO {
        None
    } else {
        Some(value.trailing_zeros() as u8)
    }
}

/// Mask with bits `0..=bit` set.
pub fn mask_at_or_below(bit: u8) -> U256 {
    U256::MAX >> (255 - bit as u32)
}

/// Mask with bits `bit..=255` set.
pub fn mask_at_or_above(bit: u8) -> U256 {
    U256::MAX << bit as u32
}
