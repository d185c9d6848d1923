//! Three level bitmap over the whole tick range.
//!
//! Ticks are stored raw (not divided by the tick spacing), offset by
//! `MIN_TICK` so every valid tick maps to a non-negative index. A leaf word
//! covers 256 ticks, a second layer word covers 256 leaf words and the 32 bit
//! root covers the second layer. A bit in an upper layer is set iff the word it
//! points to is non-zero.

use std::collections::BTreeMap;

use ethnum::U256;

use crate::libraries::{
    bit_math::{least_significant_bit, mask_at_or_above, mask_at_or_below, most_significant_bit},
    constants::{MAX_TICK, MIN_TICK},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickTreeError {
    #[error("tick {0} is outside [MIN_TICK, MAX_TICK]")]
    TickOutOfRange(i32),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickTree {
    root: u32,
    second_layer: BTreeMap<u16, U256>,
    leaves: BTreeMap<u16, U256>,
}

fn tick_index(tick: i32) -> u32 {
    (tick - MIN_TICK) as u32
}

fn index_tick(index: u32) -> i32 {
    index as i32 + MIN_TICK
}

/// (word position, bit position) of an index inside its layer.
fn split(index: u32) -> (u16, u8) {
    ((index >> 8) as u16, (index & 0xff) as u8)
}

fn join(word_pos: u16, bit: u8) -> u32 {
    ((word_pos as u32) << 8) | bit as u32
}

impl TickTree {
    fn leaf(&self, pos: u16) -> U256 {
        self.leaves.get(&pos).copied().unwrap_or_default()
    }

    fn second(&self, pos: u16) -> U256 {
        self.second_layer.get(&pos).copied().unwrap_or_default()
    }

    pub fn is_initialized(&self, tick: i32) -> bool {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return false;
        }
        let (pos, bit) = split(tick_index(tick));
        self.leaf(pos) & (U256::ONE << bit) != U256::ZERO
    }

    pub fn is_empty(&self) -> bool {
        self.root == 0
    }

    /// Flips the bit of `tick`, propagating to the upper layers when a word
    /// becomes non-empty or empty. Returns the new state of the bit.
    pub fn toggle(&mut self, tick: i32) -> Result<bool, TickTreeError> {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickTreeError::TickOutOfRange(tick));
        }
        let (leaf_pos, bit) = split(tick_index(tick));

        let leaf_before = self.leaf(leaf_pos);
        let leaf_after = leaf_before ^ (U256::ONE << bit);
        if leaf_after == U256::ZERO {
            self.leaves.remove(&leaf_pos);
        } else {
            self.leaves.insert(leaf_pos, leaf_after);
        }

        if (leaf_before == U256::ZERO) != (leaf_after == U256::ZERO) {
            let (second_pos, second_bit) = split(leaf_pos as u32);
            let second_before = self.second(second_pos);
            let second_after = second_before ^ (U256::ONE << second_bit);
            if second_after == U256::ZERO {
                self.second_layer.remove(&second_pos);
            } else {
                self.second_layer.insert(second_pos, second_after);
            }

            if (second_before == U256::ZERO) != (second_after == U256::ZERO) {
                self.root ^= 1u32 << second_pos;
            }
        }

        Ok(leaf_after & (U256::ONE << bit) != U256::ZERO)
    }

    /// Next initialized tick from `tick`: the greatest one at or below it when
    /// `lte`, the smallest one strictly above it otherwise. When the search
    /// runs out of range the matching tick bound is returned with `false`.
    pub fn next(&self, tick: i32, lte: bool) -> (i32, bool) {
        if lte {
            self.next_at_or_below(tick)
        } else {
            self.next_above(tick)
        }
    }

    fn next_at_or_below(&self, tick: i32) -> (i32, bool) {
        if tick < MIN_TICK {
            return (MIN_TICK, false);
        }
        let (leaf_pos, bit) = split(tick_index(tick.min(MAX_TICK)));

        let masked = self.leaf(leaf_pos) & mask_at_or_below(bit);
        if let Some(found) = most_significant_bit(masked) {
            return (index_tick(join(leaf_pos, found)), true);
        }

        let Some(prev_leaf) = self.leaf_below(leaf_pos) else {
            return (MIN_TICK, false);
        };
        match most_significant_bit(self.leaf(prev_leaf)) {
            Some(found) => (index_tick(join(prev_leaf, found)), true),
            None => (MIN_TICK, false),
        }
    }

    fn next_above(&self, tick: i32) -> (i32, bool) {
        if tick >= MAX_TICK {
            return (MAX_TICK, false);
        }
        let index = if tick < MIN_TICK { 0 } else { tick_index(tick) + 1 };
        let (leaf_pos, bit) = split(index);

        let masked = self.leaf(leaf_pos) & mask_at_or_above(bit);
        if let Some(found) = least_significant_bit(masked) {
            return (index_tick(join(leaf_pos, found)), true);
        }

        let Some(next_leaf) = self.leaf_above(leaf_pos) else {
            return (MAX_TICK, false);
        };
        match least_significant_bit(self.leaf(next_leaf)) {
            Some(found) => (index_tick(join(next_leaf, found)), true),
            None => (MAX_TICK, false),
        }
    }

    /// Closest non-empty leaf word strictly below `leaf_pos`.
    fn leaf_below(&self, leaf_pos: u16) -> Option<u16> {
        let (second_pos, bit) = split(leaf_pos as u32);
        if bit > 0 {
            let masked = self.second(second_pos) & mask_at_or_below(bit - 1);
            if let Some(found) = most_significant_bit(masked) {
                return Some(join(second_pos, found) as u16);
            }
        }

        let root_masked = self.root & ((1u32 << second_pos) - 1);
        if root_masked == 0 {
            return None;
        }
        let second_pos = (31 - root_masked.leading_zeros()) as u16;
        most_significant_bit(self.second(second_pos)).map(|found| join(second_pos, found) as u16)
    }

    /// Closest non-empty leaf word strictly above `leaf_pos`.
    fn leaf_above(&self, leaf_pos: u16) -> Option<u16> {
        let (second_pos, bit) = split(leaf_pos as u32);
        if bit < u8::MAX {
            let masked = self.second(second_pos) & mask_at_or_above(bit + 1);
            if let Some(found) = least_significant_bit(masked) {
                return Some(join(second_pos, found) as u16);
            }
        }

        let root_masked = self.root & (u32::MAX << (second_pos + 1));
        if root_masked == 0 {
            return None;
        }
        let second_pos = root_masked.trailing_zeros() as u16;
        least_significant_bit(self.second(second_pos)).map(|found| join(second_pos, found) as u16)
    }
}
