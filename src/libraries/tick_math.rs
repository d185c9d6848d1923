use ethnum::{I256, U256};
use lazy_static::lazy_static;

use super::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TickMathError {
    #[error("tick {0} is outside [MIN_TICK, MAX_TICK]")]
    TickOutOfRange(i32),
    #[error("sqrt price {0} is outside [MIN_SQRT_RATIO, MAX_SQRT_RATIO)")]
    PriceOutOfRange(U256),
}

// 1 / sqrt(1.0001)^(2^i) in Q128, for bits 1..=19 of |tick|
const SQRT_RATIO_FACTORS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

// 1 / sqrt(1.0001) in Q128
const ODD_TICK_FACTOR: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

lazy_static! {
    // 2^64 / log2(sqrt(1.0001))
    static ref LOG_SQRT10001_COEFF: I256 = I256::new(255738958999603826347141);
    static ref TICK_LOW_OFFSET: I256 = I256::new(3402992956809132418596140100660247210);
    static ref TICK_HIGH_OFFSET: I256 =
        I256::from_str_radix("291339464771989622907027621153398088495", 10).unwrap();
}

pub struct TickMath;

impl TickMath {
    /// sqrt(1.0001^tick) as a Q64.96 number.
    pub fn sqrt_price_at_tick(tick: i32) -> Result<U256, TickMathError> {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickMathError::TickOutOfRange(tick));
        }
        let abs_tick = tick.unsigned_abs();

        let mut ratio = if abs_tick & 1 != 0 {
            U256::new(ODD_TICK_FACTOR)
        } else {
            U256::ONE << 128
        };
        for (bit, factor) in SQRT_RATIO_FACTORS.iter().enumerate() {
            if abs_tick & (2u32 << bit) != 0 {
                ratio = (ratio * U256::new(*factor)) >> 128;
            }
        }

        if tick > 0 {
            ratio = U256::MAX / ratio;
        }

        // Q128.128 to Q64.96, rounding up so that tick_at_sqrt_price stays consistent
        let round_up = if ratio & U256::new(0xffff_ffff) == U256::ZERO {
            U256::ZERO
        } else {
            U256::ONE
        };
        Ok((ratio >> 32) + round_up)
    }

    /// Greatest tick whose price is at or below `sqrt_price_x96`.
    pub fn tick_at_sqrt_price(sqrt_price_x96: U256) -> Result<i32, TickMathError> {
        if sqrt_price_x96 < *MIN_SQRT_RATIO || sqrt_price_x96 >= *MAX_SQRT_RATIO {
            return Err(TickMathError::PriceOutOfRange(sqrt_price_x96));
        }
        let ratio: U256 = sqrt_price_x96 << 32;
        let msb = 255 - ratio.leading_zeros();

        let mut r: U256 = if msb >= 128 {
            ratio >> (msb - 127)
        } else {
            ratio << (127 - msb)
        };

        let mut log_2: I256 = I256::from(msb as i32 - 128) << 64;
        for shift in (50..64u32).rev() {
            r = (r * r) >> 127;
            let f: U256 = r >> 128;
            log_2 |= f.as_i256() << shift;
            r >>= f.as_u32();
        }

        let log_sqrt10001: I256 = log_2 * *LOG_SQRT10001_COEFF;
        let tick_low = ((log_sqrt10001 - *TICK_LOW_OFFSET) >> 128u32).as_i32();
        let tick_high = ((log_sqrt10001 + *TICK_HIGH_OFFSET) >> 128u32).as_i32();

        if tick_low == tick_high {
            Ok(tick_low)
        } else if Self::sqrt_price_at_tick(tick_high)? <= sqrt_price_x96 {
            Ok(tick_high)
        } else {
            Ok(tick_low)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::constants::Q96;
    use proptest::prelude::*;

    #[test]
    fn known_prices() {
        assert_eq!(TickMath::sqrt_price_at_tick(0), Ok(*Q96));
        assert_eq!(
            TickMath::sqrt_price_at_tick(1),
            Ok(U256::new(79232123823359799118286999568))
        );
        assert_eq!(
            TickMath::sqrt_price_at_tick(MIN_TICK + 1),
            Ok(U256::new(4295343490))
        );
        assert_eq!(
            TickMath::sqrt_price_at_tick(MAX_TICK - 1),
            Ok(U256::from_str_radix("1461373636630004318706518188784493106690254656249", 10)
                .unwrap())
        );
    }

    #[test]
    fn ticks_out_of_range_fail() {
        assert_eq!(
            TickMath::sqrt_price_at_tick(MAX_TICK + 1),
            Err(TickMathError::TickOutOfRange(MAX_TICK + 1))
        );
        assert_eq!(
            TickMath::sqrt_price_at_tick(MIN_TICK - 1),
            Err(TickMathError::TickOutOfRange(MIN_TICK - 1))
        );
    }

    #[test]
    fn prices_out_of_range_fail() {
        let below = *MIN_SQRT_RATIO - U256::ONE;
        assert_eq!(
            TickMath::tick_at_sqrt_price(below),
            Err(TickMathError::PriceOutOfRange(below))
        );
        assert_eq!(
            TickMath::tick_at_sqrt_price(*MAX_SQRT_RATIO),
            Err(TickMathError::PriceOutOfRange(*MAX_SQRT_RATIO))
        );
    }

    #[test]
    fn known_ticks() {
        assert_eq!(TickMath::tick_at_sqrt_price(*MIN_SQRT_RATIO), Ok(MIN_TICK));
        assert_eq!(
            TickMath::tick_at_sqrt_price(U256::new(4295343490)),
            Ok(MIN_TICK + 1)
        );
        assert_eq!(
            TickMath::tick_at_sqrt_price(*MAX_SQRT_RATIO - U256::ONE),
            Ok(MAX_TICK - 1)
        );
        assert_eq!(TickMath::tick_at_sqrt_price(*Q96), Ok(0));
        assert_eq!(TickMath::tick_at_sqrt_price(*Q96 - U256::ONE), Ok(-1));
    }

    #[test]
    fn price_between_ticks_selects_lower() {
        let low = TickMath::sqrt_price_at_tick(1).unwrap();
        let high = TickMath::sqrt_price_at_tick(2).unwrap();
        let mid = (low + high) / U256::new(2);
        assert_eq!(TickMath::tick_at_sqrt_price(mid), Ok(1));
    }

    #[test]
    fn relative_precision() {
        for tick in [-500_000, -50_000, -5_000, -50, 50, 5_000, 50_000, 150_000] {
            let exact = 1.0001f64.powf(tick as f64 / 2.0) * 2f64.powi(96);
            let actual: f64 = TickMath::sqrt_price_at_tick(tick)
                .unwrap()
                .to_string()
                .parse()
                .unwrap();
            let error = ((actual - exact) / exact).abs();
            assert!(error < 1e-6, "tick {tick}: relative error {error}");
        }
    }

    proptest! {
        #[test]
        fn round_trip(tick in MIN_TICK..MAX_TICK) {
            let price = TickMath::sqrt_price_at_tick(tick).unwrap();
            prop_assert_eq!(TickMath::tick_at_sqrt_price(price).unwrap(), tick);
        }

        #[test]
        fn strictly_increasing(tick in MIN_TICK..MAX_TICK) {
            let lower = TickMath::sqrt_price_at_tick(tick).unwrap();
            let upper = TickMath::sqrt_price_at_tick(tick + 1).unwrap();
            prop_assert!(lower < upper);
        }

        #[test]
        fn tick_brackets_price(hi in 0u128..(1u128 << 32), lo in any::<u128>()) {
            let price = U256::from_words(hi, lo);
            prop_assume!(price >= *MIN_SQRT_RATIO && price < *MAX_SQRT_RATIO);
            let tick = TickMath::tick_at_sqrt_price(price).unwrap();
            prop_assert!(TickMath::sqrt_price_at_tick(tick).unwrap() <= price);
            prop_assert!(price < TickMath::sqrt_price_at_tick(tick + 1).unwrap());
        }
    }
}
