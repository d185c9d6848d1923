use ethnum::U256;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref Q128: U256 = U256::from_words(1, 0);
    pub static ref Q96: U256 = U256::ONE << 96;
    pub static ref U160_MAX: U256 = (U256::ONE << 160) - U256::ONE;

    // sqrt_price_at_tick(MIN_TICK)
    pub static ref MIN_SQRT_RATIO: U256 = U256::from_str_radix("4295128739", 10).unwrap();
    // sqrt_price_at_tick(MAX_TICK)
    pub static ref MAX_SQRT_RATIO: U256 =
        U256::from_str_radix("1461446703485210103287273052203988822378723970342", 10).unwrap();
}

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// Swap fees are expressed in hundredths of a basis point.
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Community fee is a per-mille share of every collected fee.
pub const COMMUNITY_FEE_DENOMINATOR: u16 = 1_000;
pub const MAX_COMMUNITY_FEE: u16 = COMMUNITY_FEE_DENOMINATOR;

pub const MIN_TICK_SPACING: i32 = 1;
pub const MAX_TICK_SPACING: i32 = 500;

pub const DEFAULT_FEE: u16 = 500;
pub const DEFAULT_TICK_SPACING: i32 = 60;

/// Cap on liquidity_gross of a single tick. Ticks are indexed without spacing
/// compression, so the cap is the one for spacing 1 and stays valid whenever
/// the spacing changes.
pub const MAX_LIQUIDITY_PER_TICK: u128 = crate::tick::max_liquidity_per_tick(MIN_TICK_SPACING);
