use ethnum::U256;

use crate::{
    balances::LedgerError,
    libraries::{
        amount_delta::AmountDeltaError, full_math::FullMathError,
        liquidity_math::AddDeltaError, sqrt_price_math::SqrtPriceMathError,
        swap_math::ComputeSwapError, tick_math::TickMathError,
    },
    plugin::{HookKind, PluginError, Selector},
    position::PositionError,
    tick::{TickError, tree::TickTreeError},
};

/// Every way a pool operation can abort. An aborted operation leaves the pool
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    #[error("pool is not initialized")]
    NotInitialized,
    #[error("pool is already initialized")]
    AlreadyInitialized,
    #[error("pool is locked")]
    Locked,
    #[error("caller is not authorized")]
    NotAuthorized,

    #[error(transparent)]
    TickMath(#[from] TickMathError),
    #[error("sqrt price limit is on the wrong side of the price or out of bounds")]
    InvalidLimitSqrtPrice,
    #[error("amount required must not be zero")]
    ZeroAmountRequired,
    #[error("amount required is out of range")]
    InvalidAmountRequired,

    #[error("desired liquidity must not be zero")]
    ZeroLiquidityDesired,
    #[error("payment covers no liquidity")]
    ZeroLiquidityActual,
    #[error("liquidity of tick {0} exceeds the per-tick cap")]
    LiquidityOverflow(i32),
    #[error("liquidity sub underflow")]
    LiquiditySub,
    #[error("liquidity add overflow")]
    LiquidityAdd,
    #[error("liquidity net of tick {0} overflows")]
    LiquidityNetOverflow(i32),

    #[error("top tick must be above bottom tick")]
    TopTickLowerOrEqBottomTick,
    #[error("ticks must be multiples of the tick spacing")]
    TickIsNotSpaced,
    #[error("single tick position at {0} would contain the current price")]
    SingleTickInRange(i32),
    #[error("bottom tick is below MIN_TICK")]
    BottomTickLowerThanMIN,
    #[error("top tick is above MAX_TICK")]
    TopTickAboveMAX,
    #[error("invalid neighbour links for tick {0}")]
    TickInvalidLinks(i32),
    #[error("tick {0} is not initialized")]
    TickIsNotInitialized(i32),

    #[error("swap input was not paid in full")]
    InsufficientInputAmount,
    #[error("mint payment does not cover the liquidity")]
    InsufficientAmountReceivedAtMint,
    #[error("flash loan of token0 was not repaid with the fee")]
    FlashInsufficientPaid0,
    #[error("flash loan of token1 was not repaid with the fee")]
    FlashInsufficientPaid1,
    #[error("amount does not fit in 128 bits: {0}")]
    AmountOverflow(U256),
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("{hook:?} hook answered {got} instead of {expected}")]
    InvalidHookResponse {
        hook: HookKind,
        expected: Selector,
        got: Selector,
    },
    #[error("{0:?} hook may not override the fee")]
    FeeOverrideNotAllowed(HookKind),
    #[error("fee is controlled by the plugin")]
    DynamicFeeActive,
    #[error("plugin failed: {0}")]
    Plugin(#[from] PluginError),

    #[error("fee is already {0}")]
    FeeUnchanged(u16),
    #[error("tick spacing is already {0}")]
    TickSpacingUnchanged(i32),
    #[error("community fee is already {0}")]
    CommunityFeeUnchanged(u16),
    #[error("plugin is already set")]
    PluginUnchanged,
    #[error("plugin config is already {0:#04x}")]
    PluginConfigUnchanged(u8),
    #[error("tick spacing {0} is outside [1, 500]")]
    InvalidTickSpacing(i32),
    #[error("community fee {0} is above 1000")]
    InvalidCommunityFee(u16),
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    FullMath(#[from] FullMathError),
    #[error(transparent)]
    PriceMath(#[from] SqrtPriceMathError),
    #[error(transparent)]
    AmountDelta(#[from] AmountDeltaError),
    #[error(transparent)]
    ComputeSwap(#[from] ComputeSwapError),
}

impl From<AddDeltaError> for PoolError {
    fn from(err: AddDeltaError) -> Self {
        match err {
            AddDeltaError::Overflow => PoolError::LiquidityAdd,
            AddDeltaError::Underflow => PoolError::LiquiditySub,
        }
    }
}

impl From<TickError> for PoolError {
    fn from(err: TickError) -> Self {
        match err {
            TickError::LiquidityOverflow(tick) => PoolError::LiquidityOverflow(tick),
            TickError::Liquidity(err) => err.into(),
            TickError::LiquidityNetOverflow(tick) => PoolError::LiquidityNetOverflow(tick),
            TickError::InvalidLinks(tick) => PoolError::TickInvalidLinks(tick),
            TickError::NotInitialized(tick) => PoolError::TickIsNotInitialized(tick),
        }
    }
}

impl From<TickTreeError> for PoolError {
    fn from(err: TickTreeError) -> Self {
        match err {
            TickTreeError::TickOutOfRange(tick) => {
                PoolError::TickMath(TickMathError::TickOutOfRange(tick))
            }
        }
    }
}

impl From<PositionError> for PoolError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::LiquiditySub => PoolError::LiquiditySub,
            PositionError::LiquidityAdd => PoolError::LiquidityAdd,
        }
    }
}
