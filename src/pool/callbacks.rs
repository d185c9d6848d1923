//! Payment callbacks.
//!
//! The pool calls back into the initiator of a mint, swap or flash while the
//! operation is in progress. The callback pays with [`Pool::transfer_to_pool`]
//! and the pool verifies the payment by its own balance difference. The pool
//! is locked for the whole call, so any attempt to run another pool operation
//! from inside a callback fails with [`PoolError::Locked`].

use ethnum::{I256, U256};

use crate::error::PoolError;

use super::Pool;

pub trait MintCallback {
    /// Asked to pay `amount0_owed`/`amount1_owed` for the desired liquidity.
    /// Paying less mints proportionally less liquidity.
    fn mint_callback(
        &mut self,
        pool: &mut Pool,
        amount0_owed: U256,
        amount1_owed: U256,
        data: &[u8],
    ) -> Result<(), PoolError>;
}

pub trait SwapCallback {
    /// Deltas are seen from the pool: the positive one has to be paid in, the
    /// negative one was already sent to the recipient.
    fn swap_callback(
        &mut self,
        pool: &mut Pool,
        amount0_delta: I256,
        amount1_delta: I256,
        data: &[u8],
    ) -> Result<(), PoolError>;
}

pub trait FlashCallback {
    /// The borrowed amounts were sent already; they have to come back with at
    /// least `fee0`/`fee1` on top.
    fn flash_callback(
        &mut self,
        pool: &mut Pool,
        fee0: U256,
        fee1: U256,
        data: &[u8],
    ) -> Result<(), PoolError>;
}
