//! Concentrated liquidity pool core.
//!
//! A [`pool::Pool`] trades two tokens along a constant product curve whose
//! liquidity is split into price ranges between ticks. Liquidity providers own
//! positions over such ranges and earn the swap fees paid while the price is
//! inside them. An optional [`plugin::Plugin`] observes every operation and may
//! drive the fee.

pub mod balances;
pub mod cbor;
pub mod config;
pub mod error;
pub mod events;
pub mod guard;
pub mod libraries;
pub mod logs;
pub mod plugin;
pub mod pool;
pub mod position;
pub mod state;
pub mod tick;
pub mod validation;

pub use error::PoolError;
pub use pool::Pool;

#[cfg(test)]
mod tests;
