use ethnum::U256;
use tracing::debug;

use crate::{
    balances::types::Token,
    error::PoolError,
    events::EventType,
    libraries::{fee_math::fee_growth_delta, safe_cast::u256_to_u128_saturating},
    logs::POOL,
};

use super::Pool;

impl Pool {
    /// Reserve the pool would book for its current balance of `token`: the
    /// balance minus pending community fees, capped at 128 bits.
    fn booked_reserve(&self, token: Token) -> u128 {
        let balance = self.state.ledger.pool_balance(token);
        let pending = U256::from(self.state.community_fee_pending(token));
        u256_to_u128_saturating(balance.saturating_sub(pending))
    }

    /// Books tokens that reached the pool outside of any operation. While
    /// liquidity is in range they are paid to the in-range positions like fees.
    pub(super) fn absorb_donations(&mut self) -> Result<(), PoolError> {
        let mut donated = [U256::ZERO; 2];
        for token in [Token::Token0, Token::Token1] {
            let booked = self.booked_reserve(token);
            let reserve = self.state.reserve(token);
            if booked <= reserve {
                continue;
            }
            let amount = booked - reserve;
            donated[token.index()] = U256::from(amount);

            let liquidity = self.state.global.liquidity;
            let global = &mut self.state.global;
            let (reserve, fee_growth) = match token {
                Token::Token0 => (&mut global.reserve0, &mut global.fee_growth_global_0_x128),
                Token::Token1 => (&mut global.reserve1, &mut global.fee_growth_global_1_x128),
            };
            *reserve = booked;
            if liquidity > 0 {
                *fee_growth = fee_growth.wrapping_add(fee_growth_delta(U256::from(amount), liquidity)?);
            }
        }

        if donated != [U256::ZERO; 2] {
            debug!(target: POOL, amount0 = %donated[0], amount1 = %donated[1], "[donation]: absorbed");
            self.events.record(EventType::Donation {
                amount0: donated[0],
                amount1: donated[1],
            });
        }
        Ok(())
    }

    /// Aligns the booked reserves with the balances after an operation moved
    /// tokens.
    pub(super) fn sync_reserves(&mut self) {
        self.state.global.reserve0 = self.booked_reserve(Token::Token0);
        self.state.global.reserve1 = self.booked_reserve(Token::Token1);
    }

    /// [`Self::sync_reserves`], keeping `unbooked` of `token` out of the
    /// reserve.
    pub(super) fn sync_reserves_leaving(&mut self, token: Token, unbooked: U256) {
        self.sync_reserves();
        let unbooked = u256_to_u128_saturating(unbooked);
        let global = &mut self.state.global;
        let reserve = match token {
            Token::Token0 => &mut global.reserve0,
            Token::Token1 => &mut global.reserve1,
        };
        *reserve = reserve.saturating_sub(unbooked);
    }
}
