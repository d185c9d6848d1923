use ethnum::{I256, U256};
use tracing::debug;

use crate::{
    balances::types::{AccountId, Token},
    error::PoolError,
    events::EventType,
    libraries::{
        balance_delta::BalanceDelta,
        fee_math::{fee_growth_delta, flash_fee, split_community_fee},
        safe_cast::u256_to_u128_saturating,
    },
    logs::SWAP,
    plugin::HookKind,
};

use super::{
    Pool,
    callbacks::{FlashCallback, SwapCallback},
    swap::swap_inner,
    types::{FlashParams, SwapParams},
};

impl Pool {
    /// Swaps along the curve. The output is sent to `params.recipient` before
    /// the callback, which then has to pay the input.
    pub fn swap(
        &mut self,
        sender: AccountId,
        params: SwapParams,
        callback: &mut dyn SwapCallback,
    ) -> Result<BalanceDelta, PoolError> {
        self.transact("swap", |pool| pool.swap_and_pay(sender, &params, callback))
    }

    fn swap_and_pay(
        &mut self,
        sender: AccountId,
        params: &SwapParams,
        callback: &mut dyn SwapCallback,
    ) -> Result<BalanceDelta, PoolError> {
        self.require_initialized()?;
        self.absorb_donations()?;
        self.call_plugin(HookKind::BeforeSwap, |plugin, ctx| {
            plugin.before_swap(ctx, sender, params)
        })?;

        let summary = swap_inner(
            &mut self.state,
            params.zero_for_one,
            params.amount_required,
            params.limit_sqrt_price,
        )?;
        let delta = summary.delta;

        let token_in = Token::input(params.zero_for_one);
        let token_out = Token::output(params.zero_for_one);
        let (amount_in, amount_out) = if params.zero_for_one {
            (delta.amount0(), delta.amount1())
        } else {
            (delta.amount1(), delta.amount0())
        };

        if amount_out < I256::ZERO {
            self.state.ledger.transfer_out(
                params.recipient,
                token_out,
                amount_out.wrapping_neg().as_u256(),
            )?;
        }

        let balance_before = self.pool_balance(token_in);
        callback.swap_callback(self, delta.amount0(), delta.amount1(), &params.data)?;
        let paid = self.pool_balance(token_in).saturating_sub(balance_before);
        let owed = if amount_in > I256::ZERO {
            amount_in.as_u256()
        } else {
            U256::ZERO
        };
        if paid < owed {
            return Err(PoolError::InsufficientInputAmount);
        }
        // overpayment stays out of the reserve until the next operation
        // absorbs it as a donation
        self.sync_reserves_leaving(token_in, paid - owed);

        let global = &self.state.global;
        self.events.record(EventType::Swap {
            sender,
            recipient: params.recipient,
            amount0: delta.amount0(),
            amount1: delta.amount1(),
            sqrt_price_x96: global.sqrt_price_x96,
            liquidity: global.liquidity,
            tick: global.tick,
        });
        debug!(
            target: SWAP,
            %sender,
            amount0 = %delta.amount0(),
            amount1 = %delta.amount1(),
            tick = summary.tick,
            crossed = summary.crossed_ticks.len(),
            "[swap]: executed"
        );

        self.call_plugin(HookKind::AfterSwap, |plugin, ctx| {
            plugin.after_swap(ctx, sender, params, &summary)
        })?;
        Ok(delta)
    }

    /// Lends `amount0`/`amount1` to `params.recipient` for the duration of the
    /// callback. The pool has to end up with at least its balance before the
    /// loan plus the fee; whatever is paid above the loan counts as fee.
    /// Returns the amounts paid above the loan.
    pub fn flash(
        &mut self,
        sender: AccountId,
        params: FlashParams,
        callback: &mut dyn FlashCallback,
    ) -> Result<(U256, U256), PoolError> {
        self.transact("flash", |pool| pool.flash_inner(sender, &params, callback))
    }

    fn flash_inner(
        &mut self,
        sender: AccountId,
        params: &FlashParams,
        callback: &mut dyn FlashCallback,
    ) -> Result<(U256, U256), PoolError> {
        self.require_initialized()?;
        self.absorb_donations()?;
        self.call_plugin(HookKind::BeforeFlash, |plugin, ctx| {
            plugin.before_flash(ctx, sender, params)
        })?;

        let fee = self.state.global.fee;
        let fee0 = flash_fee(params.amount0, fee)?;
        let fee1 = flash_fee(params.amount1, fee)?;
        let balance0_before = self.pool_balance(Token::Token0);
        let balance1_before = self.pool_balance(Token::Token1);

        for (token, amount) in [
            (Token::Token0, params.amount0),
            (Token::Token1, params.amount1),
        ] {
            if amount > U256::ZERO {
                self.state.ledger.transfer_out(params.recipient, token, amount)?;
            }
        }

        callback.flash_callback(self, fee0, fee1, &params.data)?;

        let paid0 = self
            .pool_balance(Token::Token0)
            .checked_sub(balance0_before)
            .filter(|paid| *paid >= fee0)
            .ok_or(PoolError::FlashInsufficientPaid0)?;
        let paid1 = self
            .pool_balance(Token::Token1)
            .checked_sub(balance1_before)
            .filter(|paid| *paid >= fee1)
            .ok_or(PoolError::FlashInsufficientPaid1)?;

        self.book_flash_fee(Token::Token0, paid0)?;
        self.book_flash_fee(Token::Token1, paid1)?;
        self.sync_reserves();

        self.events.record(EventType::Flash {
            sender,
            recipient: params.recipient,
            amount0: params.amount0,
            amount1: params.amount1,
            paid0,
            paid1,
        });
        debug!(target: SWAP, %sender, %paid0, %paid1, "[flash]: repaid");

        self.call_plugin(HookKind::AfterFlash, |plugin, ctx| {
            plugin.after_flash(ctx, sender, params, paid0, paid1)
        })?;
        Ok((paid0, paid1))
    }

    /// Splits a flash fee between the community and the in-range positions,
    /// the same way swap fees are split. Amounts beyond 128 bits are forgone.
    fn book_flash_fee(&mut self, token: Token, paid: U256) -> Result<(), PoolError> {
        let paid = U256::from(u256_to_u128_saturating(paid));
        if paid == U256::ZERO {
            return Ok(());
        }
        let (lp_fee, community) = split_community_fee(paid, self.state.global.community_fee);
        let community = u256_to_u128_saturating(community);
        let liquidity = self.state.global.liquidity;
        let global = &mut self.state.global;
        let (pending, fee_growth) = match token {
            Token::Token0 => (
                &mut global.community_fee_pending0,
                &mut global.fee_growth_global_0_x128,
            ),
            Token::Token1 => (
                &mut global.community_fee_pending1,
                &mut global.fee_growth_global_1_x128,
            ),
        };
        *pending = pending.saturating_add(community);
        if liquidity > 0 {
            *fee_growth = fee_growth.wrapping_add(fee_growth_delta(lp_fee, liquidity)?);
        }
        Ok(())
    }
}
