use ethnum::{I256, U256};
use tracing::debug;

use crate::{
    balances::types::{AccountId, Token},
    error::PoolError,
    events::EventType,
    libraries::{
        balance_delta::BalanceDelta, full_math::mul_div, safe_cast::u256_to_u128_saturating,
    },
    logs::POOL,
    plugin::HookKind,
    position::types::PositionKey,
    validation::{check_single_tick, check_spacing, check_ticks},
};

use super::{
    Pool,
    callbacks::MintCallback,
    modify_position::{amounts_for_liquidity, modify_position},
    types::{MintParams, MintResult, ModifyPositionParams},
};

fn signed(amount: U256) -> Result<I256, PoolError> {
    crate::libraries::safe_cast::u256_to_i256(amount).map_err(|_| PoolError::AmountOverflow(amount))
}

impl Pool {
    /// Adds liquidity to `params.recipient`'s position. The callback is asked
    /// for the amounts backing `liquidity_desired`; if it pays less of either
    /// token the minted liquidity shrinks accordingly, and whatever exceeds the
    /// final amounts goes back to `leftovers_recipient`.
    pub fn mint(
        &mut self,
        sender: AccountId,
        params: MintParams,
        callback: &mut dyn MintCallback,
    ) -> Result<MintResult, PoolError> {
        self.transact("mint", |pool| pool.mint_inner(sender, &params, callback))
    }

    fn mint_inner(
        &mut self,
        sender: AccountId,
        params: &MintParams,
        callback: &mut dyn MintCallback,
    ) -> Result<MintResult, PoolError> {
        self.require_initialized()?;
        check_ticks(params.bottom_tick, params.top_tick)?;
        let tick_spacing = self.state.global.tick_spacing;
        // with spacing 1 a one tick range is an ordinary range
        if params.is_single_tick() && tick_spacing > 1 {
            check_single_tick(params.bottom_tick, tick_spacing, self.state.global.tick)?;
        } else {
            check_spacing(params.bottom_tick, params.top_tick, tick_spacing)?;
        }
        if params.liquidity_desired == 0 {
            return Err(PoolError::ZeroLiquidityDesired);
        }
        let liquidity_desired = i128::try_from(params.liquidity_desired)
            .map_err(|_| PoolError::LiquidityOverflow(params.bottom_tick))?;
        self.absorb_donations()?;

        let modify_params = ModifyPositionParams {
            owner: params.recipient,
            bottom_tick: params.bottom_tick,
            top_tick: params.top_tick,
            liquidity_delta: liquidity_desired,
        };
        self.call_plugin(HookKind::BeforeModifyPosition, |plugin, ctx| {
            plugin.before_modify_position(ctx, sender, &modify_params)
        })?;

        let (amount0_desired, amount1_desired) = amounts_for_liquidity(
            &self.state.global,
            params.bottom_tick,
            params.top_tick,
            params.liquidity_desired,
            true,
        )?;

        let balance0_before = self.pool_balance(Token::Token0);
        let balance1_before = self.pool_balance(Token::Token1);
        callback.mint_callback(self, amount0_desired, amount1_desired, &params.data)?;
        let received0 = self.pool_balance(Token::Token0).saturating_sub(balance0_before);
        let received1 = self.pool_balance(Token::Token1).saturating_sub(balance1_before);

        // shrink the liquidity to what the payment covers
        let mut liquidity_actual = U256::from(params.liquidity_desired);
        if received0 < amount0_desired {
            liquidity_actual = liquidity_actual.min(mul_div(
                U256::from(params.liquidity_desired),
                received0,
                amount0_desired,
            )?);
        }
        if received1 < amount1_desired {
            liquidity_actual = liquidity_actual.min(mul_div(
                U256::from(params.liquidity_desired),
                received1,
                amount1_desired,
            )?);
        }
        // never above the desired liquidity, which fits i128
        let liquidity_actual = liquidity_actual.as_u128();
        if liquidity_actual == 0 {
            return Err(PoolError::ZeroLiquidityActual);
        }

        let modify_params = ModifyPositionParams {
            liquidity_delta: liquidity_actual as i128,
            ..modify_params
        };
        let (amount0, amount1) = modify_position(&mut self.state, &modify_params)?;
        if amount0 > received0 || amount1 > received1 {
            return Err(PoolError::InsufficientAmountReceivedAtMint);
        }

        for (token, surplus) in [
            (Token::Token0, received0 - amount0),
            (Token::Token1, received1 - amount1),
        ] {
            if surplus > U256::ZERO {
                self.state
                    .ledger
                    .transfer_out(params.leftovers_recipient, token, surplus)?;
            }
        }
        self.sync_reserves();

        self.events.record(EventType::Mint {
            sender,
            owner: params.recipient,
            bottom_tick: params.bottom_tick,
            top_tick: params.top_tick,
            liquidity: liquidity_actual,
            amount0,
            amount1,
        });
        debug!(
            target: POOL,
            owner = %params.recipient,
            bottom_tick = params.bottom_tick,
            top_tick = params.top_tick,
            liquidity = liquidity_actual,
            "[mint]: position increased"
        );

        let delta = BalanceDelta::new(signed(amount0)?, signed(amount1)?);
        self.call_plugin(HookKind::AfterModifyPosition, |plugin, ctx| {
            plugin.after_modify_position(ctx, sender, &modify_params, delta)
        })?;

        Ok(MintResult {
            amount0,
            amount1,
            liquidity_actual,
        })
    }

    /// Removes `liquidity` from the caller's position. The released amounts
    /// are credited to the position and leave the pool only through
    /// `collect`. Burning zero refreshes the position's fees.
    pub fn burn(
        &mut self,
        owner: AccountId,
        bottom_tick: i32,
        top_tick: i32,
        liquidity: u128,
    ) -> Result<(U256, U256), PoolError> {
        self.transact("burn", |pool| {
            pool.require_initialized()?;
            check_ticks(bottom_tick, top_tick)?;
            let liquidity_delta = i128::try_from(liquidity)
                .ok()
                .and_then(i128::checked_neg)
                .ok_or(PoolError::LiquiditySub)?;
            pool.absorb_donations()?;

            let params = ModifyPositionParams {
                owner,
                bottom_tick,
                top_tick,
                liquidity_delta,
            };
            pool.call_plugin(HookKind::BeforeModifyPosition, |plugin, ctx| {
                plugin.before_modify_position(ctx, owner, &params)
            })?;

            let (amount0, amount1) = modify_position(&mut pool.state, &params)?;
            let key = PositionKey {
                owner,
                bottom_tick,
                top_tick,
            };
            pool.state.positions.add_owed(
                &key,
                u256_to_u128_saturating(amount0),
                u256_to_u128_saturating(amount1),
            );
            pool.sync_reserves();

            pool.events.record(EventType::Burn {
                owner,
                bottom_tick,
                top_tick,
                liquidity,
                amount0,
                amount1,
            });
            debug!(target: POOL, %owner, bottom_tick, top_tick, liquidity, "[burn]: position decreased");

            let delta = BalanceDelta::new(-signed(amount0)?, -signed(amount1)?);
            pool.call_plugin(HookKind::AfterModifyPosition, |plugin, ctx| {
                plugin.after_modify_position(ctx, owner, &params, delta)
            })?;
            Ok((amount0, amount1))
        })
    }

    /// Sends up to the requested amounts of what the caller's position is owed
    /// to `recipient`.
    pub fn collect(
        &mut self,
        owner: AccountId,
        recipient: AccountId,
        bottom_tick: i32,
        top_tick: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), PoolError> {
        self.transact("collect", |pool| {
            pool.require_initialized()?;
            pool.absorb_donations()?;
            let key = PositionKey {
                owner,
                bottom_tick,
                top_tick,
            };
            let (amount0, amount1) =
                pool.state
                    .positions
                    .collect(&key, amount0_requested, amount1_requested);
            for (token, amount) in [(Token::Token0, amount0), (Token::Token1, amount1)] {
                if amount > 0 {
                    pool.state
                        .ledger
                        .transfer_out(recipient, token, U256::from(amount))?;
                }
            }
            pool.sync_reserves();

            pool.events.record(EventType::Collect {
                owner,
                recipient,
                bottom_tick,
                top_tick,
                amount0,
                amount1,
            });
            debug!(target: POOL, %owner, %recipient, amount0, amount1, "[collect]: fees collected");
            Ok((amount0, amount1))
        })
    }
}
