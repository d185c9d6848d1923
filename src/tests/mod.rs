use ethnum::{I256, U256};

use crate::{
    balances::types::{AccountId, Token},
    config::PoolConfig,
    error::PoolError,
    libraries::{balance_delta::BalanceDelta, constants::Q96},
    pool::{
        Pool,
        callbacks::{FlashCallback, MintCallback, SwapCallback},
        types::{FlashParams, MintParams, MintResult, SwapParams},
    },
};

mod reentrancy;

pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

pub fn account(n: u8) -> AccountId {
    AccountId::new([n; 20])
}

pub fn owner() -> AccountId {
    account(0xaa)
}

/// Pays whatever the pool asks for out of `account`, adjusted by `shortfall`
/// (paid less) and `surplus` (paid more).
#[derive(Clone, Debug)]
pub struct Payer {
    pub account: AccountId,
    pub shortfall: U256,
    pub surplus: U256,
    /// Amounts borrowed through a flash, repaid on top of the fees.
    pub loan: (U256, U256),
}

impl Payer {
    pub fn new(account: AccountId) -> Self {
        Self {
            account,
            shortfall: U256::ZERO,
            surplus: U256::ZERO,
            loan: (U256::ZERO, U256::ZERO),
        }
    }

    fn pay(&self, pool: &mut Pool, token: Token, owed: U256) -> Result<(), PoolError> {
        if owed == U256::ZERO && self.surplus == U256::ZERO {
            return Ok(());
        }
        let amount = owed.saturating_sub(self.shortfall).saturating_add(self.surplus);
        pool.transfer_to_pool(self.account, token, amount)
    }
}

impl MintCallback for Payer {
    fn mint_callback(
        &mut self,
        pool: &mut Pool,
        amount0_owed: U256,
        amount1_owed: U256,
        _data: &[u8],
    ) -> Result<(), PoolError> {
        self.pay(pool, Token::Token0, amount0_owed)?;
        self.pay(pool, Token::Token1, amount1_owed)
    }
}

impl SwapCallback for Payer {
    fn swap_callback(
        &mut self,
        pool: &mut Pool,
        amount0_delta: I256,
        amount1_delta: I256,
        _data: &[u8],
    ) -> Result<(), PoolError> {
        if amount0_delta > I256::ZERO {
            self.pay(pool, Token::Token0, amount0_delta.as_u256())?;
        }
        if amount1_delta > I256::ZERO {
            self.pay(pool, Token::Token1, amount1_delta.as_u256())?;
        }
        Ok(())
    }
}

impl FlashCallback for Payer {
    fn flash_callback(
        &mut self,
        pool: &mut Pool,
        fee0: U256,
        fee1: U256,
        _data: &[u8],
    ) -> Result<(), PoolError> {
        self.pay(pool, Token::Token0, self.loan.0 + fee0)?;
        self.pay(pool, Token::Token1, self.loan.1 + fee1)
    }
}

pub fn config(fee: u16, tick_spacing: i32) -> PoolConfig {
    PoolConfig {
        owner: owner(),
        fee,
        tick_spacing,
        ..PoolConfig::default()
    }
}

/// A pool initialized at price 1.
pub fn pool_at_price_one(fee: u16, tick_spacing: i32) -> Pool {
    let mut pool = Pool::new(config(fee, tick_spacing)).unwrap();
    pool.initialize(*Q96).unwrap();
    pool
}

pub fn fund_both(pool: &mut Pool, account: AccountId, amount: u128) {
    pool.fund(account, Token::Token0, U256::from(amount)).unwrap();
    pool.fund(account, Token::Token1, U256::from(amount)).unwrap();
}

pub fn mint(
    pool: &mut Pool,
    owner: AccountId,
    bottom_tick: i32,
    top_tick: i32,
    liquidity: u128,
) -> Result<MintResult, PoolError> {
    let params = MintParams {
        leftovers_recipient: owner,
        recipient: owner,
        bottom_tick,
        top_tick,
        liquidity_desired: liquidity,
        data: vec![],
    };
    pool.mint(owner, params, &mut Payer::new(owner))
}

pub fn swap_params(recipient: AccountId, zero_for_one: bool, amount_required: i128) -> SwapParams {
    SwapParams {
        recipient,
        zero_for_one,
        amount_required: I256::new(amount_required),
        limit_sqrt_price: None,
        data: vec![],
    }
}

pub fn swap(
    pool: &mut Pool,
    trader: AccountId,
    zero_for_one: bool,
    amount_required: i128,
) -> Result<BalanceDelta, PoolError> {
    pool.swap(
        trader,
        swap_params(trader, zero_for_one, amount_required),
        &mut Payer::new(trader),
    )
}

pub fn flash(
    pool: &mut Pool,
    borrower: AccountId,
    amount0: u128,
    amount1: u128,
    payer: &mut Payer,
) -> Result<(U256, U256), PoolError> {
    payer.loan = (U256::from(amount0), U256::from(amount1));
    pool.flash(
        borrower,
        FlashParams {
            recipient: payer.account,
            amount0: U256::from(amount0),
            amount1: U256::from(amount1),
            data: vec![],
        },
        payer,
    )
}
