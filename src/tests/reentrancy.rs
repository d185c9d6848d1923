use ethnum::{I256, U256};

use super::*;

const LP: u8 = 1;
const TRADER: u8 = 2;

/// Pays like [`Payer`] but first tries to run another operation on the pool,
/// remembering how that attempt ended.
struct Reentrant {
    payer: Payer,
    attempts: Vec<Result<(), PoolError>>,
    propagate: bool,
}

impl Reentrant {
    fn new(account: AccountId, propagate: bool) -> Self {
        Self {
            payer: Payer::new(account),
            attempts: vec![],
            propagate,
        }
    }

    fn reenter(&mut self, pool: &mut Pool) -> Result<(), PoolError> {
        let account = self.payer.account;
        let attempts = [
            swap(pool, account, true, 1_000).map(|_| ()),
            pool.burn(account, -600, 600, 0).map(|_| ()),
            pool.collect(account, account, -600, 600, 1, 1).map(|_| ()),
            pool.set_fee(owner(), 1234),
            pool.initialize(U256::ONE << 96),
            pool.fund(account, Token::Token0, U256::new(1_000)),
        ];
        for attempt in attempts {
            if self.propagate {
                attempt.clone()?;
            }
            self.attempts.push(attempt);
        }
        Ok(())
    }
}

impl MintCallback for Reentrant {
    fn mint_callback(
        &mut self,
        pool: &mut Pool,
        amount0_owed: U256,
        amount1_owed: U256,
        data: &[u8],
    ) -> Result<(), PoolError> {
        self.reenter(pool)?;
        self.payer.mint_callback(pool, amount0_owed, amount1_owed, data)
    }
}

impl SwapCallback for Reentrant {
    fn swap_callback(
        &mut self,
        pool: &mut Pool,
        amount0_delta: I256,
        amount1_delta: I256,
        data: &[u8],
    ) -> Result<(), PoolError> {
        self.reenter(pool)?;
        self.payer.swap_callback(pool, amount0_delta, amount1_delta, data)
    }
}

impl FlashCallback for Reentrant {
    fn flash_callback(
        &mut self,
        pool: &mut Pool,
        fee0: U256,
        fee1: U256,
        data: &[u8],
    ) -> Result<(), PoolError> {
        self.reenter(pool)?;
        self.payer.flash_callback(pool, fee0, fee1, data)
    }
}

fn setup() -> Pool {
    let mut pool = pool_at_price_one(3000, 60);
    fund_both(&mut pool, account(LP), 10 * ONE_ETHER);
    fund_both(&mut pool, account(TRADER), 10 * ONE_ETHER);
    mint(&mut pool, account(LP), -600, 600, ONE_ETHER).unwrap();
    pool
}

fn assert_all_locked(callback: &Reentrant) {
    assert_eq!(callback.attempts.len(), 6);
    for attempt in &callback.attempts {
        assert_eq!(attempt, &Err(PoolError::Locked));
    }
}

#[test]
fn nested_calls_from_a_swap_callback_are_rejected() {
    let mut pool = setup();
    let mut callback = Reentrant::new(account(TRADER), false);
    pool.swap(
        account(TRADER),
        swap_params(account(TRADER), true, 1_000_000),
        &mut callback,
    )
    .unwrap();
    assert_all_locked(&callback);
    assert!(!pool.is_locked());
    assert_eq!(pool.global_state().fee, 3000);
}

#[test]
fn nested_calls_from_a_mint_callback_are_rejected() {
    let mut pool = setup();
    let mut callback = Reentrant::new(account(TRADER), false);
    let params = MintParams {
        leftovers_recipient: account(TRADER),
        recipient: account(TRADER),
        bottom_tick: -600,
        top_tick: 600,
        liquidity_desired: 1_000_000,
        data: vec![],
    };
    pool.mint(account(TRADER), params, &mut callback).unwrap();
    assert_all_locked(&callback);
    assert!(!pool.is_locked());
}

#[test]
fn nested_calls_from_a_flash_callback_are_rejected() {
    let mut pool = setup();
    let mut callback = Reentrant::new(account(TRADER), false);
    callback.payer.loan = (U256::new(1_000), U256::ZERO);
    pool.flash(
        account(TRADER),
        FlashParams {
            recipient: account(TRADER),
            amount0: U256::new(1_000),
            amount1: U256::ZERO,
            data: vec![],
        },
        &mut callback,
    )
    .unwrap();
    assert_all_locked(&callback);
}

#[test]
fn propagated_lock_error_rolls_the_operation_back() {
    let mut pool = setup();
    let state_before = pool.state().clone();
    let events_before = pool.events().len();

    let mut callback = Reentrant::new(account(TRADER), true);
    let result = pool.swap(
        account(TRADER),
        swap_params(account(TRADER), true, 1_000_000),
        &mut callback,
    );
    assert_eq!(result, Err(PoolError::Locked));
    assert_eq!(pool.state(), &state_before);
    assert_eq!(pool.events().len(), events_before);
    assert!(!pool.is_locked());

    // the pool is usable again
    swap(&mut pool, account(TRADER), true, 1_000_000).unwrap();
}

#[test]
fn transfers_from_callbacks_are_allowed() {
    let mut pool = setup();
    let balance_before = pool.pool_balance(Token::Token0);
    swap(&mut pool, account(TRADER), true, 1_000_000).unwrap();
    assert_eq!(
        pool.pool_balance(Token::Token0),
        balance_before + U256::new(1_000_000)
    );
}
