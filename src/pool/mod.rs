//! The pool state machine.
//!
//! A [`Pool`] starts uninitialized and becomes usable once `initialize` sets
//! its price. Every operation runs under the pool lock and is all or nothing:
//! state, token ledger and event log are checkpointed on entry and restored if
//! the operation fails at any point, callbacks and hooks included.

use ethnum::U256;
use tracing::{debug, warn};

use crate::{
    balances::types::{AccountId, Token},
    config::PoolConfig,
    error::PoolError,
    events::{EventLog, EventType},
    guard::PoolLock,
    libraries::tick_math::TickMath,
    logs::{PLUGIN, POOL},
    plugin::{HookContext, HookKind, HookResult, Plugin},
    position::types::{PositionInfo, PositionKey},
    state::State,
    tick::types::TickInfo,
};

use types::GlobalState;

pub mod admin;
pub mod callbacks;
pub mod liquidity;
pub mod modify_position;
pub mod reserves;
pub mod swap;
pub mod trade;
pub mod types;


pub struct Pool {
    state: State,
    events: EventLog,
    lock: PoolLock,
    owner: AccountId,
    plugin: Option<Box<dyn Plugin>>,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("owner", &self.owner)
            .field("global", &self.state.global)
            .field("plugin", &self.plugin.as_ref().map(|plugin| plugin.address()))
            .field("locked", &self.lock.is_locked())
            .finish()
    }
}

impl Pool {
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let state = State {
            global: GlobalState {
                fee: config.fee,
                community_fee: config.community_fee,
                plugin_config: config.plugin_config(),
                tick_spacing: config.tick_spacing,
                ..GlobalState::default()
            },
            ..State::default()
        };
        Ok(Self {
            state,
            events: EventLog::default(),
            lock: PoolLock::default(),
            owner: config.owner,
            plugin: None,
        })
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn global_state(&self) -> &GlobalState {
        &self.state.global
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn plugin_address(&self) -> Option<AccountId> {
        self.plugin.as_ref().map(|plugin| plugin.address())
    }

    pub fn position(&self, owner: AccountId, bottom_tick: i32, top_tick: i32) -> Option<&PositionInfo> {
        self.state.positions.get(&PositionKey {
            owner,
            bottom_tick,
            top_tick,
        })
    }

    /// The one-sided position `owner` holds on `tick`.
    pub fn single_tick_position(&self, owner: AccountId, tick: i32) -> Option<&PositionInfo> {
        self.state.positions.get(&PositionKey::single_tick(owner, tick))
    }

    pub fn tick(&self, tick: i32) -> Option<&TickInfo> {
        self.state.ticks.get(tick)
    }

    pub fn pool_balance(&self, token: Token) -> U256 {
        self.state.ledger.pool_balance(token)
    }

    pub fn balance_of(&self, account: AccountId, token: Token) -> U256 {
        self.state.ledger.balance_of(account, token)
    }

    /// Credits an account with newly issued tokens it can later pay the pool
    /// with. Stands in for the token contracts, which live outside the pool.
    /// Refused while an operation is running.
    pub fn fund(
        &mut self,
        account: AccountId,
        token: Token,
        amount: U256,
    ) -> Result<(), PoolError> {
        if self.is_locked() {
            return Err(PoolError::Locked);
        }
        self.state.ledger.mint(account, token, amount);
        Ok(())
    }

    /// Moves tokens from `from` to the pool. This is how callbacks pay; outside
    /// of an operation the tokens are a donation booked by the next operation.
    pub fn transfer_to_pool(
        &mut self,
        from: AccountId,
        token: Token,
        amount: U256,
    ) -> Result<(), PoolError> {
        Ok(self.state.ledger.transfer_in(from, token, amount)?)
    }

    /// Sets the starting price. Allowed exactly once.
    pub fn initialize(&mut self, sqrt_price_x96: U256) -> Result<(), PoolError> {
        self.transact("initialize", |pool| {
            if pool.state.is_initialized() {
                return Err(PoolError::AlreadyInitialized);
            }
            let tick = TickMath::tick_at_sqrt_price(sqrt_price_x96)?;

            pool.state.global.sqrt_price_x96 = sqrt_price_x96;
            pool.state.global.tick = tick;
            pool.state.ticks.init_boundaries();
            pool.absorb_donations()?;
            pool.sync_reserves();
            pool.events.record(EventType::Initialize {
                sqrt_price_x96,
                tick,
            });
            debug!(target: POOL, %sqrt_price_x96, tick, "[initialize]: pool initialized");

            pool.call_plugin(HookKind::AfterInitialize, |plugin, ctx| {
                plugin.after_initialize(ctx, sqrt_price_x96, tick)
            })
        })
    }

    fn require_initialized(&self) -> Result<(), PoolError> {
        if self.state.is_initialized() {
            Ok(())
        } else {
            Err(PoolError::NotInitialized)
        }
    }

    /// Runs `operation` under the pool lock. On failure the state and the event
    /// log are put back exactly as they were.
    fn transact<R>(
        &mut self,
        name: &'static str,
        operation: impl FnOnce(&mut Pool) -> Result<R, PoolError>,
    ) -> Result<R, PoolError> {
        let _guard = self.lock.acquire().map_err(|_| {
            warn!(target: POOL, operation = name, "[{name}]: rejected, pool is locked");
            PoolError::Locked
        })?;
        let state_checkpoint = self.state.clone();
        let events_checkpoint = self.events.len();

        match operation(self) {
            Ok(result) => Ok(result),
            Err(err) => {
                self.state = state_checkpoint;
                self.events.truncate(events_checkpoint);
                warn!(target: POOL, operation = name, error = %err, "[{name}]: aborted, state restored");
                Err(err)
            }
        }
    }

    /// Dispatches one hook to the plugin if the pool's config enables it,
    /// checks the acknowledgement and applies a fee override.
    fn call_plugin(
        &mut self,
        kind: HookKind,
        call: impl FnOnce(&mut dyn Plugin, &mut HookContext<'_>) -> HookResult,
    ) -> Result<(), PoolError> {
        let config = self.state.global.plugin_config;
        if !config.has(kind.flag()) {
            return Ok(());
        }
        let Some(plugin) = self.plugin.as_deref_mut() else {
            return Ok(());
        };

        let mut ctx = HookContext::new(&self.state.global);
        let answer = call(plugin, &mut ctx)?;
        let fee_override = ctx.fee_override();

        if answer != kind.selector() {
            warn!(target: PLUGIN, hook = ?kind, %answer, "[plugin]: unexpected acknowledgement");
            return Err(PoolError::InvalidHookResponse {
                hook: kind,
                expected: kind.selector(),
                got: answer,
            });
        }

        if let Some(fee) = fee_override {
            if !kind.may_override_fee() || !config.dynamic_fee() {
                return Err(PoolError::FeeOverrideNotAllowed(kind));
            }
            if fee != self.state.global.fee {
                debug!(target: PLUGIN, hook = ?kind, fee, "[plugin]: fee override");
                self.state.global.fee = fee;
                self.events.record(EventType::Fee { fee });
            }
        }
        Ok(())
    }
}
