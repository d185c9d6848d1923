use ethnum::U256;
use tracing::info;

use crate::{
    balances::types::{AccountId, Token},
    error::PoolError,
    events::EventType,
    libraries::constants::{MAX_COMMUNITY_FEE, MAX_TICK_SPACING, MIN_TICK_SPACING},
    logs::ADMIN,
    plugin::{Plugin, PluginConfig},
};

use super::Pool;

impl Pool {
    fn only_owner(&self, caller: AccountId) -> Result<(), PoolError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(PoolError::NotAuthorized)
        }
    }

    /// Sets the fee manually. Only possible while the plugin does not control
    /// the fee.
    pub fn set_fee(&mut self, caller: AccountId, fee: u16) -> Result<(), PoolError> {
        self.transact("set_fee", |pool| {
            pool.only_owner(caller)?;
            if pool.state.global.plugin_config.dynamic_fee() {
                return Err(PoolError::DynamicFeeActive);
            }
            if pool.state.global.fee == fee {
                return Err(PoolError::FeeUnchanged(fee));
            }
            pool.state.global.fee = fee;
            pool.events.record(EventType::Fee { fee });
            info!(target: ADMIN, fee, "[set_fee]: fee changed");
            Ok(())
        })
    }

    /// Changes the spacing new positions have to respect. Existing positions
    /// keep working whatever their ticks.
    pub fn set_tick_spacing(&mut self, caller: AccountId, tick_spacing: i32) -> Result<(), PoolError> {
        self.transact("set_tick_spacing", |pool| {
            pool.only_owner(caller)?;
            if !(MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&tick_spacing) {
                return Err(PoolError::InvalidTickSpacing(tick_spacing));
            }
            if pool.state.global.tick_spacing == tick_spacing {
                return Err(PoolError::TickSpacingUnchanged(tick_spacing));
            }
            pool.state.global.tick_spacing = tick_spacing;
            pool.events.record(EventType::TickSpacing { tick_spacing });
            info!(target: ADMIN, tick_spacing, "[set_tick_spacing]: tick spacing changed");
            Ok(())
        })
    }

    pub fn set_community_fee(&mut self, caller: AccountId, community_fee: u16) -> Result<(), PoolError> {
        self.transact("set_community_fee", |pool| {
            pool.only_owner(caller)?;
            if community_fee > MAX_COMMUNITY_FEE {
                return Err(PoolError::InvalidCommunityFee(community_fee));
            }
            if pool.state.global.community_fee == community_fee {
                return Err(PoolError::CommunityFeeUnchanged(community_fee));
            }
            pool.state.global.community_fee = community_fee;
            pool.events.record(EventType::CommunityFee { community_fee });
            info!(target: ADMIN, community_fee, "[set_community_fee]: community fee changed");
            Ok(())
        })
    }

    /// Attaches, replaces or (with `None`) detaches the plugin. Plugins are
    /// told apart by their address.
    pub fn set_plugin(
        &mut self,
        caller: AccountId,
        plugin: Option<Box<dyn Plugin>>,
    ) -> Result<(), PoolError> {
        self.transact("set_plugin", |pool| {
            pool.only_owner(caller)?;
            let address = plugin.as_ref().map(|plugin| plugin.address());
            if pool.plugin_address() == address {
                return Err(PoolError::PluginUnchanged);
            }
            pool.plugin = plugin;
            pool.events.record(EventType::Plugin { plugin: address });
            info!(target: ADMIN, plugin = ?address, "[set_plugin]: plugin changed");
            Ok(())
        })
    }

    /// Changes which hooks are dispatched. Callable by the owner and by the
    /// attached plugin.
    pub fn set_plugin_config(
        &mut self,
        caller: AccountId,
        plugin_config: PluginConfig,
    ) -> Result<(), PoolError> {
        self.transact("set_plugin_config", |pool| {
            if pool.plugin_address() != Some(caller) {
                pool.only_owner(caller)?;
            }
            if pool.state.global.plugin_config == plugin_config {
                return Err(PoolError::PluginConfigUnchanged(plugin_config.0));
            }
            pool.state.global.plugin_config = plugin_config;
            pool.events.record(EventType::PluginConfig {
                plugin_config: plugin_config.0,
            });
            info!(target: ADMIN, plugin_config = plugin_config.0, "[set_plugin_config]: plugin config changed");
            Ok(())
        })
    }

    /// Sends the pending community fees to `recipient`.
    pub fn collect_community_fee(
        &mut self,
        caller: AccountId,
        recipient: AccountId,
    ) -> Result<(u128, u128), PoolError> {
        self.transact("collect_community_fee", |pool| {
            pool.only_owner(caller)?;
            pool.absorb_donations()?;
            let amount0 = pool.state.global.community_fee_pending0;
            let amount1 = pool.state.global.community_fee_pending1;
            pool.state.global.community_fee_pending0 = 0;
            pool.state.global.community_fee_pending1 = 0;
            for (token, amount) in [(Token::Token0, amount0), (Token::Token1, amount1)] {
                if amount > 0 {
                    pool.state
                        .ledger
                        .transfer_out(recipient, token, U256::from(amount))?;
                }
            }
            pool.sync_reserves();
            pool.events.record(EventType::CommunityFeeCollected {
                recipient,
                amount0,
                amount1,
            });
            info!(target: ADMIN, %recipient, amount0, amount1, "[collect_community_fee]: community fees sent");
            Ok((amount0, amount1))
        })
    }
}
