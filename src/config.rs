use serde::{Deserialize, Serialize};

use crate::{
    balances::types::AccountId,
    error::PoolError,
    libraries::constants::{
        DEFAULT_FEE, DEFAULT_TICK_SPACING, MAX_COMMUNITY_FEE, MAX_TICK_SPACING, MIN_TICK_SPACING,
    },
    plugin::PluginConfig,
};

/// Parameters a pool is created with.
///
/// ```json
/// { "owner": "0101010101010101010101010101010101010101", "fee": 3000, "tick_spacing": 60 }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    pub owner: AccountId,
    /// Initial fee in hundredths of a basis point.
    pub fee: u16,
    pub tick_spacing: i32,
    /// Per-mille share of fees kept for the community vault.
    pub community_fee: u16,
    pub plugin_config: u8,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            owner: AccountId::default(),
            fee: DEFAULT_FEE,
            tick_spacing: DEFAULT_TICK_SPACING,
            community_fee: 0,
            plugin_config: 0,
        }
    }
}

impl PoolConfig {
    pub fn from_json(json: &str) -> Result<Self, PoolError> {
        let config: PoolConfig =
            serde_json::from_str(json).map_err(|err| PoolError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if !(MIN_TICK_SPACING..=MAX_TICK_SPACING).contains(&self.tick_spacing) {
            return Err(PoolError::InvalidTickSpacing(self.tick_spacing));
        }
        if self.community_fee > MAX_COMMUNITY_FEE {
            return Err(PoolError::InvalidCommunityFee(self.community_fee));
        }
        Ok(())
    }

    pub fn plugin_config(&self) -> PluginConfig {
        PluginConfig(self.plugin_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = PoolConfig::from_json(r#"{"fee": 3000}"#).unwrap();
        assert_eq!(config.fee, 3000);
        assert_eq!(config.tick_spacing, DEFAULT_TICK_SPACING);
        assert_eq!(config.owner, AccountId::default());
    }

    #[test]
    fn owner_is_a_hex_string() {
        let config = PoolConfig::from_json(
            r#"{"owner": "0202020202020202020202020202020202020202", "community_fee": 100}"#,
        )
        .unwrap();
        assert_eq!(config.owner, AccountId::new([2; 20]));
        assert_eq!(config.community_fee, 100);
    }

    #[test]
    fn rejects_unknown_fields_and_bad_values() {
        assert!(matches!(
            PoolConfig::from_json(r#"{"fees": 1}"#),
            Err(PoolError::InvalidConfig(_))
        ));
        assert_eq!(
            PoolConfig::from_json(r#"{"tick_spacing": 501}"#),
            Err(PoolError::InvalidTickSpacing(501))
        );
        assert_eq!(
            PoolConfig::from_json(r#"{"tick_spacing": 0}"#),
            Err(PoolError::InvalidTickSpacing(0))
        );
        assert_eq!(
            PoolConfig::from_json(r#"{"community_fee": 1001}"#),
            Err(PoolError::InvalidCommunityFee(1001))
        );
    }
}
