use std::collections::BTreeMap;

use ethnum::U256;
use types::{AccountId, Token};

pub mod types;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("{holder} holds {available} of {token:?}, {requested} requested")]
    InsufficientBalance {
        holder: String,
        token: Token,
        available: U256,
        requested: U256,
    },
}

/// Token balances of the pool and of the accounts it deals with.
///
/// This stands in for the two external token contracts: the pool only ever
/// observes its own balance, and counterparties pay it by moving funds from
/// their account.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenLedger {
    pool: [U256; 2],
    accounts: BTreeMap<(AccountId, Token), U256>,
}

impl TokenLedger {
    pub fn pool_balance(&self, token: Token) -> U256 {
        self.pool[token.index()]
    }

    pub fn balance_of(&self, account: AccountId, token: Token) -> U256 {
        self.accounts
            .get(&(account, token))
            .copied()
            .unwrap_or_default()
    }

    /// Credits an account out of thin air. Balances saturate.
    pub fn mint(&mut self, account: AccountId, token: Token, amount: U256) {
        let balance = self.accounts.entry((account, token)).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Moves `amount` from `from` into the pool.
    pub fn transfer_in(
        &mut self,
        from: AccountId,
        token: Token,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let available = self.balance_of(from, token);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                holder: from.to_string(),
                token,
                available,
                requested: amount,
            });
        }
        self.accounts.insert((from, token), available - amount);
        let pool = &mut self.pool[token.index()];
        *pool = pool.saturating_add(amount);
        Ok(())
    }

    /// Moves `amount` from the pool to `to`.
    pub fn transfer_out(
        &mut self,
        to: AccountId,
        token: Token,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let available = self.pool_balance(token);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                holder: "pool".to_string(),
                token,
                available,
                requested: amount,
            });
        }
        self.pool[token.index()] = available - amount;
        self.mint(to, token, amount);
        Ok(())
    }
}
