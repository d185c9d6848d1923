// [Pool State]
//  ├── global: price, tick, fees, in-range liquidity, reserves
//  ├── ticks: TickTable<tick, TickInfo>, chained by neighbour links
//  ├── tick_tree: 3 level bitmap of initialized ticks
//  ├── positions: PositionLedger<PositionKey, PositionInfo>
//  └── ledger: token balances of the pool and its counterparties

use crate::{
    balances::{TokenLedger, types::Token},
    pool::types::GlobalState,
    position::PositionLedger,
    tick::{TickTable, tree::TickTree},
};

/// Everything an operation may change. Cloned as a checkpoint before each
/// operation and restored when it aborts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
    pub global: GlobalState,
    pub ticks: TickTable,
    pub tick_tree: TickTree,
    pub positions: PositionLedger,
    pub ledger: TokenLedger,
}

impl State {
    pub fn is_initialized(&self) -> bool {
        self.global.sqrt_price_x96 != ethnum::U256::ZERO
    }

    /// Ticks that are initialized in `[bottom_tick, top_tick]`, ascending.
    pub fn initialized_ticks(&self, bottom_tick: i32, top_tick: i32) -> Vec<i32> {
        let first = if self.tick_tree.is_initialized(bottom_tick) {
            bottom_tick
        } else {
            match self.tick_tree.next(bottom_tick, false) {
                (tick, true) => tick,
                _ => return vec![],
            }
        };
        self.ticks
            .walk(first, top_tick)
            .filter(|(_, info)| info.is_initialized())
            .map(|(tick, _)| tick)
            .collect()
    }

    pub fn reserve(&self, token: Token) -> u128 {
        match token {
            Token::Token0 => self.global.reserve0,
            Token::Token1 => self.global.reserve1,
        }
    }

    pub fn community_fee_pending(&self, token: Token) -> u128 {
        match token {
            Token::Token0 => self.global.community_fee_pending0,
            Token::Token1 => self.global.community_fee_pending1,
        }
    }
}
