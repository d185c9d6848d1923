use ethnum::I256;

/// Token amounts of one pool operation seen from the pool: positive amounts are
/// owed to the pool, negative amounts are paid out by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceDelta {
    amount0: I256,
    amount1: I256,
}

impl BalanceDelta {
    pub fn new(amount0: I256, amount1: I256) -> BalanceDelta {
        BalanceDelta { amount0, amount1 }
    }

    pub fn amount0(&self) -> I256 {
        self.amount0
    }

    pub fn amount1(&self) -> I256 {
        self.amount1
    }
}
