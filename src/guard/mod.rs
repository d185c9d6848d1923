#[cfg(test)]
mod tests;

use std::{cell::Cell, rc::Rc};

/// Reentrancy flag of a single pool. Every pool owns its own flag, so a call
/// into one pool never blocks another.
#[derive(Debug, Default, Clone)]
pub struct PoolLock {
    locked: Rc<Cell<bool>>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PoolLockError {
    AlreadyLocked,
}

/// Holds the lock of a pool until dropped.
#[derive(Debug)]
pub struct PoolGuard {
    locked: Rc<Cell<bool>>,
}

impl PoolLock {
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Sets the flag, failing if it is already set.
    pub fn acquire(&self) -> Result<PoolGuard, PoolLockError> {
        if self.locked.replace(true) {
            return Err(PoolLockError::AlreadyLocked);
        }
        Ok(PoolGuard {
            locked: Rc::clone(&self.locked),
        })
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        self.locked.set(false);
    }
}
