use crate::guard::{PoolLock, PoolLockError};

#[test]
fn test_acquire_and_release() {
    let lock = PoolLock::default();
    assert!(!lock.is_locked());
    {
        let _guard = lock.acquire().unwrap();
        assert!(lock.is_locked());
    }
    assert!(!lock.is_locked());
}

#[test]
fn test_second_acquire_fails_while_held() {
    let lock = PoolLock::default();
    let _guard = lock.acquire().unwrap();
    assert_eq!(lock.acquire().unwrap_err(), PoolLockError::AlreadyLocked);
    // a failed acquire must not release the held lock
    assert!(lock.is_locked());
}

#[test]
fn test_release_on_early_return() {
    fn fails(lock: &PoolLock) -> Result<(), &'static str> {
        let _guard = lock.acquire().map_err(|_| "locked")?;
        Err("aborted")
    }

    let lock = PoolLock::default();
    assert_eq!(fails(&lock), Err("aborted"));
    assert!(!lock.is_locked());
    assert_eq!(fails(&lock), Err("aborted"));
}

#[test]
fn test_release_on_panic() {
    let lock = PoolLock::default();
    let cloned = lock.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _guard = cloned.acquire().unwrap();
        panic!("boom");
    }));
    assert!(result.is_err());
    assert!(!lock.is_locked());
}

#[test]
fn test_independent_locks() {
    let first = PoolLock::default();
    let second = PoolLock::default();
    let _guard = first.acquire().unwrap();
    assert!(second.acquire().is_ok());
}
