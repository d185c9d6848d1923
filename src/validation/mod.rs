use crate::{
    error::PoolError,
    libraries::constants::{MAX_TICK, MIN_TICK},
};

/// Range checks shared by every position operation.
pub fn check_ticks(bottom_tick: i32, top_tick: i32) -> Result<(), PoolError> {
    if bottom_tick >= top_tick {
        return Err(PoolError::TopTickLowerOrEqBottomTick);
    }
    if bottom_tick < MIN_TICK {
        return Err(PoolError::BottomTickLowerThanMIN);
    }
    if top_tick > MAX_TICK {
        return Err(PoolError::TopTickAboveMAX);
    }
    Ok(())
}

/// New liquidity may only be placed on ticks aligned to the current spacing.
/// Existing positions stay burnable after a spacing change.
pub fn check_spacing(bottom_tick: i32, top_tick: i32, tick_spacing: i32) -> Result<(), PoolError> {
    if bottom_tick % tick_spacing != 0 || top_tick % tick_spacing != 0 {
        return Err(PoolError::TickIsNotSpaced);
    }
    Ok(())
}

/// A one-sided position on a single tick covers `[tick, tick + 1)`. Only
/// `tick` has to be spaced, and the current tick must not fall inside it.
pub fn check_single_tick(tick: i32, tick_spacing: i32, current_tick: i32) -> Result<(), PoolError> {
    if tick % tick_spacing != 0 {
        return Err(PoolError::TickIsNotSpaced);
    }
    if tick == current_tick {
        return Err(PoolError::SingleTickInRange(tick));
    }
    Ok(())
}
