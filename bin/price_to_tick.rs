use clamm_core::{
    libraries::{safe_cast::big_uint_to_u256, tick_math::TickMath},
    logs::init_logging,
};
use num_bigint::ToBigUint;
use tracing::error;

// args: price (token1 per token0) and tick_spacing
fn main() {
    init_logging("info");
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: price_to_tick <price> <tick_spacing>");
        std::process::exit(1);
    }

    let Ok(price) = args[1].parse::<f64>() else {
        error!("[price_to_tick]: expected a floating number, got {}", args[1]);
        std::process::exit(1);
    };
    let tick_spacing = match args[2].parse::<i32>() {
        Ok(spacing) if spacing > 0 => spacing,
        _ => {
            error!("[price_to_tick]: expected a positive tick spacing, got {}", args[2]);
            std::process::exit(1);
        }
    };

    let sqrt_price_floating = price.sqrt() * 2_f64.powi(96);
    let Some(sqrt_price_x96) = sqrt_price_floating
        .to_biguint()
        .and_then(|value| big_uint_to_u256(value).ok())
    else {
        error!("[price_to_tick]: price {price} has no Q64.96 square root");
        std::process::exit(1);
    };

    match TickMath::tick_at_sqrt_price(sqrt_price_x96) {
        Ok(tick) => {
            // round towards negative infinity onto the spacing grid
            let aligned = tick.div_euclid(tick_spacing) * tick_spacing;
            println!("sqrt_price_x96 {sqrt_price_x96}, tick {tick}, aligned tick {aligned}");
        }
        Err(err) => {
            error!("[price_to_tick]: {err}");
            std::process::exit(1);
        }
    }
}
