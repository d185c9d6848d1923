use clamm_core::{libraries::tick_math::TickMath, logs::init_logging};
use ethnum::U256;
use tracing::error;

fn main() {
    init_logging("info");
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: sqrtx96_to_tick <sqrt_price_x96>");
        std::process::exit(1);
    }

    let sqrt_price_x96 = match U256::from_str_radix(&args[1], 10) {
        Ok(value) => value,
        Err(err) => {
            error!("[sqrtx96_to_tick]: {} is not a number: {err}", args[1]);
            std::process::exit(1);
        }
    };

    match TickMath::tick_at_sqrt_price(sqrt_price_x96) {
        Ok(tick) => println!("tick for sqrt_x96 price {sqrt_price_x96} is {tick}"),
        Err(err) => {
            error!("[sqrtx96_to_tick]: {err}");
            std::process::exit(1);
        }
    }
}
