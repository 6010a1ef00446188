use serde_json::Value;

use bond_calc_core::price_change::{self, DurationConvexityInput, PriceChangeInput};

use crate::input;

pub fn run_price_change() -> Result<Value, Box<dyn std::error::Error>> {
    let change_input: PriceChangeInput = input::load("price change")?;
    let result = price_change::calculate_price_change(&change_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_duration_convexity() -> Result<Value, Box<dyn std::error::Error>> {
    let change_input: DurationConvexityInput =
        input::load("duration + convexity")?;
    let result = price_change::calculate_duration_convexity_change(&change_input)?;
    Ok(serde_json::to_value(result)?)
}
