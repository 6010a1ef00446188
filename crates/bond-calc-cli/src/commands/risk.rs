use serde_json::Value;

use bond_calc_core::convexity::{self, ApproximateConvexityInput};
use bond_calc_core::duration::{self, ModifiedDurationInput};
use bond_calc_core::pricing::BondValuationInput;
use bond_calc_core::risk;

use crate::input;

pub fn run_duration() -> Result<Value, Box<dyn std::error::Error>> {
    let dur_input: BondValuationInput = input::load("duration")?;
    let result = duration::calculate_duration(&dur_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_modified_duration() -> Result<Value, Box<dyn std::error::Error>> {
    let mod_input: ModifiedDurationInput =
        input::load("modified duration")?;
    let result = duration::calculate_modified_duration(&mod_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_convexity() -> Result<Value, Box<dyn std::error::Error>> {
    let conv_input: BondValuationInput = input::load("convexity")?;
    let result = convexity::calculate_analytical_convexity(&conv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_approx_convexity() -> Result<Value, Box<dyn std::error::Error>> {
    let approx_input: ApproximateConvexityInput =
        input::load("approximate convexity")?;
    tracing::debug!(yield_shock = %approx_input.yield_shock, "repricing at shifted yields");
    let result = convexity::calculate_approximate_convexity(&approx_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_risk() -> Result<Value, Box<dyn std::error::Error>> {
    let risk_input: BondValuationInput = input::load("risk metrics")?;
    let result = risk::calculate_risk_metrics(&risk_input)?;
    Ok(serde_json::to_value(result)?)
}
