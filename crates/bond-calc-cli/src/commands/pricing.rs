use serde_json::Value;

use bond_calc_core::pricing::{self, BondValuationInput};

use crate::input;

pub fn run_price() -> Result<Value, Box<dyn std::error::Error>> {
    let price_input: BondValuationInput = input::load("bond price")?;
    tracing::debug!(
        periods_per_year = price_input.bond.periods_per_year,
        annual_yield = %price_input.annual_yield,
        "pricing bond"
    );
    let result = pricing::calculate_bond_price(&price_input)?;
    Ok(serde_json::to_value(result)?)
}
