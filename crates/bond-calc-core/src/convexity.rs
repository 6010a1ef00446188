use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::pricing::schedule::{BondSpec, CashflowSchedule};
use crate::pricing::{bond_price, present_value, BondValuationInput, PricingResult};
use crate::types::{
    is_degenerate, out_of_range, with_metadata, ComputationOutput, Money, Rate,
};
use crate::BondCalcResult;

fn default_yield_shock() -> Rate {
    dec!(0.001)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Closed-form convexity. `convexity` is in years² (periodic value / m²) so
/// it pairs with a modified duration in years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticalConvexityOutput {
    pub price: Money,
    /// Convexity with t measured in periods
    pub periodic_convexity: Decimal,
    /// periodic_convexity / periods_per_year^2
    pub convexity: Decimal,
    pub periodic_yield: Rate,
}

/// Input for the finite-difference convexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproximateConvexityInput {
    pub bond: BondSpec,
    /// Base annual yield as a decimal
    pub annual_yield: Rate,
    /// Annual yield shock as a decimal (0.001 = 10 bps)
    #[serde(default = "default_yield_shock")]
    pub yield_shock: Rate,
}

/// Prices at y, y + dy and y - dy and the convexity and effective duration
/// they imply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproximateConvexityOutput {
    /// P0 at the base yield
    pub price: Money,
    /// P+ at yield + shock
    pub price_up: Money,
    /// P- at yield - shock
    pub price_down: Money,
    pub yield_shock: Rate,
    /// (P- + P+ - 2 P0) / (P0 dy^2)
    pub convexity: Decimal,
    /// (P- - P+) / (2 P0 dy)
    pub effective_duration: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Convexity of an already-priced schedule:
///
/// `C = sum_t PV(CF_t) * t * (t + 1) / (PV * (1 + r)^2)`, t in periods, then
/// divided by `m^2` to annualize.
pub fn convexity_from_pricing(
    pricing: &PricingResult,
    periods_per_year: u32,
) -> BondCalcResult<AnalyticalConvexityOutput> {
    let one_plus_r = Decimal::ONE + pricing.periodic_yield;
    let denominator = pricing
        .present_value
        .checked_mul(one_plus_r)
        .and_then(|v| v.checked_mul(one_plus_r))
        .ok_or_else(|| out_of_range("convexity: price * (1 + r)^2"))?;
    if is_degenerate(denominator) {
        return Err(BondCalcError::ArithmeticDegenerate {
            context: "convexity: price * (1 + r)^2 is zero".into(),
        });
    }

    let numerator = pricing
        .discounted_cashflows
        .iter()
        .try_fold(Decimal::ZERO, |acc, d| {
            let t = Decimal::from(d.period);
            d.present_value
                .checked_mul(t * (t + Decimal::ONE))
                .and_then(|weighted| acc.checked_add(weighted))
        })
        .ok_or_else(|| out_of_range("convexity: t(t+1)-weighted present value"))?;

    let periodic_convexity = numerator
        .checked_div(denominator)
        .ok_or_else(|| out_of_range("convexity"))?;
    let m = Decimal::from(periods_per_year.max(1));

    Ok(AnalyticalConvexityOutput {
        price: pricing.present_value,
        periodic_convexity,
        convexity: periodic_convexity / (m * m),
        periodic_yield: pricing.periodic_yield,
    })
}

/// Analytical convexity of `schedule` at the per-period rate `periodic_yield`.
pub fn analytical_convexity(
    schedule: &CashflowSchedule,
    periodic_yield: Rate,
) -> BondCalcResult<AnalyticalConvexityOutput> {
    let pricing = present_value(schedule, periodic_yield)?;
    convexity_from_pricing(&pricing, schedule.periods_per_year())
}

/// Finite-difference convexity from three full repricings of `bond`.
pub fn approximate_convexity(
    bond: &BondSpec,
    annual_yield: Rate,
    yield_shock: Rate,
) -> BondCalcResult<ApproximateConvexityOutput> {
    if yield_shock.is_zero() {
        return Err(BondCalcError::InvalidInput {
            field: "yield_shock".into(),
            reason: "Yield shock must be non-zero.".into(),
        });
    }

    let yield_up = annual_yield
        .checked_add(yield_shock)
        .ok_or_else(|| out_of_range("approximate convexity: y + dy"))?;
    let yield_down = annual_yield
        .checked_sub(yield_shock)
        .ok_or_else(|| out_of_range("approximate convexity: y - dy"))?;

    let price = bond_price(bond, annual_yield)?.price();
    let price_up = bond_price(bond, yield_up)?.price();
    let price_down = bond_price(bond, yield_down)?.price();

    if is_degenerate(price) {
        return Err(BondCalcError::ArithmeticDegenerate {
            context: "approximate convexity: base price is zero".into(),
        });
    }

    let convexity_denominator = price
        .checked_mul(yield_shock)
        .and_then(|v| v.checked_mul(yield_shock))
        .ok_or_else(|| out_of_range("approximate convexity: P0 * dy^2"))?;
    if is_degenerate(convexity_denominator) {
        return Err(BondCalcError::ArithmeticDegenerate {
            context: "approximate convexity: P0 * dy^2 is zero at this yield shock".into(),
        });
    }
    let duration_denominator = price
        .checked_mul(yield_shock)
        .and_then(|v| v.checked_mul(dec!(2)))
        .ok_or_else(|| out_of_range("effective duration: 2 * P0 * dy"))?;
    if is_degenerate(duration_denominator) {
        return Err(BondCalcError::ArithmeticDegenerate {
            context: "effective duration: 2 * P0 * dy is zero at this yield shock".into(),
        });
    }

    let curvature = price_down
        .checked_add(price_up)
        .and_then(|v| dec!(2).checked_mul(price).and_then(|twice| v.checked_sub(twice)))
        .ok_or_else(|| out_of_range("approximate convexity: P- + P+ - 2 P0"))?;
    let convexity = curvature
        .checked_div(convexity_denominator)
        .ok_or_else(|| out_of_range("approximate convexity"))?;
    let effective_duration = price_down
        .checked_sub(price_up)
        .and_then(|v| v.checked_div(duration_denominator))
        .ok_or_else(|| out_of_range("effective duration"))?;

    Ok(ApproximateConvexityOutput {
        price,
        price_up,
        price_down,
        yield_shock,
        convexity,
        effective_duration,
    })
}

/// Analytical convexity of a bullet bond in the standard envelope.
pub fn calculate_analytical_convexity(
    input: &BondValuationInput,
) -> BondCalcResult<ComputationOutput<AnalyticalConvexityOutput>> {
    let schedule = CashflowSchedule::build(&input.bond)?;
    let periodic_yield = input.bond.periodic_yield(input.annual_yield)?;
    let output = analytical_convexity(&schedule, periodic_yield)?;

    let assumptions = serde_json::json!({
        "periods_per_year": input.bond.periods_per_year,
        "units": "years^2 (periodic convexity / periods_per_year^2)",
    });

    Ok(with_metadata(
        "Analytical Convexity",
        &assumptions,
        input.bond.schedule_warnings(),
        output,
    ))
}

/// Approximate convexity in the standard envelope.
pub fn calculate_approximate_convexity(
    input: &ApproximateConvexityInput,
) -> BondCalcResult<ComputationOutput<ApproximateConvexityOutput>> {
    let output = approximate_convexity(&input.bond, input.annual_yield, input.yield_shock)?;

    let assumptions = serde_json::json!({
        "periods_per_year": input.bond.periods_per_year,
        "yield_shock": input.yield_shock.to_string(),
        "method": "central second difference of full repricings",
    });

    Ok(with_metadata(
        "Approximate Convexity (price differences)",
        &assumptions,
        input.bond.schedule_warnings(),
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
