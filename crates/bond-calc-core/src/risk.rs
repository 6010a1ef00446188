use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::convexity::convexity_from_pricing;
use crate::duration::{macaulay_from_pricing, modified_duration};
use crate::pricing::schedule::CashflowSchedule;
use crate::pricing::{present_value, BondValuationInput};
use crate::types::{out_of_range, with_metadata, ComputationOutput, Money, Years};
use crate::BondCalcResult;

/// Duration and convexity of one bond at one yield, from a single pricing
/// pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub price: Money,
    pub macaulay_duration: Years,
    pub modified_duration: Decimal,
    /// Annualized analytical convexity (years^2)
    pub convexity: Decimal,
    /// Dollar value of one basis point (modified_duration * price * 0.0001)
    pub dv01: Money,
}

pub fn risk_metrics(input: &BondValuationInput) -> BondCalcResult<RiskMetrics> {
    let schedule = CashflowSchedule::build(&input.bond)?;
    let periodic_yield = input.bond.periodic_yield(input.annual_yield)?;
    let pricing = present_value(&schedule, periodic_yield)?;

    let macaulay = macaulay_from_pricing(&pricing)?;
    let modified = modified_duration(macaulay, periodic_yield)?;
    let convexity = convexity_from_pricing(&pricing, input.bond.periods_per_year)?.convexity;
    let dv01 = modified
        .checked_mul(pricing.present_value)
        .map(|v| v * dec!(0.0001))
        .ok_or_else(|| out_of_range("DV01"))?;

    Ok(RiskMetrics {
        price: pricing.present_value,
        macaulay_duration: macaulay,
        modified_duration: modified,
        convexity,
        dv01,
    })
}

pub fn calculate_risk_metrics(
    input: &BondValuationInput,
) -> BondCalcResult<ComputationOutput<RiskMetrics>> {
    let output = risk_metrics(input)?;

    let assumptions = serde_json::json!({
        "periods_per_year": input.bond.periods_per_year,
        "duration_units": "years",
        "convexity_units": "years^2",
    });

    Ok(with_metadata(
        "Bond Risk Metrics (Duration, Convexity, DV01)",
        &assumptions,
        input.bond.schedule_warnings(),
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convexity::analytical_convexity;
    use crate::duration::duration;
    use crate::pricing::schedule::BondSpec;

    #[test]
    fn test_matches_individual_calculations() {
        let input = BondValuationInput {
            bond: BondSpec::new(dec!(50), dec!(1000), 2, dec!(10)),
            annual_yield: dec!(0.05),
        };
        let metrics = risk_metrics(&input).unwrap();
        let dur = duration(&input).unwrap();
        let schedule = CashflowSchedule::build(&input.bond).unwrap();
        let conv = analytical_convexity(&schedule, dec!(0.025)).unwrap();

        assert_eq!(metrics.macaulay_duration, dur.macaulay_duration);
        assert_eq!(metrics.modified_duration, dur.modified_duration);
        assert_eq!(metrics.convexity, conv.convexity);
        assert_eq!(
            metrics.dv01,
            metrics.modified_duration * metrics.price * dec!(0.0001)
        );
        // ~7.8y modified duration on a ~1000 price
        assert!(metrics.dv01 > dec!(0.5) && metrics.dv01 < dec!(1.5));
    }
}
