use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::pricing::schedule::{validate_periodic_yield, CashflowSchedule, YieldAssumption};
use crate::pricing::{present_value, BondValuationInput, PricingResult};
use crate::types::{
    is_degenerate, out_of_range, with_metadata, ComputationOutput, Money, Rate, Years,
};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Output of [`calculate_duration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationOutput {
    /// Present value of the bond at the stated yield
    pub price: Money,
    /// Weighted-average time of cash flows (in years)
    pub macaulay_duration: Years,
    /// Macaulay duration / (1 + y/freq) -- percentage price sensitivity
    pub modified_duration: Decimal,
    pub periodic_yield: Rate,
    pub total_periods: u32,
}

/// Modified duration from a known Macaulay duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedDurationInput {
    pub macaulay_duration: Years,
    /// Annual yield to maturity as a decimal
    pub annual_yield: Rate,
    pub periods_per_year: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedDurationOutput {
    pub macaulay_duration: Years,
    pub modified_duration: Decimal,
    pub periodic_yield: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Macaulay duration of an already-priced schedule:
/// `sum_t (t / m) * PV(CF_t) / PV`, so the result is in years whatever the
/// payment frequency.
pub fn macaulay_from_pricing(pricing: &PricingResult) -> BondCalcResult<Years> {
    if is_degenerate(pricing.present_value) {
        return Err(BondCalcError::ArithmeticDegenerate {
            context: "Macaulay duration: bond price is zero".into(),
        });
    }

    let weighted_sum = pricing
        .discounted_cashflows
        .iter()
        .try_fold(Decimal::ZERO, |acc, d| {
            d.time_years
                .checked_mul(d.present_value)
                .and_then(|weighted| acc.checked_add(weighted))
        })
        .ok_or_else(|| out_of_range("Macaulay duration: time-weighted present value"))?;

    weighted_sum
        .checked_div(pricing.present_value)
        .ok_or_else(|| out_of_range("Macaulay duration"))
}

/// Macaulay duration in years of `schedule` discounted at `periodic_yield`.
pub fn macaulay_duration(schedule: &CashflowSchedule, periodic_yield: Rate) -> BondCalcResult<Years> {
    let pricing = present_value(schedule, periodic_yield)?;
    macaulay_from_pricing(&pricing)
}

/// `ModDur = MacDur / (1 + r)` with `r` the per-period yield.
pub fn modified_duration(macaulay_duration: Years, periodic_yield: Rate) -> BondCalcResult<Decimal> {
    validate_periodic_yield(periodic_yield)?;
    Decimal::ONE
        .checked_add(periodic_yield)
        .and_then(|one_plus_r| macaulay_duration.checked_div(one_plus_r))
        .ok_or_else(|| out_of_range("modified duration"))
}

/// Price, Macaulay and modified duration of a bullet bond.
pub fn duration(input: &BondValuationInput) -> BondCalcResult<DurationOutput> {
    let schedule = CashflowSchedule::build(&input.bond)?;
    let periodic_yield = input.bond.periodic_yield(input.annual_yield)?;
    let pricing = present_value(&schedule, periodic_yield)?;

    let macaulay = macaulay_from_pricing(&pricing)?;
    let modified = modified_duration(macaulay, periodic_yield)?;

    Ok(DurationOutput {
        price: pricing.present_value,
        macaulay_duration: macaulay,
        modified_duration: modified,
        periodic_yield,
        total_periods: pricing.total_periods,
    })
}

/// Calculate Macaulay and modified duration and wrap them in the standard
/// envelope.
pub fn calculate_duration(
    input: &BondValuationInput,
) -> BondCalcResult<ComputationOutput<DurationOutput>> {
    let output = duration(input)?;

    let assumptions = serde_json::json!({
        "periods_per_year": input.bond.periods_per_year,
        "time_unit": "years (period index / periods_per_year)",
        "settlement": "assumed on coupon date (no accrued interest)",
    });

    Ok(with_metadata(
        "Macaulay & Modified Duration",
        &assumptions,
        input.bond.schedule_warnings(),
        output,
    ))
}

/// Modified duration from a user-supplied Macaulay duration.
pub fn calculate_modified_duration(
    input: &ModifiedDurationInput,
) -> BondCalcResult<ComputationOutput<ModifiedDurationOutput>> {
    if input.macaulay_duration < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "macaulay_duration".into(),
            reason: "Macaulay duration must be non-negative.".into(),
        });
    }
    let periodic_yield =
        YieldAssumption::new(input.annual_yield).periodic_rate(input.periods_per_year)?;
    let modified = modified_duration(input.macaulay_duration, periodic_yield)?;

    let assumptions = serde_json::json!({
        "periods_per_year": input.periods_per_year,
    });

    Ok(with_metadata(
        "Modified Duration (Macaulay / (1 + y/m))",
        &assumptions,
        Vec::new(),
        ModifiedDurationOutput {
            macaulay_duration: input.macaulay_duration,
            modified_duration: modified,
            periodic_yield,
        },
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::schedule::BondSpec;
    use rust_decimal_macros::dec;

    fn valuation(bond: BondSpec, annual_yield: Rate) -> BondValuationInput {
        BondValuationInput { bond, annual_yield }
    }

    /// Standard 10-year, 5% semi-annual bond at 5% YTM (priced at par).
    fn par_bond_input() -> BondValuationInput {
        valuation(BondSpec::new(dec!(50), dec!(1000), 2, dec!(10)), dec!(0.05))
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal, label: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "{label}: expected ~{expected}, got {actual} (diff {diff} > tolerance {tolerance})"
        );
    }

    #[test]
    fn test_zero_coupon_macaulay_equals_maturity() {
        let input = valuation(BondSpec::new(dec!(0), dec!(1000), 2, dec!(10)), dec!(0.05));
        let out = duration(&input).unwrap();
        assert_close(
            out.macaulay_duration,
            dec!(10),
            dec!(0.0000001),
            "Zero-coupon Macaulay duration should equal maturity",
        );
    }

    #[test]
    fn test_five_year_six_percent_annual() {
        let input = valuation(BondSpec::new(dec!(60), dec!(1000), 1, dec!(5)), dec!(0.06));
        let out = duration(&input).unwrap();
        assert_close(out.price, dec!(1000), dec!(0.000001), "price");
        assert_close(out.macaulay_duration, dec!(4.4651), dec!(0.0001), "Macaulay");
    }

    #[test]
    fn test_five_year_six_percent_semi_annual() {
        let input = valuation(BondSpec::new(dec!(60), dec!(1000), 2, dec!(5)), dec!(0.06));
        let out = duration(&input).unwrap();
        assert_close(out.price, dec!(1000), dec!(0.000001), "price");
        assert_close(out.macaulay_duration, dec!(4.3931), dec!(0.0001), "Macaulay");
        assert_close(out.modified_duration, dec!(4.2651), dec!(0.0001), "modified");
    }

    #[test]
    fn test_modified_duration_relationship() {
        let out = duration(&par_bond_input()).unwrap();
        assert_eq!(
            out.modified_duration,
            out.macaulay_duration / (Decimal::ONE + dec!(0.025))
        );
    }

    #[test]
    fn test_coupon_bond_macaulay_less_than_maturity() {
        let out = duration(&par_bond_input()).unwrap();
        assert!(out.macaulay_duration < dec!(10));
        assert!(out.macaulay_duration > Decimal::ZERO);
    }

    #[test]
    fn test_higher_coupon_lower_duration() {
        let low = duration(&par_bond_input()).unwrap();
        let mut high_input = par_bond_input();
        high_input.bond.annual_coupon = dec!(80);
        let high = duration(&high_input).unwrap();

        assert!(
            high.macaulay_duration < low.macaulay_duration,
            "Higher coupon ({}) should have lower duration than lower coupon ({})",
            high.macaulay_duration,
            low.macaulay_duration
        );
    }

    #[test]
    fn test_semiannual_vs_annual_duration() {
        let semi = duration(&par_bond_input()).unwrap();
        let mut annual_input = par_bond_input();
        annual_input.bond.periods_per_year = 1;
        let annual = duration(&annual_input).unwrap();

        assert!(semi.macaulay_duration < annual.macaulay_duration);
    }

    #[test]
    fn test_schedule_level_functions_agree() {
        let input = par_bond_input();
        let schedule = CashflowSchedule::build(&input.bond).unwrap();
        let mac = macaulay_duration(&schedule, dec!(0.025)).unwrap();
        assert_eq!(mac, duration(&input).unwrap().macaulay_duration);
    }

    #[test]
    fn test_modified_from_macaulay() {
        let input = ModifiedDurationInput {
            macaulay_duration: dec!(4.4651),
            annual_yield: dec!(0.06),
            periods_per_year: 1,
        };
        let out = calculate_modified_duration(&input).unwrap();
        assert_eq!(out.result.modified_duration, dec!(4.4651) / dec!(1.06));
        assert_eq!(out.result.periodic_yield, dec!(0.06));
    }

    #[test]
    fn test_negative_macaulay_rejected() {
        let input = ModifiedDurationInput {
            macaulay_duration: dec!(-1),
            annual_yield: dec!(0.06),
            periods_per_year: 1,
        };
        match calculate_modified_duration(&input).unwrap_err() {
            BondCalcError::InvalidInput { field, .. } => assert_eq!(field, "macaulay_duration"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_modified_duration_rejects_minus_one() {
        assert!(matches!(
            modified_duration(dec!(5), dec!(-1)),
            Err(BondCalcError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_negative_ytm_works() {
        let mut input = par_bond_input();
        input.annual_yield = dec!(-0.005);
        let out = duration(&input).unwrap();
        assert!(out.macaulay_duration > Decimal::ZERO);
        assert!(out.price > input.bond.face_value);
    }

    #[test]
    fn test_envelope() {
        let out = calculate_duration(&par_bond_input()).unwrap();
        assert!(out.methodology.contains("Duration"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_time_weighted_sum_overflow_is_degenerate() {
        let bond = BondSpec::new(Decimal::ZERO, dec!(7000000000000000000000000000), 1, dec!(20));
        let err = duration(&valuation(bond, Decimal::ZERO)).unwrap_err();
        assert!(
            matches!(err, BondCalcError::ArithmeticDegenerate { .. }),
            "Expected ArithmeticDegenerate, got {err:?}"
        );
    }
}
