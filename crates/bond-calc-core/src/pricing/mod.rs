//! Present value of a cash-flow schedule and bullet-bond pricing.
//!
//! Discount factors are accumulated by iterative multiplication (never
//! `powd()`). Discount factors and running totals use checked arithmetic, so
//! extreme yields surface as [`BondCalcError::ArithmeticDegenerate`].

pub mod schedule;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::types::{
    is_degenerate, out_of_range, with_metadata, ComputationOutput, Money, Rate, Years,
};
use crate::BondCalcResult;

use schedule::{validate_periodic_yield, BondSpec, CashflowSchedule};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A bond plus the annual yield it is valued at. Shared by the price,
/// duration, convexity and risk calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondValuationInput {
    pub bond: BondSpec,
    /// Annual yield to maturity as a decimal
    pub annual_yield: Rate,
}

/// One discounted payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedCashflow {
    pub period: u32,
    /// period / periods_per_year
    pub time_years: Years,
    /// Coupon plus principal paid in this period
    pub amount: Money,
    /// 1 / (1 + r)^period
    pub discount_factor: Decimal,
    pub present_value: Money,
}

/// Present value of a schedule with its coupon / principal split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// coupon_pv + principal_pv
    pub present_value: Money,
    /// Discounted coupon portion of every period
    pub coupon_pv: Money,
    /// Discounted face-value repayment
    pub principal_pv: Money,
    /// Per-period discount rate used
    pub periodic_yield: Rate,
    pub total_periods: u32,
    pub discounted_cashflows: Vec<DiscountedCashflow>,
}

/// Output of [`bond_price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPriceOutput {
    #[serde(flatten)]
    pub pricing: PricingResult,
    pub coupon_per_period: Money,
    /// annual_coupon / price
    pub current_yield: Rate,
}

impl BondPriceOutput {
    pub fn price(&self) -> Money {
        self.pricing.present_value
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Discount every payment of `schedule` at the per-period rate
/// `periodic_yield`: `PV = sum_t amount_t / (1 + r)^t`.
pub fn present_value(
    schedule: &CashflowSchedule,
    periodic_yield: Rate,
) -> BondCalcResult<PricingResult> {
    validate_periodic_yield(periodic_yield)?;

    let one_plus_r = Decimal::ONE
        .checked_add(periodic_yield)
        .ok_or_else(|| out_of_range("discounting: 1 + r"))?;
    let periods_per_year = schedule.periods_per_year();

    let mut coupon_pv = Decimal::ZERO;
    let mut principal_pv = Decimal::ZERO;
    let mut discounted = Vec::with_capacity(schedule.len());
    let mut growth = Decimal::ONE; // (1 + r)^t accumulator
    let mut compounded_to = 0u32;

    for cf in schedule.iter() {
        while compounded_to < cf.period {
            growth = growth
                .checked_mul(one_plus_r)
                .ok_or_else(|| overflow(cf.period))?;
            compounded_to += 1;
        }

        let pv_coupon = discount(cf.coupon, growth, cf.period)?;
        let pv_principal = discount(cf.principal, growth, cf.period)?;
        let discount_factor = discount(Decimal::ONE, growth, cf.period)?;

        coupon_pv = coupon_pv
            .checked_add(pv_coupon)
            .ok_or_else(|| out_of_range("coupon present value"))?;
        principal_pv = principal_pv
            .checked_add(pv_principal)
            .ok_or_else(|| out_of_range("principal present value"))?;
        discounted.push(DiscountedCashflow {
            period: cf.period,
            time_years: cf.time_years(periods_per_year),
            amount: cf.amount()?,
            discount_factor,
            present_value: pv_coupon
                .checked_add(pv_principal)
                .ok_or_else(|| out_of_range("period present value"))?,
        });
    }

    let present_value = coupon_pv
        .checked_add(principal_pv)
        .ok_or_else(|| out_of_range("bond present value"))?;

    Ok(PricingResult {
        present_value,
        coupon_pv,
        principal_pv,
        periodic_yield,
        total_periods: schedule.total_periods(),
        discounted_cashflows: discounted,
    })
}

/// Build the schedule for `bond` and discount it at `annual_yield / m`.
pub fn bond_price(bond: &BondSpec, annual_yield: Rate) -> BondCalcResult<BondPriceOutput> {
    let schedule = CashflowSchedule::build(bond)?;
    let periodic_yield = bond.periodic_yield(annual_yield)?;
    let pricing = present_value(&schedule, periodic_yield)?;

    if is_degenerate(pricing.present_value) {
        return Err(BondCalcError::ArithmeticDegenerate {
            context: "current yield: bond price is zero".into(),
        });
    }
    let current_yield = bond
        .annual_coupon
        .checked_div(pricing.present_value)
        .ok_or_else(|| out_of_range("current yield"))?;

    Ok(BondPriceOutput {
        pricing,
        coupon_per_period: bond.coupon_per_period(),
        current_yield,
    })
}

/// Price a bond and wrap the result in the standard envelope.
pub fn calculate_bond_price(
    input: &BondValuationInput,
) -> BondCalcResult<ComputationOutput<BondPriceOutput>> {
    let output = bond_price(&input.bond, input.annual_yield)?;

    let assumptions = serde_json::json!({
        "periods_per_year": input.bond.periods_per_year,
        "compounding": "per period at annual_yield / periods_per_year",
        "settlement": "assumed on coupon date (no accrued interest)",
    });

    Ok(with_metadata(
        "Bond Price (present value of coupons and principal)",
        &assumptions,
        input.bond.schedule_warnings(),
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn discount(amount: Money, growth: Decimal, period: u32) -> BondCalcResult<Money> {
    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    amount
        .checked_div(growth)
        .ok_or_else(|| BondCalcError::ArithmeticDegenerate {
            context: format!("discounting: discount factor out of range at period {period}"),
        })
}

fn overflow(period: u32) -> BondCalcError {
    BondCalcError::ArithmeticDegenerate {
        context: format!("discounting: (1 + r)^t overflowed at period {period}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::schedule::ScheduledCashflow;
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal, label: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "{label}: expected ~{expected}, got {actual} (diff {diff} > tolerance {tolerance})"
        );
    }

    /// 5% annual coupon, 10 years, priced at 5%.
    fn annual_par_bond() -> BondSpec {
        BondSpec::new(dec!(50), dec!(1000), 1, dec!(10))
    }

    #[test]
    fn test_annual_par_bond_breakdown() {
        let out = bond_price(&annual_par_bond(), dec!(0.05)).unwrap();

        assert_close(out.price(), dec!(1000), dec!(0.000001), "price");
        assert_close(out.pricing.coupon_pv, dec!(386.09), dec!(0.005), "coupon PV");
        assert_close(out.pricing.principal_pv, dec!(613.91), dec!(0.005), "principal PV");
        assert_close(out.current_yield, dec!(0.05), dec!(0.00005), "current yield");
        assert_eq!(out.pricing.total_periods, 10);
        assert_eq!(out.coupon_per_period, dec!(50));
    }

    #[test]
    fn test_coupon_and_principal_sum_to_price() {
        let out = bond_price(&annual_par_bond(), dec!(0.07)).unwrap();
        assert_eq!(
            out.pricing.coupon_pv + out.pricing.principal_pv,
            out.pricing.present_value
        );
        let summed: Decimal = out
            .pricing
            .discounted_cashflows
            .iter()
            .map(|d| d.present_value)
            .sum();
        assert_close(summed, out.price(), dec!(0.0000000001), "per-period sum");
    }

    #[test]
    fn test_semi_annual_par_bond() {
        let bond = BondSpec::new(dec!(60), dec!(1000), 2, dec!(5));
        let out = bond_price(&bond, dec!(0.06)).unwrap();

        assert_close(out.price(), dec!(1000), dec!(0.000001), "price");
        assert_eq!(out.pricing.periodic_yield, dec!(0.03));
        assert_eq!(out.pricing.total_periods, 10);
        assert_eq!(out.coupon_per_period, dec!(30));
    }

    #[test]
    fn test_discount_factors_decrease() {
        let out = bond_price(&annual_par_bond(), dec!(0.05)).unwrap();
        let factors: Vec<Decimal> = out
            .pricing
            .discounted_cashflows
            .iter()
            .map(|d| d.discount_factor)
            .collect();
        assert!(factors.windows(2).all(|w| w[1] < w[0]));
        assert_close(
            factors[0],
            Decimal::ONE / dec!(1.05),
            dec!(0.0000000001),
            "first discount factor",
        );
    }

    #[test]
    fn test_present_value_with_gaps() {
        // Payments only in periods 2 and 4 at 10% per period.
        let schedule = CashflowSchedule::from_cashflows(
            1,
            vec![
                ScheduledCashflow {
                    period: 2,
                    coupon: dec!(121),
                    principal: Decimal::ZERO,
                },
                ScheduledCashflow {
                    period: 4,
                    coupon: Decimal::ZERO,
                    principal: dec!(146.41),
                },
            ],
        )
        .unwrap();

        let result = present_value(&schedule, dec!(0.10)).unwrap();
        assert_eq!(result.coupon_pv, dec!(100));
        assert_eq!(result.principal_pv, dec!(100));
        assert_eq!(result.present_value, dec!(200));
        assert_eq!(result.total_periods, 4);
    }

    #[test]
    fn test_yield_at_minus_one_rejected() {
        let schedule = CashflowSchedule::build(&annual_par_bond()).unwrap();
        let err = present_value(&schedule, dec!(-1)).unwrap_err();
        match err {
            BondCalcError::InvalidInput { field, .. } => assert_eq!(field, "annual_yield"),
            other => panic!("Expected InvalidInput for annual_yield, got {other:?}"),
        }
    }

    #[test]
    fn test_overflow_is_degenerate_not_panic() {
        let bond = BondSpec::new(dec!(50), dec!(1000), 1, dec!(100));
        let err = bond_price(&bond, dec!(1000)).unwrap_err();
        assert!(
            matches!(err, BondCalcError::ArithmeticDegenerate { .. }),
            "Expected ArithmeticDegenerate, got {err:?}"
        );
    }

    #[test]
    fn test_growing_coupon_sum_is_degenerate_not_panic() {
        // At -50% every discounted coupon doubles; the running sum leaves the
        // decimal range long before 100 periods.
        let bond = BondSpec::new(dec!(50), dec!(1000), 1, dec!(100));
        let err = bond_price(&bond, dec!(-0.5)).unwrap_err();
        assert!(
            matches!(err, BondCalcError::ArithmeticDegenerate { .. }),
            "Expected ArithmeticDegenerate, got {err:?}"
        );
    }

    #[test]
    fn test_envelope_reports_truncation() {
        let input = BondValuationInput {
            bond: BondSpec::new(dec!(50), dec!(1000), 1, dec!(2.5)),
            annual_yield: dec!(0.05),
        };
        let out = calculate_bond_price(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.methodology.contains("Bond Price"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.result.pricing.total_periods, 2);
    }
}
