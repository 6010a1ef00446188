use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::types::{Money, Rate, Years};
use crate::BondCalcResult;

/// Upper bound on the number of coupon periods a schedule may hold.
pub const MAX_TOTAL_PERIODS: u32 = 100_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Terms of a fixed-rate bullet bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondSpec {
    /// Annual coupon amount in currency units (50 for a 5% coupon on 1000 face)
    pub annual_coupon: Money,
    /// Principal repaid at maturity (e.g. 1000)
    pub face_value: Money,
    /// Coupon payments per year: 1 (annual), 2 (semi), 4 (quarterly), 12 (monthly)
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// Years remaining until maturity
    pub years_to_maturity: Years,
}

fn default_periods_per_year() -> u32 {
    1
}

/// Annual yield to maturity as a decimal (0.05 = 5%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YieldAssumption {
    pub annual_yield: Rate,
}

/// One payment date of a schedule, split into its coupon and principal parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCashflow {
    /// 1-based period index
    pub period: u32,
    pub coupon: Money,
    pub principal: Money,
}

/// Ordered, immutable list of per-period payments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowSchedule {
    periods_per_year: u32,
    cashflows: Vec<ScheduledCashflow>,
}

// ---------------------------------------------------------------------------
// BondSpec
// ---------------------------------------------------------------------------

impl BondSpec {
    pub fn new(
        annual_coupon: Money,
        face_value: Money,
        periods_per_year: u32,
        years_to_maturity: Years,
    ) -> Self {
        BondSpec {
            annual_coupon,
            face_value,
            periods_per_year,
            years_to_maturity,
        }
    }

    /// Build a spec from a coupon rate: `annual_coupon = face_value * coupon_rate`.
    pub fn from_coupon_rate(
        face_value: Money,
        coupon_rate: Rate,
        periods_per_year: u32,
        years_to_maturity: Years,
    ) -> Self {
        BondSpec::new(
            face_value * coupon_rate,
            face_value,
            periods_per_year,
            years_to_maturity,
        )
    }

    pub fn validate(&self) -> BondCalcResult<()> {
        if self.face_value <= Decimal::ZERO {
            return Err(BondCalcError::InvalidInput {
                field: "face_value".into(),
                reason: "Face value must be positive.".into(),
            });
        }
        if self.annual_coupon < Decimal::ZERO {
            return Err(BondCalcError::InvalidInput {
                field: "annual_coupon".into(),
                reason: "Coupon must be non-negative.".into(),
            });
        }
        if self.periods_per_year == 0 {
            return Err(BondCalcError::InvalidInput {
                field: "periods_per_year".into(),
                reason: "Payments per year must be at least 1.".into(),
            });
        }
        if self.years_to_maturity <= Decimal::ZERO {
            return Err(BondCalcError::InvalidInput {
                field: "years_to_maturity".into(),
                reason: "Years to maturity must be positive.".into(),
            });
        }
        Ok(())
    }

    /// `years_to_maturity * periods_per_year` before truncation.
    fn raw_periods(&self) -> BondCalcResult<Decimal> {
        self.years_to_maturity
            .checked_mul(Decimal::from(self.periods_per_year))
            .ok_or_else(|| BondCalcError::InvalidInput {
                field: "years_to_maturity".into(),
                reason: "Period count is out of range.".into(),
            })
    }

    /// Number of whole coupon periods. A trailing fractional period is dropped.
    pub fn total_periods(&self) -> BondCalcResult<u32> {
        self.validate()?;
        let periods = self.raw_periods()?.trunc().to_u32().unwrap_or(u32::MAX);
        if periods == 0 {
            return Err(BondCalcError::InvalidInput {
                field: "years_to_maturity".into(),
                reason: format!(
                    "Maturity must span at least one full period ({} per year).",
                    self.periods_per_year
                ),
            });
        }
        if periods > MAX_TOTAL_PERIODS {
            return Err(BondCalcError::InvalidInput {
                field: "years_to_maturity".into(),
                reason: format!("Schedule would exceed {MAX_TOTAL_PERIODS} periods."),
            });
        }
        Ok(periods)
    }

    /// True when `years_to_maturity * periods_per_year` is not a whole number.
    pub fn has_fractional_periods(&self) -> bool {
        self.raw_periods()
            .map(|p| !p.fract().is_zero())
            .unwrap_or(false)
    }

    pub fn coupon_per_period(&self) -> Money {
        if self.periods_per_year == 0 {
            return Decimal::ZERO;
        }
        self.annual_coupon / Decimal::from(self.periods_per_year)
    }

    /// Annual yield divided by payments per year.
    pub fn periodic_yield(&self, annual_yield: Rate) -> BondCalcResult<Rate> {
        YieldAssumption::new(annual_yield).periodic_rate(self.periods_per_year)
    }

    /// Warning text for the computation envelope when the maturity does not
    /// land on a period boundary.
    pub fn schedule_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.has_fractional_periods() {
            if let (Ok(raw), Ok(whole)) = (self.raw_periods(), self.total_periods()) {
                warnings.push(format!(
                    "years_to_maturity x periods_per_year = {} is not whole; \
                     priced {} full periods",
                    raw.normalize(),
                    whole
                ));
            }
        }
        warnings
    }
}

// ---------------------------------------------------------------------------
// YieldAssumption
// ---------------------------------------------------------------------------

impl YieldAssumption {
    pub fn new(annual_yield: Rate) -> Self {
        YieldAssumption { annual_yield }
    }

    /// Per-period discount rate `annual_yield / periods_per_year`.
    ///
    /// Rejects rates at or below -100% per period, where discount factors stop
    /// being positive.
    pub fn periodic_rate(&self, periods_per_year: u32) -> BondCalcResult<Rate> {
        if periods_per_year == 0 {
            return Err(BondCalcError::InvalidInput {
                field: "periods_per_year".into(),
                reason: "Payments per year must be at least 1.".into(),
            });
        }
        let r = self.annual_yield / Decimal::from(periods_per_year);
        validate_periodic_yield(r)?;
        Ok(r)
    }
}

pub(crate) fn validate_periodic_yield(periodic_yield: Rate) -> BondCalcResult<()> {
    if periodic_yield <= Decimal::NEGATIVE_ONE {
        return Err(BondCalcError::InvalidInput {
            field: "annual_yield".into(),
            reason: "Periodic yield must be greater than -1 (i.e. > -100%).".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CashflowSchedule
// ---------------------------------------------------------------------------

impl ScheduledCashflow {
    pub fn amount(&self) -> BondCalcResult<Money> {
        self.coupon
            .checked_add(self.principal)
            .ok_or_else(|| BondCalcError::ArithmeticDegenerate {
                context: format!(
                    "cash flow at period {}: coupon + principal out of range",
                    self.period
                ),
            })
    }

    /// Payment time in years for a schedule paying `periods_per_year` times.
    pub fn time_years(&self, periods_per_year: u32) -> Years {
        Decimal::from(self.period) / Decimal::from(periods_per_year.max(1))
    }
}

impl CashflowSchedule {
    /// Coupon every period, coupon plus face value in the last one.
    pub fn build(bond: &BondSpec) -> BondCalcResult<Self> {
        let total_periods = bond.total_periods()?;
        let coupon = bond.coupon_per_period();

        let cashflows = (1..=total_periods)
            .map(|t| ScheduledCashflow {
                period: t,
                coupon,
                principal: if t == total_periods {
                    bond.face_value
                } else {
                    Decimal::ZERO
                },
            })
            .collect();

        Ok(CashflowSchedule {
            periods_per_year: bond.periods_per_year,
            cashflows,
        })
    }

    /// Wrap an arbitrary list of payments. Periods must start at 1 or later
    /// and strictly increase.
    pub fn from_cashflows(
        periods_per_year: u32,
        cashflows: Vec<ScheduledCashflow>,
    ) -> BondCalcResult<Self> {
        if periods_per_year == 0 {
            return Err(BondCalcError::InvalidInput {
                field: "periods_per_year".into(),
                reason: "Payments per year must be at least 1.".into(),
            });
        }
        if cashflows.is_empty() {
            return Err(BondCalcError::InvalidInput {
                field: "cashflows".into(),
                reason: "Schedule must contain at least one payment.".into(),
            });
        }
        let mut previous = 0u32;
        for cf in &cashflows {
            if cf.period <= previous {
                return Err(BondCalcError::InvalidInput {
                    field: "cashflows".into(),
                    reason: format!(
                        "Period {} is out of order; periods must start at 1 and increase.",
                        cf.period
                    ),
                });
            }
            previous = cf.period;
        }
        if previous > MAX_TOTAL_PERIODS {
            return Err(BondCalcError::InvalidInput {
                field: "cashflows".into(),
                reason: format!("Schedule would exceed {MAX_TOTAL_PERIODS} periods."),
            });
        }
        Ok(CashflowSchedule {
            periods_per_year,
            cashflows,
        })
    }

    pub fn periods_per_year(&self) -> u32 {
        self.periods_per_year
    }

    pub fn cashflows(&self) -> &[ScheduledCashflow] {
        &self.cashflows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduledCashflow> {
        self.cashflows.iter()
    }

    /// Index of the last payment period.
    pub fn total_periods(&self) -> u32 {
        self.cashflows.last().map(|cf| cf.period).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.cashflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cashflows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn semi_annual_bond() -> BondSpec {
        BondSpec::new(dec!(60), dec!(1000), 2, dec!(5))
    }

    fn expect_invalid(result: BondCalcResult<impl std::fmt::Debug>, expected_field: &str) {
        match result {
            Err(BondCalcError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("Expected InvalidInput for {expected_field}, got {other:?}"),
        }
    }

    #[test]
    fn test_schedule_shape() {
        let schedule = CashflowSchedule::build(&semi_annual_bond()).unwrap();

        assert_eq!(schedule.len(), 10);
        assert_eq!(schedule.total_periods(), 10);
        assert_eq!(schedule.periods_per_year(), 2);
        for cf in &schedule.cashflows()[..9] {
            assert_eq!(cf.coupon, dec!(30));
            assert_eq!(cf.principal, Decimal::ZERO);
        }
        let last = schedule.cashflows().last().unwrap();
        assert_eq!(last.period, 10);
        assert_eq!(last.amount().unwrap(), dec!(1030));
    }

    #[test]
    fn test_fractional_maturity_truncates() {
        let bond = BondSpec::new(dec!(50), dec!(1000), 1, dec!(2.5));
        assert_eq!(bond.total_periods().unwrap(), 2);
        assert!(bond.has_fractional_periods());
        assert_eq!(bond.schedule_warnings().len(), 1);

        let semi = BondSpec::new(dec!(50), dec!(1000), 2, dec!(2.5));
        assert_eq!(semi.total_periods().unwrap(), 5);
        assert!(!semi.has_fractional_periods());
        assert!(semi.schedule_warnings().is_empty());
    }

    #[test]
    fn test_from_coupon_rate() {
        let bond = BondSpec::from_coupon_rate(dec!(1000), dec!(0.05), 2, dec!(10));
        assert_eq!(bond.annual_coupon, dec!(50));
        assert_eq!(bond.coupon_per_period(), dec!(25));
    }

    #[test]
    fn test_time_years() {
        let cf = ScheduledCashflow {
            period: 3,
            coupon: dec!(15),
            principal: Decimal::ZERO,
        };
        assert_eq!(cf.time_years(4), dec!(0.75));
        assert_eq!(cf.time_years(1), dec!(3));
    }

    #[test]
    fn test_validation_errors() {
        let mut bond = semi_annual_bond();
        bond.face_value = Decimal::ZERO;
        expect_invalid(CashflowSchedule::build(&bond), "face_value");

        let mut bond = semi_annual_bond();
        bond.annual_coupon = dec!(-1);
        expect_invalid(CashflowSchedule::build(&bond), "annual_coupon");

        let mut bond = semi_annual_bond();
        bond.periods_per_year = 0;
        expect_invalid(CashflowSchedule::build(&bond), "periods_per_year");

        let mut bond = semi_annual_bond();
        bond.years_to_maturity = dec!(-2);
        expect_invalid(CashflowSchedule::build(&bond), "years_to_maturity");
    }

    #[test]
    fn test_less_than_one_period_rejected() {
        let bond = BondSpec::new(dec!(50), dec!(1000), 1, dec!(0.5));
        expect_invalid(bond.total_periods(), "years_to_maturity");
    }

    #[test]
    fn test_periodic_rate() {
        let y = YieldAssumption::new(dec!(0.06));
        assert_eq!(y.periodic_rate(2).unwrap(), dec!(0.03));
        expect_invalid(y.periodic_rate(0), "periods_per_year");
        expect_invalid(YieldAssumption::new(dec!(-2)).periodic_rate(2), "annual_yield");
        assert!(YieldAssumption::new(dec!(-1.5)).periodic_rate(2).is_ok());
    }

    #[test]
    fn test_from_cashflows_requires_increasing_periods() {
        let flows = vec![
            ScheduledCashflow {
                period: 2,
                coupon: dec!(10),
                principal: Decimal::ZERO,
            },
            ScheduledCashflow {
                period: 2,
                coupon: dec!(10),
                principal: dec!(100),
            },
        ];
        expect_invalid(CashflowSchedule::from_cashflows(1, flows), "cashflows");
        expect_invalid(CashflowSchedule::from_cashflows(1, Vec::new()), "cashflows");
    }
}
