use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::io::{BufRead, Write};

use bond_calc_core::convexity::{analytical_convexity, approximate_convexity};
use bond_calc_core::duration::{self, ModifiedDurationInput};
use bond_calc_core::price_change::{duration_convexity_price_change, duration_price_change};
use bond_calc_core::pricing::{bond_price, BondValuationInput};
use bond_calc_core::{BondSpec, CashflowSchedule, Rate};

use super::prompt::Prompter;
use super::{MenuError, MenuOption};

const BASIS_POINTS: Decimal = dec!(10000);

/// Run the screen behind a menu choice. `Exit` is handled by the caller.
pub fn run<R: BufRead, W: Write>(
    option: MenuOption,
    p: &mut Prompter<R, W>,
) -> Result<(), MenuError> {
    match option {
        MenuOption::BondPriceAnnual => bond_price_annual(p),
        MenuOption::BondPriceSemiAnnual => bond_price_semi_annual(p),
        MenuOption::MacaulayDuration => macaulay(p),
        MenuOption::ModifiedDuration => modified(p),
        MenuOption::PriceChangeDuration => price_change(p),
        MenuOption::AnalyticalConvexity => convexity(p),
        MenuOption::ApproximateConvexity => approx_convexity(p),
        MenuOption::DurationConvexity => duration_plus_convexity(p),
        MenuOption::Exit => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

fn bond_price_annual<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<(), MenuError> {
    p.heading("BOND PRICE - ANNUAL")?;
    let annual_coupon = p.decimal("Annual Coupon ($): ", None, None)?;
    let face_value = p.decimal("Face Value ($): ", None, None)?;
    let annual_yield = p.percent("Yield to Maturity (%): ")?;
    let years = p.integer("Years to Maturity: ", Some(1), None)?;

    let bond = BondSpec::new(annual_coupon, face_value, 1, Decimal::from(years));
    let out = bond_price(&bond, annual_yield)?;

    let w = p.out();
    writeln!(w, "\nRESULTS:")?;
    writeln!(w, "PV of Coupons: {}", money(out.pricing.coupon_pv))?;
    writeln!(w, "PV of Principal: {}", money(out.pricing.principal_pv))?;
    writeln!(w, "Bond Price: {}", money(out.price()))?;
    writeln!(w, "Current Yield: {}", percent(out.current_yield, 2))?;
    p.pause()
}

fn bond_price_semi_annual<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
) -> Result<(), MenuError> {
    p.heading("BOND PRICE - SEMI-ANNUAL")?;
    let annual_coupon = p.decimal("Annual Coupon ($): ", None, None)?;
    let face_value = p.decimal("Face Value ($): ", None, None)?;
    let annual_yield = p.percent("Annual Yield to Maturity (%): ")?;
    let years = p.decimal("Years to Maturity: ", Some(Decimal::ZERO), None)?;

    let bond = BondSpec::new(annual_coupon, face_value, 2, years);
    let out = bond_price(&bond, annual_yield)?;

    let w = p.out();
    writeln!(w, "\nRESULTS:")?;
    writeln!(w, "Periods: {}", out.pricing.total_periods)?;
    writeln!(w, "Coupon/Period: {}", money(out.coupon_per_period))?;
    writeln!(w, "Yield/Period: {}", percent(out.pricing.periodic_yield, 4))?;
    writeln!(w, "PV of Coupons: {}", money(out.pricing.coupon_pv))?;
    writeln!(w, "PV of Principal: {}", money(out.pricing.principal_pv))?;
    writeln!(w, "Bond Price: {}", money(out.price()))?;
    writeln!(w, "Current Yield: {}", percent(out.current_yield, 2))?;
    p.pause()
}

fn macaulay<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<(), MenuError> {
    p.heading("MACAULAY DURATION")?;
    let input = read_valuation(p, "Annual Yield to Maturity (%): ")?;
    let out = duration::duration(&input)?;

    let w = p.out();
    writeln!(w, "\nRESULTS:")?;
    writeln!(w, "Bond Price: {}", money(out.price))?;
    writeln!(w, "Macaulay Duration: {} years", fixed(out.macaulay_duration, 4))?;
    p.pause()
}

fn modified<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<(), MenuError> {
    p.heading("MODIFIED DURATION")?;
    writeln!(p.out(), "1. Calculate from bond parameters")?;
    writeln!(p.out(), "2. Calculate from Macaulay Duration")?;
    let choice = p.integer("Choice (1-2): ", Some(1), Some(2))?;

    if choice == 1 {
        let input = read_valuation(p, "Annual Yield to Maturity (%): ")?;
        let out = duration::duration(&input)?;

        let w = p.out();
        writeln!(w, "\nRESULTS:")?;
        writeln!(w, "Bond Price: {}", money(out.price))?;
        writeln!(w, "Macaulay Duration: {} years", fixed(out.macaulay_duration, 4))?;
        writeln!(w, "Modified Duration: {}", fixed(out.modified_duration, 4))?;
    } else {
        let macaulay_duration = p.decimal("Macaulay Duration: ", Some(Decimal::ZERO), None)?;
        let annual_yield = p.percent("Annual Yield to Maturity (%): ")?;
        let periods_per_year = read_frequency(p, "Payments per year: ")?;

        let out = duration::calculate_modified_duration(&ModifiedDurationInput {
            macaulay_duration,
            annual_yield,
            periods_per_year,
        })?
        .result;

        let w = p.out();
        writeln!(w, "\nRESULTS:")?;
        writeln!(w, "Modified Duration: {}", fixed(out.modified_duration, 4))?;
    }
    p.pause()
}

fn price_change<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<(), MenuError> {
    p.heading("PRICE CHANGE - DURATION")?;
    let modified_duration = p.decimal("Modified Duration: ", Some(Decimal::ZERO), None)?;
    let yield_shock = p.percent("Yield Change (%): ")?;
    let current_price = p.decimal("Current Bond Price ($): ", Some(Decimal::ZERO), None)?;

    let out = duration_price_change(modified_duration, yield_shock, current_price)?;

    let w = p.out();
    writeln!(w, "\nRESULTS:")?;
    writeln!(w, "Percentage Change: {}", percent(out.percent_change, 2))?;
    writeln!(w, "Dollar Change: {}", money(out.dollar_change))?;
    writeln!(w, "New Price: {}", money(out.estimated_price))?;
    p.pause()
}

fn convexity<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<(), MenuError> {
    p.heading("ANALYTICAL CONVEXITY")?;
    let input = read_valuation(p, "Annual Yield to Maturity (%): ")?;
    let schedule = CashflowSchedule::build(&input.bond)?;
    let periodic_yield = input.bond.periodic_yield(input.annual_yield)?;
    let out = analytical_convexity(&schedule, periodic_yield)?;

    let w = p.out();
    writeln!(w, "\nRESULTS:")?;
    writeln!(w, "Bond Price: {}", money(out.price))?;
    writeln!(w, "Convexity: {}", fixed(out.convexity, 4))?;
    writeln!(w, "Convexity (periods^2): {}", fixed(out.periodic_convexity, 4))?;
    p.pause()
}

fn approx_convexity<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> Result<(), MenuError> {
    p.heading("APPROXIMATE CONVEXITY")?;
    writeln!(p.out(), "Enter bond parameters:")?;
    let input = read_valuation(p, "Current Yield to Maturity (%): ")?;
    let shock_bps = p.decimal("Yield change for calculation (basis points): ", None, None)?;

    let out = approximate_convexity(&input.bond, input.annual_yield, shock_bps / BASIS_POINTS)?;

    let w = p.out();
    writeln!(w, "\nRESULTS:")?;
    writeln!(w, "P0 (current): ${}", fixed(out.price, 4))?;
    writeln!(w, "P- (yield down): ${}", fixed(out.price_down, 4))?;
    writeln!(w, "P+ (yield up): ${}", fixed(out.price_up, 4))?;
    writeln!(w, "Approximate Convexity: {}", fixed(out.convexity, 4))?;
    writeln!(w, "Effective Duration: {}", fixed(out.effective_duration, 4))?;
    p.pause()
}

fn duration_plus_convexity<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
) -> Result<(), MenuError> {
    p.heading("DURATION + CONVEXITY")?;
    let current_price = p.decimal("Current Bond Price ($): ", Some(Decimal::ZERO), None)?;
    let modified_duration = p.decimal("Modified Duration: ", Some(Decimal::ZERO), None)?;
    let convexity = p.decimal("Convexity: ", None, None)?;
    let yield_shock = p.percent("Yield Change (%): ")?;

    let out =
        duration_convexity_price_change(modified_duration, convexity, yield_shock, current_price)?;

    let w = p.out();
    writeln!(w, "\nRESULTS:")?;
    writeln!(
        w,
        "Duration Effect: {} ({})",
        percent(out.duration_effect, 2),
        money(out.duration_dollar_change)
    )?;
    writeln!(
        w,
        "Convexity Effect: {} ({})",
        percent(out.convexity_effect, 2),
        money(out.convexity_dollar_change)
    )?;
    writeln!(
        w,
        "Total Change: {} ({})",
        percent(out.total_percent_change, 2),
        money(out.total_dollar_change)
    )?;
    writeln!(w, "New Price: {}", money(out.estimated_price))?;
    writeln!(
        w,
        "Duration-only Price: {}",
        money(out.duration_only.estimated_price)
    )?;
    p.pause()
}

// ---------------------------------------------------------------------------
// Shared prompts and formatting
// ---------------------------------------------------------------------------

fn read_frequency<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    prompt: &str,
) -> Result<u32, MenuError> {
    let freq = p.integer(prompt, Some(1), Some(12))?;
    // Bounds above keep this in 1..=12.
    Ok(u32::try_from(freq).unwrap_or(1))
}

fn read_valuation<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    yield_prompt: &str,
) -> Result<BondValuationInput, MenuError> {
    let annual_coupon = p.decimal("Annual Coupon ($): ", None, None)?;
    let face_value = p.decimal("Face Value ($): ", None, None)?;
    let annual_yield: Rate = p.percent(yield_prompt)?;
    let years = p.decimal("Years to Maturity: ", Some(Decimal::ZERO), None)?;
    let periods_per_year = read_frequency(p, "Payments per year (1=annual, 2=semi): ")?;

    Ok(BondValuationInput {
        bond: BondSpec::new(annual_coupon, face_value, periods_per_year, years),
        annual_yield,
    })
}

fn fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

fn money(value: Decimal) -> String {
    if value.is_sign_negative() && !value.round_dp(2).is_zero() {
        format!("-${}", fixed(value.abs(), 2))
    } else {
        format!("${}", fixed(value.abs(), 2))
    }
}

fn percent(rate: Rate, dp: u32) -> String {
    format!("{}%", fixed(rate * Decimal::ONE_HUNDRED, dp))
}
