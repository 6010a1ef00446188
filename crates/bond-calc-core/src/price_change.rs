//! First- and second-order estimates of a bond's price move for a given
//! yield shock.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::types::{out_of_range, with_metadata, ComputationOutput, Money, Rate};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChangeInput {
    pub modified_duration: Decimal,
    /// Change in annual yield as a decimal (0.01 = +100 bps)
    pub yield_shock: Rate,
    pub current_price: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationConvexityInput {
    pub modified_duration: Decimal,
    /// Annualized convexity (analytical or approximate)
    pub convexity: Decimal,
    pub yield_shock: Rate,
    pub current_price: Money,
}

/// Duration-only estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationPriceChange {
    /// -ModDur * dy, as a decimal
    pub percent_change: Rate,
    pub dollar_change: Money,
    pub estimated_price: Money,
}

/// Duration plus convexity estimate, with the duration-only figure alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPriceChange {
    /// -ModDur * dy
    pub duration_effect: Rate,
    /// 0.5 * C * dy^2
    pub convexity_effect: Rate,
    pub total_percent_change: Rate,
    pub duration_dollar_change: Money,
    pub convexity_dollar_change: Money,
    pub total_dollar_change: Money,
    pub estimated_price: Money,
    pub duration_only: DurationPriceChange,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// `%dP ~ -ModDur * dy`; the new price is `P * (1 + %dP)`.
pub fn duration_price_change(
    modified_duration: Decimal,
    yield_shock: Rate,
    current_price: Money,
) -> BondCalcResult<DurationPriceChange> {
    validate(modified_duration, current_price)?;

    let percent_change = modified_duration
        .checked_mul(yield_shock)
        .map(|v| -v)
        .ok_or_else(|| out_of_range("duration effect"))?;
    let dollar_change = current_price
        .checked_mul(percent_change)
        .ok_or_else(|| out_of_range("duration dollar change"))?;
    let estimated_price = current_price
        .checked_add(dollar_change)
        .ok_or_else(|| out_of_range("estimated price"))?;

    Ok(DurationPriceChange {
        percent_change,
        dollar_change,
        estimated_price,
    })
}

/// `%dP ~ -ModDur * dy + 0.5 * C * dy^2`.
pub fn duration_convexity_price_change(
    modified_duration: Decimal,
    convexity: Decimal,
    yield_shock: Rate,
    current_price: Money,
) -> BondCalcResult<CombinedPriceChange> {
    let duration_only = duration_price_change(modified_duration, yield_shock, current_price)?;

    let duration_effect = duration_only.percent_change;
    let convexity_effect = convexity
        .checked_mul(yield_shock)
        .and_then(|v| v.checked_mul(yield_shock))
        .map(|v| dec!(0.5) * v)
        .ok_or_else(|| out_of_range("convexity effect"))?;
    let total_percent_change = duration_effect
        .checked_add(convexity_effect)
        .ok_or_else(|| out_of_range("total percent change"))?;

    let duration_dollar_change = duration_only.dollar_change;
    let convexity_dollar_change = current_price
        .checked_mul(convexity_effect)
        .ok_or_else(|| out_of_range("convexity dollar change"))?;
    let total_dollar_change = current_price
        .checked_mul(total_percent_change)
        .ok_or_else(|| out_of_range("total dollar change"))?;
    let estimated_price = current_price
        .checked_add(total_dollar_change)
        .ok_or_else(|| out_of_range("estimated price"))?;

    Ok(CombinedPriceChange {
        duration_effect,
        convexity_effect,
        total_percent_change,
        duration_dollar_change,
        convexity_dollar_change,
        total_dollar_change,
        estimated_price,
        duration_only,
    })
}

pub fn calculate_price_change(
    input: &PriceChangeInput,
) -> BondCalcResult<ComputationOutput<DurationPriceChange>> {
    let output =
        duration_price_change(input.modified_duration, input.yield_shock, input.current_price)?;
    let assumptions = serde_json::json!({
        "yield_shock": input.yield_shock.to_string(),
        "order": "first (duration only)",
    });
    Ok(with_metadata(
        "Price Change (Duration)",
        &assumptions,
        Vec::new(),
        output,
    ))
}

pub fn calculate_duration_convexity_change(
    input: &DurationConvexityInput,
) -> BondCalcResult<ComputationOutput<CombinedPriceChange>> {
    let output = duration_convexity_price_change(
        input.modified_duration,
        input.convexity,
        input.yield_shock,
        input.current_price,
    )?;
    let assumptions = serde_json::json!({
        "yield_shock": input.yield_shock.to_string(),
        "order": "second (duration + convexity)",
    });
    Ok(with_metadata(
        "Price Change (Duration + Convexity)",
        &assumptions,
        Vec::new(),
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate(modified_duration: Decimal, current_price: Money) -> BondCalcResult<()> {
    if modified_duration < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "modified_duration".into(),
            reason: "Modified duration must be non-negative.".into(),
        });
    }
    if current_price <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "current_price".into(),
            reason: "Current price must be positive.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
