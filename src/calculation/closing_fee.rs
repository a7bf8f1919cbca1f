//! Closing fee calculation functionality.
//!
//! This module selects the closing-fee price bracket for a selling price and
//! reads the flat fee for the shipping mode's channel.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{BracketFees, CLOSING_FEES_SHEET, ClosingFees, PriceBracket};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ShippingMode};

/// The result of resolving a closing fee, including the bracket and audit step.
#[derive(Debug, Clone)]
pub struct ClosingFeeResult {
    /// The closing fee amount.
    pub fee: Decimal,
    /// The price bracket that was selected.
    pub bracket: PriceBracket,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the channel column a shipping mode reads from, with its table name.
fn channel(closing_fees: &ClosingFees, mode: ShippingMode) -> (&BracketFees, &'static str) {
    match mode {
        ShippingMode::Fba => (&closing_fees.fba_normal, "closing.fba_normal"),
        ShippingMode::EasyShip => (&closing_fees.easy_ship_standard, "closing.easy_ship_standard"),
        ShippingMode::SelfShip => (&closing_fees.self_ship, "closing.self_ship"),
    }
}

/// Calculates the closing fee for a shipping mode and selling price.
///
/// Brackets have inclusive upper bounds at 250, 500 and 1000. FBA reads the
/// normal-category column, Easy Ship the standard channel and Self Ship its
/// own column.
///
/// # Errors
///
/// Returns `MissingRateCell` if the selected cell is absent from the sheet.
///
/// # Examples
///
/// ```
/// use seller_fee_engine::calculation::calculate_closing_fee;
/// use seller_fee_engine::config::{ClosingFees, PriceBracket};
/// use seller_fee_engine::models::ShippingMode;
/// use rust_decimal::Decimal;
///
/// let mut fees = ClosingFees::default();
/// fees.self_ship.set(PriceBracket::UpTo1000, Some(Decimal::new(36, 0)));
///
/// let result = calculate_closing_fee(&fees, ShippingMode::SelfShip, Decimal::new(1000, 0), 1).unwrap();
/// assert_eq!(result.fee, Decimal::new(36, 0));
/// assert_eq!(result.bracket, PriceBracket::UpTo1000);
/// ```
pub fn calculate_closing_fee(
    closing_fees: &ClosingFees,
    mode: ShippingMode,
    price: Decimal,
    step_number: u32,
) -> EngineResult<ClosingFeeResult> {
    let bracket = PriceBracket::for_price(price);
    let (fees, table) = channel(closing_fees, mode);

    let fee = fees.get(bracket).ok_or_else(|| {
        warn!(table, bracket = bracket.as_str(), "Closing fee cell is absent");
        EngineError::MissingRateCell {
            table: table.to_string(),
            cell: bracket.as_str().to_string(),
        }
    })?;

    debug!(mode = mode.as_str(), bracket = bracket.as_str(), %fee, "Closing fee resolved");

    let audit_step = AuditStep {
        step_number,
        rule_id: "closing_fee".to_string(),
        rule_name: "Closing Fee".to_string(),
        rate_source: CLOSING_FEES_SHEET.to_string(),
        input: serde_json::json!({
            "shipping_mode": mode.as_str(),
            "price": price.normalize().to_string()
        }),
        output: serde_json::json!({
            "bracket": bracket.as_str(),
            "fee": fee.normalize().to_string()
        }),
        reasoning: format!(
            "Price {} falls in bracket {}; {} closing fee is {}",
            price.normalize(),
            bracket.as_str(),
            mode,
            fee.normalize()
        ),
    };

    Ok(ClosingFeeResult {
        fee,
        bracket,
        audit_step,
    })
}
