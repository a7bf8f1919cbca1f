//! Pick & pack fee calculation functionality.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{OTHER_FEES_SHEET, OtherFees};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ProductSize, ShippingMode};

/// The result of resolving a pick & pack fee.
#[derive(Debug, Clone)]
pub struct PickAndPackFeeResult {
    /// The pick & pack fee amount.
    pub fee: Decimal,
    /// True when the fee was waived for FBA.
    pub waived: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the pick & pack fee for a shipping mode and parcel size.
///
/// FBA orders are never charged. Other modes pay the flat standard-size or
/// oversize/heavy & bulky rate.
///
/// # Errors
///
/// Returns `MissingRateCell` if the rate for the size is absent.
///
/// # Examples
///
/// ```
/// use seller_fee_engine::calculation::calculate_pick_and_pack_fee;
/// use seller_fee_engine::config::OtherFees;
/// use seller_fee_engine::models::{ProductSize, ShippingMode};
/// use rust_decimal::Decimal;
///
/// let result = calculate_pick_and_pack_fee(
///     &OtherFees::default(),
///     ShippingMode::Fba,
///     ProductSize::HeavyBulky,
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.fee, Decimal::ZERO);
/// ```
pub fn calculate_pick_and_pack_fee(
    other_fees: &OtherFees,
    mode: ShippingMode,
    size: ProductSize,
    step_number: u32,
) -> EngineResult<PickAndPackFeeResult> {
    let (fee, waived, reasoning) = if mode == ShippingMode::Fba {
        (
            Decimal::ZERO,
            true,
            "Pick & pack is included in FBA fulfilment; no fee".to_string(),
        )
    } else {
        let (rate, cell) = match size {
            ProductSize::Standard => (other_fees.pick_and_pack.standard, "standard"),
            ProductSize::HeavyBulky => (
                other_fees.pick_and_pack.oversize_heavy_bulky,
                "oversize_heavy_bulky",
            ),
        };

        let fee = rate.ok_or_else(|| {
            warn!(cell, "Pick & pack fee cell is absent");
            EngineError::MissingRateCell {
                table: "other.pick_and_pack".to_string(),
                cell: cell.to_string(),
            }
        })?;

        (
            fee,
            false,
            format!("{} {} parcel: flat pick & pack fee {}", mode, size, fee.normalize()),
        )
    };

    debug!(mode = mode.as_str(), size = size.as_str(), %fee, waived, "Pick & pack fee resolved");

    let audit_step = AuditStep {
        step_number,
        rule_id: "pick_and_pack_fee".to_string(),
        rule_name: "Pick & Pack Fee".to_string(),
        rate_source: OTHER_FEES_SHEET.to_string(),
        input: serde_json::json!({
            "shipping_mode": mode.as_str(),
            "product_size": size.as_str()
        }),
        output: serde_json::json!({
            "fee": fee.normalize().to_string(),
            "waived": waived
        }),
        reasoning,
    };

    Ok(PickAndPackFeeResult {
        fee,
        waived,
        audit_step,
    })
}
