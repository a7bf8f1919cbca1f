//! Fee aggregation and the full fee calculation.
//!
//! This module sums the four resolved fees into a [`FeeBreakdown`] and runs
//! every resolver for a [`FeeRequest`], collecting the audit trace.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::RateTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, FeeBreakdown, FeeCalculation, FeeRequest,
};

use super::closing_fee::calculate_closing_fee;
use super::pick_and_pack_fee::calculate_pick_and_pack_fee;
use super::referral_fee::calculate_referral_fee;
use super::weight_handling_fee::calculate_weight_handling_fee;

/// Sums the four fees and computes net earnings.
///
/// Net earnings are not clamped; a negative result marks a listing that
/// loses money.
///
/// # Errors
///
/// - `InvalidInput` if the total does not fit in a `Decimal`
///
/// # Examples
///
/// ```
/// use seller_fee_engine::calculation::aggregate_fees;
/// use rust_decimal::Decimal;
///
/// let breakdown = aggregate_fees(
///     Decimal::new(100, 0),
///     Decimal::new(15, 0),
///     Decimal::new(313, 0),
///     Decimal::new(5, 0),
///     Decimal::new(26, 0),
/// )
/// .unwrap();
/// assert_eq!(breakdown.total_fees, Decimal::new(359, 0));
/// assert_eq!(breakdown.net_earnings, Decimal::new(-259, 0));
/// ```
pub fn aggregate_fees(
    selling_price: Decimal,
    referral_fee: Decimal,
    weight_handling_fee: Decimal,
    closing_fee: Decimal,
    pick_and_pack_fee: Decimal,
) -> EngineResult<FeeBreakdown> {
    let total_fees = referral_fee
        .checked_add(weight_handling_fee)
        .and_then(|sum| sum.checked_add(closing_fee))
        .and_then(|sum| sum.checked_add(pick_and_pack_fee))
        .ok_or_else(|| EngineError::out_of_range("total_fees"))?;
    let net_earnings = selling_price
        .checked_sub(total_fees)
        .ok_or_else(|| EngineError::out_of_range("net_earnings"))?;

    Ok(FeeBreakdown {
        referral_fee,
        weight_handling_fee,
        closing_fee,
        pick_and_pack_fee,
        total_fees,
        net_earnings,
    })
}

/// Calculates every seller fee for a listing.
///
/// The request is validated first. The resolvers then run in a fixed order
/// (referral, weight handling, closing, pick & pack) and each contributes one
/// audit step. A resolver error aborts the calculation; no partial result is
/// returned.
///
/// # Errors
///
/// - `InvalidInput` if the price is negative or the weight is not positive
/// - `MissingRateCell` if any resolver needs an absent rate
/// - `InvalidInput` if a fee or the total does not fit in a `Decimal`
///
/// # Examples
///
/// ```no_run
/// use seller_fee_engine::calculation::calculate_total_fees;
/// use seller_fee_engine::config::ConfigLoader;
/// use seller_fee_engine::models::{FeeRequest, Location, ProductSize, ServiceLevel, ShippingMode};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/marketplace").unwrap();
/// let request = FeeRequest {
///     category: "Books".to_string(),
///     selling_price: Decimal::new(500, 0),
///     shipping_mode: ShippingMode::EasyShip,
///     weight_kg: Decimal::new(12, 1),
///     service_level: ServiceLevel::Standard,
///     location: Location::Local,
///     product_size: ProductSize::Standard,
/// };
///
/// let result = calculate_total_fees(loader.rate_table(), &request).unwrap();
/// println!("Net earnings: {}", result.breakdown.net_earnings);
/// ```
pub fn calculate_total_fees(
    rate_table: &RateTable,
    request: &FeeRequest,
) -> EngineResult<FeeCalculation> {
    let start_time = Instant::now();
    request.validate()?;

    let mut steps: Vec<AuditStep> = Vec::with_capacity(4);
    let mut warnings: Vec<AuditWarning> = Vec::new();

    let referral = calculate_referral_fee(
        rate_table.referral(),
        &request.category,
        request.selling_price,
        1,
    )?;
    if referral.used_default {
        warnings.push(AuditWarning {
            code: "DEFAULT_REFERRAL_RATE".to_string(),
            message: format!(
                "No referral tier matched category '{}' at price {}; default {}% applied",
                request.category,
                request.selling_price.normalize(),
                referral.percentage.normalize()
            ),
            severity: "low".to_string(),
        });
    }
    steps.push(referral.audit_step);

    let weight_handling = calculate_weight_handling_fee(
        rate_table.weight_handling(),
        request.shipping_mode,
        request.weight_kg,
        request.service_level,
        request.location,
        request.product_size,
        2,
    )?;
    steps.push(weight_handling.audit_step);

    let closing = calculate_closing_fee(
        rate_table.closing(),
        request.shipping_mode,
        request.selling_price,
        3,
    )?;
    steps.push(closing.audit_step);

    let pick_and_pack = calculate_pick_and_pack_fee(
        rate_table.other(),
        request.shipping_mode,
        request.product_size,
        4,
    )?;
    steps.push(pick_and_pack.audit_step);

    let breakdown = aggregate_fees(
        request.selling_price,
        referral.fee,
        weight_handling.fee,
        closing.fee,
        pick_and_pack.fee,
    )?;

    if breakdown.net_earnings < Decimal::ZERO {
        warn!(
            category = %request.category,
            net_earnings = %breakdown.net_earnings,
            "Fees exceed selling price"
        );
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_EARNINGS".to_string(),
            message: format!(
                "Total fees {} exceed the selling price {}",
                breakdown.total_fees.normalize(),
                request.selling_price.normalize()
            ),
            severity: "medium".to_string(),
        });
    }

    debug!(
        total_fees = %breakdown.total_fees,
        net_earnings = %breakdown.net_earnings,
        "Fees aggregated"
    );

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(FeeCalculation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        selling_price: request.selling_price,
        breakdown,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        BracketFees, ClosingFees, EasyShipRates, EasyShipStandardRates, HeavyBulkyRates,
        OtherFees, PickAndPackFees, ReferralCategory, ReferralFees, Tier, WeightHandlingFees,
        ZoneRates,
    };
    use crate::models::{Location, ProductSize, ServiceLevel, ShippingMode};
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn local(amount: &str) -> ZoneRates {
        ZoneRates {
            local: Some(dec(amount)),
            ..Default::default()
        }
    }

    fn create_test_rate_table() -> RateTable {
        let referral = ReferralFees::new().with_tier(
            ReferralCategory::Books,
            Tier::Bounded {
                min_price: None,
                max_price: Some(dec("500")),
                percentage: dec("4.5"),
            },
        );

        let flat = |amount: &str| BracketFees {
            up_to_250: Some(dec(amount)),
            up_to_500: Some(dec(amount)),
            up_to_1000: Some(dec(amount)),
            above_1000: Some(dec(amount)),
        };
        let closing = ClosingFees {
            fba_normal: flat("25"),
            fba_exception: flat("12"),
            easy_ship_standard: flat("8"),
            self_ship: flat("20"),
        };

        let mut first_500g = HashMap::new();
        first_500g.insert(ServiceLevel::Standard, local("20"));
        let weight_handling = WeightHandlingFees {
            easy_ship: EasyShipRates {
                standard: EasyShipStandardRates {
                    first_500g,
                    additional_500g_up_to_1kg: local("10"),
                    additional_kg_after_1kg: local("15"),
                    additional_kg_after_5kg: local("12"),
                },
                heavy_bulky: HeavyBulkyRates {
                    first_12kg: local("192"),
                    additional_kg_after_12kg: local("5"),
                },
            },
            ..Default::default()
        };

        let other = OtherFees {
            pick_and_pack: PickAndPackFees {
                standard: Some(dec("14")),
                oversize_heavy_bulky: Some(dec("26")),
            },
            ..Default::default()
        };

        RateTable::new(referral, closing, weight_handling, other)
    }

    fn create_test_request() -> FeeRequest {
        FeeRequest {
            category: "Books".to_string(),
            selling_price: dec("500"),
            shipping_mode: ShippingMode::EasyShip,
            weight_kg: dec("1.2"),
            service_level: ServiceLevel::Standard,
            location: Location::Local,
            product_size: ProductSize::Standard,
        }
    }

    #[test]
    fn test_aggregate_sums_components() {
        let breakdown =
            aggregate_fees(dec("500"), dec("22.5"), dec("45"), dec("8"), dec("14")).unwrap();

        assert_eq!(breakdown.total_fees, dec("89.5"));
        assert_eq!(breakdown.net_earnings, dec("410.5"));
        assert_eq!(breakdown.component_sum(), breakdown.total_fees);
    }

    #[test]
    fn test_aggregate_allows_negative_net_earnings() {
        let breakdown = aggregate_fees(dec("10"), dec("1.5"), dec("20"), dec("5"), dec("14")).unwrap();
        assert_eq!(breakdown.net_earnings, dec("-30.5"));
    }

    #[test]
    fn test_full_calculation() {
        let result = calculate_total_fees(&create_test_rate_table(), &create_test_request()).unwrap();

        assert_eq!(result.breakdown.referral_fee, dec("22.5"));
        assert_eq!(result.breakdown.weight_handling_fee, dec("45"));
        assert_eq!(result.breakdown.closing_fee, dec("8"));
        assert_eq!(result.breakdown.pick_and_pack_fee, dec("14"));
        assert_eq!(result.breakdown.total_fees, dec("89.5"));
        assert_eq!(result.breakdown.net_earnings, dec("410.5"));
        assert_eq!(result.selling_price, dec("500"));
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
        assert!(result.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_audit_steps_are_sequenced() {
        let result = calculate_total_fees(&create_test_rate_table(), &create_test_request()).unwrap();

        let rule_ids: Vec<&str> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "referral_fee",
                "weight_handling_fee",
                "closing_fee",
                "pick_and_pack_fee"
            ]
        );
        for (index, step) in result.audit_trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
    }

    #[test]
    fn test_default_rate_and_negative_earnings_warnings() {
        let mut request = create_test_request();
        request.category = "Toys".to_string();
        request.selling_price = dec("20");

        let result = calculate_total_fees(&create_test_rate_table(), &request).unwrap();

        assert_eq!(result.breakdown.referral_fee, dec("3"));
        let codes: Vec<&str> = result
            .audit_trace
            .warnings
            .iter()
            .map(|w| w.code.as_str())
            .collect();
        assert_eq!(codes, vec!["DEFAULT_REFERRAL_RATE", "NEGATIVE_NET_EARNINGS"]);
    }

    #[test]
    fn test_invalid_request_is_rejected_before_resolution() {
        let mut request = create_test_request();
        request.weight_kg = Decimal::ZERO;

        match calculate_total_fees(&create_test_rate_table(), &request) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "weight_kg"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_cell_aborts_calculation() {
        let mut request = create_test_request();
        request.location = Location::National;

        match calculate_total_fees(&create_test_rate_table(), &request) {
            Err(EngineError::MissingRateCell { table, cell }) => {
                assert_eq!(table, "weight_handling.easy_ship.standard");
                assert_eq!(cell, "first_500g/standard/national");
            }
            other => panic!("Expected MissingRateCell, got {:?}", other),
        }
    }

    #[test]
    fn test_fba_without_fba_rates_fails() {
        let mut request = create_test_request();
        request.shipping_mode = ShippingMode::Fba;

        // The test table carries no FBA weight-handling rates.
        match calculate_total_fees(&create_test_rate_table(), &request) {
            Err(EngineError::MissingRateCell { table, .. }) => {
                assert_eq!(table, "weight_handling.fba.standard");
            }
            other => panic!("Expected MissingRateCell, got {:?}", other),
        }
    }

    #[test]
    fn test_self_ship_has_no_weight_handling_fee() {
        let mut request = create_test_request();
        request.shipping_mode = ShippingMode::SelfShip;

        let result = calculate_total_fees(&create_test_rate_table(), &request).unwrap();
        assert_eq!(result.breakdown.weight_handling_fee, Decimal::ZERO);
        assert_eq!(result.breakdown.closing_fee, dec("20"));
        assert_eq!(result.breakdown.pick_and_pack_fee, dec("14"));
    }

    #[test]
    fn test_aggregate_overflow_is_rejected() {
        match aggregate_fees(Decimal::MAX, Decimal::MAX, dec("45"), dec("8"), dec("14")) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "total_fees"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_price_is_rejected_without_panicking() {
        let mut request = create_test_request();
        request.selling_price = Decimal::MAX;

        match calculate_total_fees(&create_test_rate_table(), &request) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "selling_price");
                assert_eq!(message, "amount out of range");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
