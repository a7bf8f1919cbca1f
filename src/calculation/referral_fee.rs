//! Referral fee calculation functionality.
//!
//! This module classifies a listing category into one of the referral-fee
//! buckets and applies the first matching price tier's percentage to the
//! selling price.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{REFERRAL_FEES_SHEET, ReferralCategory, ReferralFees, Tier};
use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// The percentage applied when a category has no bucket or no tier matches.
pub const DEFAULT_REFERRAL_PERCENTAGE: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// The result of resolving a referral fee, including the rate and audit step.
#[derive(Debug, Clone)]
pub struct ReferralFeeResult {
    /// The referral fee amount.
    pub fee: Decimal,
    /// The percentage that was applied (0-100).
    pub percentage: Decimal,
    /// The bucket the category was classified into, if any.
    pub category: Option<ReferralCategory>,
    /// True when the default rate was used.
    pub used_default: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Classifies a listing category into a referral bucket.
///
/// Automotive and Baby categories are matched by prefix and then by keyword,
/// ignoring case, so both "Automotive – Car and Bike parts" and
/// "Automotive Parts" land in the parts bucket. Books must match exactly.
///
/// # Examples
///
/// ```
/// use seller_fee_engine::calculation::classify_category;
/// use seller_fee_engine::config::ReferralCategory;
///
/// assert_eq!(
///     classify_category("Automotive - Tyres & Rims"),
///     Some(ReferralCategory::AutomotiveTyresAndRims)
/// );
/// assert_eq!(classify_category("Books"), Some(ReferralCategory::Books));
/// assert_eq!(classify_category("Toys"), None);
/// ```
pub fn classify_category(category: &str) -> Option<ReferralCategory> {
    let trimmed = category.trim();
    let lower = trimmed.to_lowercase();

    if lower.starts_with("automotive") {
        if lower.contains("helmet") {
            Some(ReferralCategory::AutomotiveHelmetsAndGloves)
        } else if lower.contains("tyre") {
            Some(ReferralCategory::AutomotiveTyresAndRims)
        } else if lower.contains("vehicle") {
            Some(ReferralCategory::AutomotiveVehicles)
        } else if lower.contains("part") {
            Some(ReferralCategory::AutomotivePartsAndAccessories)
        } else if lower.contains("cleaning") {
            Some(ReferralCategory::AutomotiveCleaningKits)
        } else {
            None
        }
    } else if lower.starts_with("baby") {
        if lower.contains("hardline") {
            Some(ReferralCategory::BabyHardlines)
        } else if lower.contains("stroller") {
            Some(ReferralCategory::BabyStrollers)
        } else if lower.contains("diaper") {
            Some(ReferralCategory::BabyDiapers)
        } else {
            None
        }
    } else if trimmed == "Books" {
        Some(ReferralCategory::Books)
    } else {
        None
    }
}

/// Selects the tier that applies to `price`.
///
/// The vehicles bucket carries a single tier that applies at any price. For
/// every other bucket the first tier in sheet order that matches wins.
fn select_tier(category: ReferralCategory, tiers: &[Tier], price: Decimal) -> Option<&Tier> {
    if category == ReferralCategory::AutomotiveVehicles {
        return tiers.first();
    }
    tiers.iter().find(|tier| tier.matches(price))
}

/// Calculates the referral fee for a category and selling price.
///
/// `fee = price × percentage / 100`. When the category is not in the
/// taxonomy, or none of its tiers match, the 15% default applies and
/// `used_default` is set.
///
/// # Errors
///
/// - `InvalidInput` if `price × percentage` does not fit in a `Decimal`
///
/// # Arguments
///
/// * `referral_fees` - The referral tiers from the rate table
/// * `category` - The listing category label
/// * `price` - The selling price
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use seller_fee_engine::calculation::calculate_referral_fee;
/// use seller_fee_engine::config::{ReferralCategory, ReferralFees, Tier};
/// use rust_decimal::Decimal;
///
/// let fees = ReferralFees::new().with_tier(
///     ReferralCategory::Books,
///     Tier::Bounded {
///         min_price: None,
///         max_price: Some(Decimal::new(500, 0)),
///         percentage: Decimal::new(15, 0),
///     },
/// );
///
/// let result = calculate_referral_fee(&fees, "Books", Decimal::new(500, 0), 1).unwrap();
/// assert_eq!(result.fee, Decimal::new(75, 0));
/// assert!(!result.used_default);
/// ```
pub fn calculate_referral_fee(
    referral_fees: &ReferralFees,
    category: &str,
    price: Decimal,
    step_number: u32,
) -> EngineResult<ReferralFeeResult> {
    let bucket = classify_category(category);
    let tier = bucket.and_then(|b| select_tier(b, referral_fees.tiers_for(b), price));

    let (percentage, used_default) = match tier {
        Some(tier) => (tier.percentage(), false),
        None => (DEFAULT_REFERRAL_PERCENTAGE, true),
    };
    let fee = price
        .checked_mul(percentage)
        .map(|amount| amount / Decimal::ONE_HUNDRED)
        .ok_or_else(|| {
            warn!(category, %price, %percentage, "Referral fee overflowed");
            EngineError::out_of_range("selling_price")
        })?;

    let bucket_name = bucket.map(|b| b.as_str()).unwrap_or("unmatched");
    if used_default {
        warn!(
            category,
            bucket = bucket_name,
            %price,
            "No referral tier matched, applying default rate"
        );
    } else {
        debug!(category, bucket = bucket_name, %price, %percentage, "Referral tier selected");
    }

    let reasoning = if used_default {
        match bucket {
            Some(b) => format!(
                "No tier in '{}' matches price {}; default {}% applied: {} x {}% = {}",
                b.as_str(),
                price.normalize(),
                percentage.normalize(),
                price.normalize(),
                percentage.normalize(),
                fee.normalize()
            ),
            None => format!(
                "Category '{}' has no referral bucket; default {}% applied: {} x {}% = {}",
                category,
                percentage.normalize(),
                price.normalize(),
                percentage.normalize(),
                fee.normalize()
            ),
        }
    } else {
        format!(
            "{} x {}% = {}",
            price.normalize(),
            percentage.normalize(),
            fee.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "referral_fee".to_string(),
        rule_name: "Referral Fee".to_string(),
        rate_source: REFERRAL_FEES_SHEET.to_string(),
        input: serde_json::json!({
            "category": category,
            "price": price.normalize().to_string()
        }),
        output: serde_json::json!({
            "bucket": bucket.map(|b| b.as_str()),
            "percentage": percentage.normalize().to_string(),
            "fee": fee.normalize().to_string(),
            "used_default": used_default
        }),
        reasoning,
    };

    Ok(ReferralFeeResult {
        fee,
        percentage,
        category: bucket,
        used_default,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn up_to(max: &str, percentage: &str) -> Tier {
        Tier::Bounded {
            min_price: None,
            max_price: Some(dec(max)),
            percentage: dec(percentage),
        }
    }

    fn above(min: &str, percentage: &str) -> Tier {
        Tier::Bounded {
            min_price: Some(dec(min)),
            max_price: None,
            percentage: dec(percentage),
        }
    }

    fn create_test_referral_fees() -> ReferralFees {
        ReferralFees::new()
            .with_tier(ReferralCategory::Books, up_to("250", "3"))
            .with_tier(ReferralCategory::Books, up_to("500", "4.5"))
            .with_tier(ReferralCategory::Books, up_to("1000", "9"))
            .with_tier(ReferralCategory::Books, above("1000", "13.5"))
            .with_tier(
                ReferralCategory::AutomotiveHelmetsAndGloves,
                up_to("500", "6.5"),
            )
            .with_tier(
                ReferralCategory::AutomotiveHelmetsAndGloves,
                above("500", "8.5"),
            )
            .with_tier(
                ReferralCategory::AutomotiveVehicles,
                Tier::Flat {
                    percentage: dec("5"),
                },
            )
            .with_tier(ReferralCategory::BabyDiapers, up_to("500", "8"))
    }

    #[test]
    fn test_classify_automotive_keywords() {
        assert_eq!(
            classify_category("Automotive - Helmets & Riding Gloves"),
            Some(ReferralCategory::AutomotiveHelmetsAndGloves)
        );
        assert_eq!(
            classify_category("Automotive Vehicles - 2-Wheelers 4-Wheelers and Electric Vehicles"),
            Some(ReferralCategory::AutomotiveVehicles)
        );
        assert_eq!(
            classify_category("Automotive – Car and Bike parts"),
            Some(ReferralCategory::AutomotivePartsAndAccessories)
        );
        assert_eq!(
            classify_category("Automotive – Cleaning kits"),
            Some(ReferralCategory::AutomotiveCleaningKits)
        );
        assert_eq!(classify_category("Automotive - Horns"), None);
    }

    #[test]
    fn test_classify_baby_keywords() {
        assert_eq!(
            classify_category("Baby Hardlines"),
            Some(ReferralCategory::BabyHardlines)
        );
        assert_eq!(
            classify_category("Baby Strollers"),
            Some(ReferralCategory::BabyStrollers)
        );
        assert_eq!(
            classify_category("Baby diapers"),
            Some(ReferralCategory::BabyDiapers)
        );
    }

    #[test]
    fn test_classify_books_requires_exact_label() {
        assert_eq!(classify_category("Books"), Some(ReferralCategory::Books));
        assert_eq!(classify_category("Comic Books"), None);
    }

    #[test]
    fn test_books_at_500_with_15_percent_tier() {
        let fees = ReferralFees::new().with_tier(ReferralCategory::Books, up_to("500", "15"));
        let result = calculate_referral_fee(&fees, "Books", dec("500"), 1).unwrap();

        assert_eq!(result.fee, dec("75"));
        assert_eq!(result.percentage, dec("15"));
        assert!(!result.used_default);
    }

    #[test]
    fn test_first_matching_tier_wins() {
        let fees = create_test_referral_fees();

        assert_eq!(
            calculate_referral_fee(&fees, "Books", dec("250"), 1).unwrap().percentage,
            dec("3")
        );
        assert_eq!(
            calculate_referral_fee(&fees, "Books", dec("251"), 1).unwrap().percentage,
            dec("4.5")
        );
        assert_eq!(
            calculate_referral_fee(&fees, "Books", dec("1000"), 1).unwrap().percentage,
            dec("9")
        );
        assert_eq!(
            calculate_referral_fee(&fees, "Books", dec("1000.01"), 1).unwrap().percentage,
            dec("13.5")
        );
    }

    #[test]
    fn test_helmets_above_threshold() {
        let fees = create_test_referral_fees();
        let result = calculate_referral_fee(
            &fees,
            "Automotive - Helmets & Riding Gloves",
            dec("1200"),
            1,
        )
        .unwrap();

        assert_eq!(result.fee, dec("102"));
        assert_eq!(
            result.category,
            Some(ReferralCategory::AutomotiveHelmetsAndGloves)
        );
    }

    #[test]
    fn test_vehicles_apply_single_tier_directly() {
        let fees = create_test_referral_fees();
        let result = calculate_referral_fee(&fees, "Automotive Vehicles", dec("250000"), 1).unwrap();

        assert_eq!(result.fee, dec("12500"));
        assert!(!result.used_default);
    }

    #[test]
    fn test_unknown_category_uses_default_rate() {
        let fees = create_test_referral_fees();
        let result = calculate_referral_fee(&fees, "Toys", dec("100"), 3).unwrap();

        assert_eq!(result.fee, dec("15"));
        assert_eq!(result.percentage, DEFAULT_REFERRAL_PERCENTAGE);
        assert!(result.used_default);
        assert_eq!(result.category, None);
        assert_eq!(result.audit_step.step_number, 3);
        assert!(result.audit_step.output["bucket"].is_null());
        assert!(result.audit_step.reasoning.contains("no referral bucket"));
    }

    #[test]
    fn test_no_matching_tier_uses_default_rate() {
        let fees = create_test_referral_fees();
        let result = calculate_referral_fee(&fees, "Baby diapers", dec("600"), 1).unwrap();

        assert_eq!(result.fee, dec("90"));
        assert!(result.used_default);
        assert_eq!(result.category, Some(ReferralCategory::BabyDiapers));
    }

    #[test]
    fn test_bucket_without_tiers_uses_default_rate() {
        let fees = create_test_referral_fees();
        let result = calculate_referral_fee(&fees, "Baby Strollers", dec("200"), 1).unwrap();

        assert_eq!(result.fee, dec("30"));
        assert!(result.used_default);
    }

    #[test]
    fn test_audit_step_records_decision() {
        let fees = create_test_referral_fees();
        let result = calculate_referral_fee(&fees, "Books", dec("500"), 1).unwrap();

        assert_eq!(result.audit_step.rule_id, "referral_fee");
        assert_eq!(result.audit_step.rate_source, "Referral Fees");
        assert_eq!(result.audit_step.input["price"].as_str().unwrap(), "500");
        assert_eq!(result.audit_step.output["bucket"].as_str().unwrap(), "books");
        assert_eq!(result.audit_step.output["fee"].as_str().unwrap(), "22.5");
        assert!(!result.audit_step.output["used_default"].as_bool().unwrap());
    }

    #[test]
    fn test_price_too_large_is_rejected() {
        let fees = create_test_referral_fees();

        match calculate_referral_fee(&fees, "Garden", Decimal::MAX, 1) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "selling_price");
                assert_eq!(message, "amount out of range");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
