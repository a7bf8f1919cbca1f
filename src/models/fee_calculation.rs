//! Fee calculation result models for the Seller Fee Engine.
//!
//! This module contains the [`FeeCalculation`] type and its associated structures
//! that capture all outputs from a fee calculation: the per-fee breakdown,
//! net earnings, and an audit trace of every resolver decision.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four resolved fees, their total and what the seller keeps.
///
/// `net_earnings` is `selling_price - total_fees` and is allowed to be
/// negative; a negative value marks an unprofitable listing.
///
/// # Example
///
/// ```
/// use seller_fee_engine::models::FeeBreakdown;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let breakdown = FeeBreakdown {
///     referral_fee: Decimal::from_str("22.5").unwrap(),
///     weight_handling_fee: Decimal::from_str("45").unwrap(),
///     closing_fee: Decimal::from_str("8").unwrap(),
///     pick_and_pack_fee: Decimal::from_str("14").unwrap(),
///     total_fees: Decimal::from_str("89.5").unwrap(),
///     net_earnings: Decimal::from_str("410.5").unwrap(),
/// };
/// assert_eq!(breakdown.component_sum(), breakdown.total_fees);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Category-dependent percentage of the selling price.
    pub referral_fee: Decimal,
    /// Shipping fee driven by weight, service level and zone.
    pub weight_handling_fee: Decimal,
    /// Flat fee by price bracket and shipping mode.
    pub closing_fee: Decimal,
    /// Fulfilment handling fee.
    pub pick_and_pack_fee: Decimal,
    /// Sum of the four fees.
    pub total_fees: Decimal,
    /// Selling price minus total fees.
    pub net_earnings: Decimal,
}

impl FeeBreakdown {
    /// Sums the four component fees.
    pub fn component_sum(&self) -> Decimal {
        self.referral_fee + self.weight_handling_fee + self.closing_fee + self.pick_and_pack_fee
    }
}

/// A single step in the audit trace recording a resolver decision.
///
/// Each step captures the input, output, and reasoning for one fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The rate sheet the rule read from.
    pub rate_source: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag results that are valid but deserve a second look, such
/// as a referral fee that fell back to the default rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a fee calculation.
///
/// # Example
///
/// ```
/// use seller_fee_engine::models::{AuditTrace, FeeBreakdown, FeeCalculation};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let result = FeeCalculation {
///     calculation_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     selling_price: Decimal::new(100, 0),
///     breakdown: FeeBreakdown {
///         referral_fee: Decimal::ZERO,
///         weight_handling_fee: Decimal::ZERO,
///         closing_fee: Decimal::ZERO,
///         pick_and_pack_fee: Decimal::ZERO,
///         total_fees: Decimal::ZERO,
///         net_earnings: Decimal::new(100, 0),
///     },
///     audit_trace: AuditTrace {
///         steps: vec![],
///         warnings: vec![],
///         duration_us: 0,
///     },
/// };
/// assert!(result.breakdown.net_earnings > Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The selling price the fees were computed against.
    pub selling_price: Decimal,
    /// The resolved fees and net earnings.
    pub breakdown: FeeBreakdown,
    /// Complete audit trace of resolver decisions.
    pub audit_trace: AuditTrace,
}
