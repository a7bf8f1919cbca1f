//! Core data models for the Seller Fee Engine.
//!
//! This module contains the domain models used throughout the engine.

mod fee_calculation;
mod fee_request;
mod shipping;

pub use fee_calculation::{AuditStep, AuditTrace, AuditWarning, FeeBreakdown, FeeCalculation};
pub use fee_request::FeeRequest;
pub use shipping::{Location, ProductSize, ServiceLevel, ShippingMode};
