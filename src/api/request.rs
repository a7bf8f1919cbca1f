//! Request types for the Seller Fee Engine API.
//!
//! Field names follow the listing form (camelCase), with snake_case accepted
//! as well. Shipping dimensions arrive as free-text labels and are parsed
//! when the request is converted to domain types, so an unknown label is
//! reported as an invalid field rather than a malformed body.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{FeeRequest, Location, ProductSize, ServiceLevel, ShippingMode};

fn non_negative_price(price: Decimal) -> EngineResult<Decimal> {
    if price < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "price".to_string(),
            message: format!("must not be negative (got {})", price),
        });
    }
    Ok(price)
}

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    /// Listing category label.
    pub category: String,
    /// Selling price.
    #[serde(alias = "selling_price", alias = "price")]
    pub selling_price: Decimal,
    /// Shipping mode label, e.g. "Easy Ship".
    #[serde(alias = "shipping_mode", alias = "mode")]
    pub shipping_mode: String,
    /// Weight in kilograms.
    #[serde(alias = "weight_kg", alias = "weight")]
    pub weight_kg: Decimal,
    /// Service level label, e.g. "Premium".
    #[serde(alias = "service_level")]
    pub service_level: String,
    /// Delivery zone label, e.g. "IXD".
    pub location: String,
    /// Size label, e.g. "Heavy & Bulky".
    #[serde(alias = "product_size", alias = "size")]
    pub product_size: String,
}

impl TryFrom<CalculationRequest> for FeeRequest {
    type Error = EngineError;

    fn try_from(req: CalculationRequest) -> Result<Self, Self::Error> {
        Ok(FeeRequest {
            category: req.category,
            selling_price: req.selling_price,
            shipping_mode: req.shipping_mode.parse()?,
            weight_kg: req.weight_kg,
            service_level: req.service_level.parse()?,
            location: req.location.parse()?,
            product_size: req.product_size.parse()?,
        })
    }
}

/// Request body for `/get-referral-fee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralFeeRequest {
    /// Listing category label.
    pub category: String,
    /// Selling price.
    pub price: Decimal,
}

impl ReferralFeeRequest {
    /// Returns the price once it is known to be non-negative.
    pub fn validated_price(&self) -> EngineResult<Decimal> {
        non_negative_price(self.price)
    }
}

/// Request body for `/get-closing-fees`.
///
/// The mode stays a string: an unrecognised mode is priced at zero rather
/// than rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingFeeRequest {
    /// Shipping mode label.
    pub mode: String,
    /// Selling price.
    pub price: Decimal,
}

impl ClosingFeeRequest {
    /// Returns the price once it is known to be non-negative.
    pub fn validated_price(&self) -> EngineResult<Decimal> {
        non_negative_price(self.price)
    }
}

/// Request body for `/weight-handling-fee`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightHandlingFeeRequest {
    /// Shipping mode label.
    pub mode: String,
    /// Weight in kilograms.
    pub weight: Decimal,
    /// Service level label.
    #[serde(alias = "service_level")]
    pub service_level: String,
    /// Delivery zone label.
    pub location: String,
    /// Size label.
    pub size: String,
}

/// [`WeightHandlingFeeRequest`] with its labels parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightHandlingInput {
    /// Shipping mode.
    pub mode: ShippingMode,
    /// Weight in kilograms.
    pub weight: Decimal,
    /// Service level.
    pub service_level: ServiceLevel,
    /// Delivery zone.
    pub location: Location,
    /// Parcel size.
    pub size: ProductSize,
}

impl TryFrom<WeightHandlingFeeRequest> for WeightHandlingInput {
    type Error = EngineError;

    fn try_from(req: WeightHandlingFeeRequest) -> Result<Self, Self::Error> {
        Ok(WeightHandlingInput {
            mode: req.mode.parse()?,
            weight: req.weight,
            service_level: req.service_level.parse()?,
            location: req.location.parse()?,
            size: req.size.parse()?,
        })
    }
}

/// Request body for `/other-fees`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFeesRequest {
    /// Shipping mode label.
    pub mode: String,
    /// Size label.
    pub size: String,
}

impl OtherFeesRequest {
    /// Parses the mode and size labels.
    pub fn parse(&self) -> EngineResult<(ShippingMode, ProductSize)> {
        Ok((self.mode.parse()?, self.size.parse()?))
    }
}

/// Response body for the single-fee endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeResponse {
    /// The fee amount.
    pub fee: Decimal,
}
