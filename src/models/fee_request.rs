//! The product and shipment description a fee calculation runs against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Location, ProductSize, ServiceLevel, ShippingMode};
use crate::error::{EngineError, EngineResult};

/// Everything needed to resolve the four seller fees for one listing.
///
/// Individual resolvers only read the fields they need; the referral fee,
/// for instance, ignores weight and location. Field names also deserialize
/// from the camelCase and short names the listing form sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRequest {
    /// Product category label as shown on the listing form.
    pub category: String,
    /// Selling price in the marketplace currency.
    #[serde(alias = "sellingPrice", alias = "price")]
    pub selling_price: Decimal,
    /// How the order will be shipped.
    #[serde(alias = "shippingMode", alias = "mode")]
    pub shipping_mode: ShippingMode,
    /// Shipped weight in kilograms.
    #[serde(alias = "weightKg", alias = "weight")]
    pub weight_kg: Decimal,
    /// Fulfilment service level.
    #[serde(alias = "serviceLevel")]
    pub service_level: ServiceLevel,
    /// Delivery zone.
    pub location: Location,
    /// Size class of the parcel.
    #[serde(alias = "productSize", alias = "size")]
    pub product_size: ProductSize,
}

impl FeeRequest {
    /// Rejects numeric inputs the resolvers are not defined for.
    ///
    /// The selling price must be non-negative and the weight strictly
    /// positive.
    ///
    /// # Example
    ///
    /// ```
    /// use seller_fee_engine::models::{FeeRequest, Location, ProductSize, ServiceLevel, ShippingMode};
    /// use rust_decimal::Decimal;
    ///
    /// let request = FeeRequest {
    ///     category: "Books".to_string(),
    ///     selling_price: Decimal::new(500, 0),
    ///     shipping_mode: ShippingMode::EasyShip,
    ///     weight_kg: Decimal::ZERO,
    ///     service_level: ServiceLevel::Standard,
    ///     location: Location::Local,
    ///     product_size: ProductSize::Standard,
    /// };
    /// assert!(request.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.selling_price < Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "selling_price".to_string(),
                message: format!("must not be negative (got {})", self.selling_price),
            });
        }

        if self.weight_kg <= Decimal::ZERO {
            return Err(EngineError::InvalidInput {
                field: "weight_kg".to_string(),
                message: format!("must be greater than zero (got {})", self.weight_kg),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_request(price: &str, weight: &str) -> FeeRequest {
        FeeRequest {
            category: "Books".to_string(),
            selling_price: dec(price),
            shipping_mode: ShippingMode::EasyShip,
            weight_kg: dec(weight),
            service_level: ServiceLevel::Standard,
            location: Location::Local,
            product_size: ProductSize::Standard,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(create_test_request("500", "1.2").validate().is_ok());
    }

    #[test]
    fn test_zero_price_is_allowed() {
        assert!(create_test_request("0", "0.5").validate().is_ok());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        match create_test_request("-1", "1").validate() {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "selling_price"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_weight_is_rejected() {
        match create_test_request("100", "0").validate() {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "weight_kg");
                assert!(message.contains("greater than zero"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_deserializes_from_snake_case_json() {
        let json = r#"{
            "category": "Books",
            "selling_price": "500",
            "shipping_mode": "easy_ship",
            "weight_kg": "1.2",
            "service_level": "standard",
            "location": "local",
            "product_size": "standard"
        }"#;

        let request: FeeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.selling_price, dec("500"));
        assert_eq!(request.weight_kg, dec("1.2"));
        assert_eq!(request.shipping_mode, ShippingMode::EasyShip);
    }

    #[test]
    fn test_deserializes_from_form_labels() {
        let json = r#"{
            "category": "Books",
            "sellingPrice": 500,
            "mode": "Easy Ship",
            "weight": "1.2",
            "serviceLevel": "Standard",
            "location": "IXD",
            "size": "Heavy & Bulky"
        }"#;

        let request: FeeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.selling_price, dec("500"));
        assert_eq!(request.location, Location::Ixd);
        assert_eq!(request.product_size, ProductSize::HeavyBulky);
    }
}
