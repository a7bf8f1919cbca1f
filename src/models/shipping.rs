//! Shipping dimensions used to key the rate tables.
//!
//! Each enum parses case-insensitively from the labels the seller-facing
//! form sends ("Easy Ship", "Heavy & Bulky", "IXD") as well as from
//! snake_case and CamelCase spellings. Serialization always uses snake_case.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Lowercases a label and drops separators so "Easy Ship", "easy_ship"
/// and "EasyShip" compare equal.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn unknown(kind: &str, value: &str) -> EngineError {
    EngineError::UnknownVariant {
        kind: kind.to_string(),
        value: value.to_string(),
    }
}

/// How an order reaches the customer.
///
/// # Example
///
/// ```
/// use seller_fee_engine::models::ShippingMode;
///
/// assert_eq!("Easy Ship".parse::<ShippingMode>().unwrap(), ShippingMode::EasyShip);
/// assert_eq!("fba".parse::<ShippingMode>().unwrap(), ShippingMode::Fba);
/// assert!("Drone".parse::<ShippingMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ShippingMode {
    /// Fulfilled by the marketplace from its own warehouse.
    Fba,
    /// Seller packs, marketplace picks up and delivers.
    EasyShip,
    /// Seller packs and delivers through their own carrier.
    SelfShip,
}

impl ShippingMode {
    /// Returns the snake_case name used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingMode::Fba => "fba",
            ShippingMode::EasyShip => "easy_ship",
            ShippingMode::SelfShip => "self_ship",
        }
    }
}

impl FromStr for ShippingMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "fba" => Ok(ShippingMode::Fba),
            "easyship" => Ok(ShippingMode::EasyShip),
            "selfship" => Ok(ShippingMode::SelfShip),
            _ => Err(unknown("shipping mode", s)),
        }
    }
}

impl TryFrom<String> for ShippingMode {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ShippingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ProductSize {
    /// Standard-size parcel.
    Standard,
    /// Oversize, heavy or bulky parcel.
    HeavyBulky,
}

impl ProductSize {
    /// Returns the snake_case name used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSize::Standard => "standard",
            ProductSize::HeavyBulky => "heavy_bulky",
        }
    }
}

impl FromStr for ProductSize {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "standard" | "standardsize" => Ok(ProductSize::Standard),
            "heavybulky" | "oversize" | "oversizeheavybulky" => Ok(ProductSize::HeavyBulky),
            _ => Err(unknown("product size", s)),
        }
    }
}

impl TryFrom<String> for ProductSize {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ProductSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fulfilment service level chosen by the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ServiceLevel {
    /// Premium tier.
    Premium,
    /// Advanced tier.
    Advanced,
    /// Standard tier.
    Standard,
    /// Basic tier.
    Basic,
}

impl ServiceLevel {
    /// All service levels in sheet order.
    pub const ALL: [ServiceLevel; 4] = [
        ServiceLevel::Premium,
        ServiceLevel::Advanced,
        ServiceLevel::Standard,
        ServiceLevel::Basic,
    ];

    /// Returns the snake_case name used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceLevel::Premium => "premium",
            ServiceLevel::Advanced => "advanced",
            ServiceLevel::Standard => "standard",
            ServiceLevel::Basic => "basic",
        }
    }
}

impl FromStr for ServiceLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "premium" => Ok(ServiceLevel::Premium),
            "advanced" => Ok(ServiceLevel::Advanced),
            "standard" => Ok(ServiceLevel::Standard),
            "basic" => Ok(ServiceLevel::Basic),
            _ => Err(unknown("service level", s)),
        }
    }
}

impl TryFrom<String> for ServiceLevel {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery zone, in increasing distance from the seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Location {
    /// Same city.
    Local,
    /// Same region.
    Regional,
    /// Anywhere in the country.
    National,
    /// Inventory placed at an IXD (inbound cross-dock) node.
    Ixd,
}

impl Location {
    /// All zones in sheet column order.
    pub const ALL: [Location; 4] = [
        Location::Local,
        Location::Regional,
        Location::National,
        Location::Ixd,
    ];

    /// Returns the snake_case name used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Local => "local",
            Location::Regional => "regional",
            Location::National => "national",
            Location::Ixd => "ixd",
        }
    }
}

impl FromStr for Location {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "local" => Ok(Location::Local),
            "regional" => Ok(Location::Regional),
            "national" => Ok(Location::National),
            "ixd" => Ok(Location::Ixd),
            _ => Err(unknown("location", s)),
        }
    }
}

impl TryFrom<String> for Location {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipping_mode_accepts_form_labels() {
        assert_eq!("FBA".parse::<ShippingMode>().unwrap(), ShippingMode::Fba);
        assert_eq!(
            "Easy Ship".parse::<ShippingMode>().unwrap(),
            ShippingMode::EasyShip
        );
        assert_eq!(
            "Self Ship".parse::<ShippingMode>().unwrap(),
            ShippingMode::SelfShip
        );
    }

    #[test]
    fn test_shipping_mode_accepts_snake_and_camel_case() {
        assert_eq!(
            "easy_ship".parse::<ShippingMode>().unwrap(),
            ShippingMode::EasyShip
        );
        assert_eq!(
            "SelfShip".parse::<ShippingMode>().unwrap(),
            ShippingMode::SelfShip
        );
    }

    #[test]
    fn test_unknown_shipping_mode_is_error() {
        match "Courier".parse::<ShippingMode>() {
            Err(EngineError::UnknownVariant { kind, value }) => {
                assert_eq!(kind, "shipping mode");
                assert_eq!(value, "Courier");
            }
            other => panic!("Expected UnknownVariant, got {:?}", other),
        }
    }

    #[test]
    fn test_product_size_accepts_heavy_and_bulky_label() {
        assert_eq!(
            "Heavy & Bulky".parse::<ProductSize>().unwrap(),
            ProductSize::HeavyBulky
        );
        assert_eq!(
            "HeavyBulky".parse::<ProductSize>().unwrap(),
            ProductSize::HeavyBulky
        );
        assert_eq!(
            "Standard".parse::<ProductSize>().unwrap(),
            ProductSize::Standard
        );
    }

    #[test]
    fn test_service_level_is_case_insensitive() {
        assert_eq!(
            "PREMIUM".parse::<ServiceLevel>().unwrap(),
            ServiceLevel::Premium
        );
        assert_eq!("basic".parse::<ServiceLevel>().unwrap(), ServiceLevel::Basic);
    }

    #[test]
    fn test_location_is_case_insensitive() {
        assert_eq!("IXD".parse::<Location>().unwrap(), Location::Ixd);
        assert_eq!("Regional".parse::<Location>().unwrap(), Location::Regional);
        assert!("Overseas".parse::<Location>().is_err());
    }

    #[test]
    fn test_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&ShippingMode::EasyShip).unwrap(),
            "\"easy_ship\""
        );
        assert_eq!(
            serde_json::to_string(&ProductSize::HeavyBulky).unwrap(),
            "\"heavy_bulky\""
        );
    }

    #[test]
    fn test_deserializes_from_form_labels() {
        let mode: ShippingMode = serde_json::from_str("\"Easy Ship\"").unwrap();
        assert_eq!(mode, ShippingMode::EasyShip);

        let location: Location = serde_json::from_str("\"IXD\"").unwrap();
        assert_eq!(location, Location::Ixd);

        let bad: Result<ServiceLevel, _> = serde_json::from_str("\"gold\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ServiceLevel::Advanced.to_string(), "advanced");
        assert_eq!(Location::National.to_string(), "national");
    }
}
