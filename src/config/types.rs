//! Rate table types for fee resolution.
//!
//! This module contains the strongly-typed tables that the rate-sheet parser
//! produces and the fee resolvers read. Absent cells are `None`, never zero,
//! so a missing rate can be told apart from a rate of zero.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Location, ServiceLevel};

/// Metadata about the marketplace the rate sheets belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceMetadata {
    /// Short marketplace code (e.g., "amazon_in").
    pub code: String,
    /// Human-readable name of the fee schedule.
    pub name: String,
    /// ISO currency code all amounts are expressed in.
    pub currency: String,
    /// The version or effective date of the fee schedule.
    pub version: String,
    /// URL to the published fee schedule.
    pub source_url: String,
}

/// One referral-fee tier.
///
/// # Example
///
/// ```
/// use seller_fee_engine::config::Tier;
/// use rust_decimal::Decimal;
///
/// let tier = Tier::Bounded {
///     min_price: None,
///     max_price: Some(Decimal::new(500, 0)),
///     percentage: Decimal::new(15, 0),
/// };
/// assert!(tier.matches(Decimal::new(500, 0)));
/// assert!(!tier.matches(Decimal::new(501, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tier {
    /// Applies when `price <= max_price` or `price > min_price`.
    Bounded {
        /// Exclusive lower bound.
        min_price: Option<Decimal>,
        /// Inclusive upper bound.
        max_price: Option<Decimal>,
        /// Fee percentage (0-100).
        percentage: Decimal,
    },
    /// Applies at any price.
    Flat {
        /// Fee percentage (0-100).
        percentage: Decimal,
    },
}

impl Tier {
    /// Returns true if this tier applies to `price`.
    pub fn matches(&self, price: Decimal) -> bool {
        match self {
            Tier::Bounded {
                min_price,
                max_price,
                ..
            } => {
                max_price.is_some_and(|max| price <= max)
                    || min_price.is_some_and(|min| price > min)
            }
            Tier::Flat { .. } => true,
        }
    }

    /// Returns the tier's percentage.
    pub fn percentage(&self) -> Decimal {
        match self {
            Tier::Bounded { percentage, .. } | Tier::Flat { percentage } => *percentage,
        }
    }
}

/// The fixed referral-fee category taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralCategory {
    /// Helmets and riding gloves.
    AutomotiveHelmetsAndGloves,
    /// Tyres and rims.
    AutomotiveTyresAndRims,
    /// Two-wheelers, four-wheelers and electric vehicles. Single flat tier.
    AutomotiveVehicles,
    /// Car and bike parts.
    AutomotivePartsAndAccessories,
    /// Cleaning kits.
    AutomotiveCleaningKits,
    /// Baby hardlines.
    BabyHardlines,
    /// Baby strollers.
    BabyStrollers,
    /// Baby diapers.
    BabyDiapers,
    /// Books.
    Books,
}

impl ReferralCategory {
    /// Maps a category label from the referral sheet onto a bucket.
    ///
    /// Labels are matched exactly; rows for categories outside the taxonomy
    /// yield `None`.
    pub fn from_sheet_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Automotive - Helmets & Riding Gloves" => Some(Self::AutomotiveHelmetsAndGloves),
            "Automotive - Tyres & Rims" => Some(Self::AutomotiveTyresAndRims),
            "Automotive Vehicles - 2-Wheelers 4-Wheelers and Electric Vehicles" => {
                Some(Self::AutomotiveVehicles)
            }
            "Automotive – Car and Bike parts" => Some(Self::AutomotivePartsAndAccessories),
            "Automotive – Cleaning kits" => Some(Self::AutomotiveCleaningKits),
            "Baby Hardlines" => Some(Self::BabyHardlines),
            "Baby Strollers" => Some(Self::BabyStrollers),
            "Baby diapers" => Some(Self::BabyDiapers),
            "Books" => Some(Self::Books),
            _ => None,
        }
    }

    /// Returns the snake_case name used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutomotiveHelmetsAndGloves => "automotive_helmets_and_gloves",
            Self::AutomotiveTyresAndRims => "automotive_tyres_and_rims",
            Self::AutomotiveVehicles => "automotive_vehicles",
            Self::AutomotivePartsAndAccessories => "automotive_parts_and_accessories",
            Self::AutomotiveCleaningKits => "automotive_cleaning_kits",
            Self::BabyHardlines => "baby_hardlines",
            Self::BabyStrollers => "baby_strollers",
            Self::BabyDiapers => "baby_diapers",
            Self::Books => "books",
        }
    }
}

/// Referral-fee tiers per category, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralFees {
    tiers: HashMap<ReferralCategory, Vec<Tier>>,
}

impl ReferralFees {
    /// Creates an empty referral table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tier to a category, keeping sheet order.
    pub fn push(&mut self, category: ReferralCategory, tier: Tier) {
        self.tiers.entry(category).or_default().push(tier);
    }

    /// Builder-style variant of [`ReferralFees::push`].
    pub fn with_tier(mut self, category: ReferralCategory, tier: Tier) -> Self {
        self.push(category, tier);
        self
    }

    /// Returns the tiers for a category, or an empty slice if it has none.
    pub fn tiers_for(&self, category: ReferralCategory) -> &[Tier] {
        self.tiers.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// The fixed closing-fee price brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBracket {
    /// 0 to 250 inclusive.
    UpTo250,
    /// Above 250 up to 500 inclusive.
    UpTo500,
    /// Above 500 up to 1000 inclusive.
    UpTo1000,
    /// Above 1000.
    Above1000,
}

impl PriceBracket {
    /// Selects the bracket a price falls into. Upper bounds are inclusive.
    ///
    /// # Example
    ///
    /// ```
    /// use seller_fee_engine::config::PriceBracket;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(PriceBracket::for_price(Decimal::new(250, 0)), PriceBracket::UpTo250);
    /// assert_eq!(PriceBracket::for_price(Decimal::new(251, 0)), PriceBracket::UpTo500);
    /// assert_eq!(PriceBracket::for_price(Decimal::new(1001, 0)), PriceBracket::Above1000);
    /// ```
    pub fn for_price(price: Decimal) -> Self {
        if price <= Decimal::from(250) {
            PriceBracket::UpTo250
        } else if price <= Decimal::from(500) {
            PriceBracket::UpTo500
        } else if price <= Decimal::from(1000) {
            PriceBracket::UpTo1000
        } else {
            PriceBracket::Above1000
        }
    }

    /// Maps a price-range label from the closing-fee sheet onto a bracket.
    pub fn from_sheet_label(label: &str) -> Option<Self> {
        match label.trim() {
            "0-250" => Some(PriceBracket::UpTo250),
            "251-500" => Some(PriceBracket::UpTo500),
            "501-1000" => Some(PriceBracket::UpTo1000),
            "1000+" => Some(PriceBracket::Above1000),
            _ => None,
        }
    }

    /// Returns the snake_case name used in audit records.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBracket::UpTo250 => "up_to_250",
            PriceBracket::UpTo500 => "up_to_500",
            PriceBracket::UpTo1000 => "up_to_1000",
            PriceBracket::Above1000 => "above_1000",
        }
    }
}

/// Flat fees for each closing-fee price bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketFees {
    /// Fee for prices up to 250.
    pub up_to_250: Option<Decimal>,
    /// Fee for prices up to 500.
    pub up_to_500: Option<Decimal>,
    /// Fee for prices up to 1000.
    pub up_to_1000: Option<Decimal>,
    /// Fee for prices above 1000.
    pub above_1000: Option<Decimal>,
}

impl BracketFees {
    /// Returns the fee for a bracket.
    pub fn get(&self, bracket: PriceBracket) -> Option<Decimal> {
        match bracket {
            PriceBracket::UpTo250 => self.up_to_250,
            PriceBracket::UpTo500 => self.up_to_500,
            PriceBracket::UpTo1000 => self.up_to_1000,
            PriceBracket::Above1000 => self.above_1000,
        }
    }

    /// Sets the fee for a bracket.
    pub fn set(&mut self, bracket: PriceBracket, fee: Option<Decimal>) {
        match bracket {
            PriceBracket::UpTo250 => self.up_to_250 = fee,
            PriceBracket::UpTo500 => self.up_to_500 = fee,
            PriceBracket::UpTo1000 => self.up_to_1000 = fee,
            PriceBracket::Above1000 => self.above_1000 = fee,
        }
    }
}

/// Closing fees by channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingFees {
    /// FBA, normal categories.
    pub fba_normal: BracketFees,
    /// FBA, exception categories.
    pub fba_exception: BracketFees,
    /// Easy Ship, standard channel.
    pub easy_ship_standard: BracketFees,
    /// Self Ship.
    pub self_ship: BracketFees,
}

/// One rate per delivery zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRates {
    /// Local zone rate.
    pub local: Option<Decimal>,
    /// Regional zone rate.
    pub regional: Option<Decimal>,
    /// National zone rate.
    pub national: Option<Decimal>,
    /// IXD zone rate.
    pub ixd: Option<Decimal>,
}

impl ZoneRates {
    /// Returns the rate for a zone.
    pub fn get(&self, location: Location) -> Option<Decimal> {
        match location {
            Location::Local => self.local,
            Location::Regional => self.regional,
            Location::National => self.national,
            Location::Ixd => self.ixd,
        }
    }
}

/// Standard-size weight bands: a base first-500g charge plus increments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardBandRates {
    /// Charge for the first 500g.
    pub first_500g: ZoneRates,
    /// Flat charge for the next 500g up to 1kg.
    pub additional_500g_up_to_1kg: ZoneRates,
    /// Per-kg charge from 1kg to 5kg.
    pub additional_kg_after_1kg: ZoneRates,
    /// Per-kg charge beyond 5kg.
    pub additional_kg_after_5kg: ZoneRates,
}

/// Heavy & bulky weight bands: a first-12kg charge plus a per-kg increment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeavyBulkyRates {
    /// Charge for the first 12kg.
    pub first_12kg: ZoneRates,
    /// Per-kg charge beyond 12kg.
    pub additional_kg_after_12kg: ZoneRates,
}

/// Easy Ship standard-size rates. Only the first-500g charge varies by
/// service level; the increments are shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyShipStandardRates {
    /// First-500g charge per service level.
    pub first_500g: HashMap<ServiceLevel, ZoneRates>,
    /// Flat charge for the next 500g up to 1kg.
    pub additional_500g_up_to_1kg: ZoneRates,
    /// Per-kg charge from 1kg to 5kg.
    pub additional_kg_after_1kg: ZoneRates,
    /// Per-kg charge beyond 5kg.
    pub additional_kg_after_5kg: ZoneRates,
}

/// Easy Ship rates by size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasyShipRates {
    /// Standard-size rates.
    pub standard: EasyShipStandardRates,
    /// Heavy & bulky rates.
    pub heavy_bulky: HeavyBulkyRates,
}

/// FBA rates by size and service level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FbaRates {
    /// Standard-size bands per service level.
    pub standard: HashMap<ServiceLevel, StandardBandRates>,
    /// Heavy & bulky bands per service level.
    pub heavy_bulky: HashMap<ServiceLevel, HeavyBulkyRates>,
}

/// All weight-handling rates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightHandlingFees {
    /// Easy Ship rates.
    pub easy_ship: EasyShipRates,
    /// FBA rates.
    pub fba: FbaRates,
}

/// Pick & pack fees by size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickAndPackFees {
    /// Standard-size fee.
    pub standard: Option<Decimal>,
    /// Oversize / heavy & bulky fee.
    pub oversize_heavy_bulky: Option<Decimal>,
}

/// Removal fees by shipping speed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRates {
    /// Standard shipping.
    pub standard_shipping: Option<Decimal>,
    /// Expedited shipping.
    pub expedited_shipping: Option<Decimal>,
}

/// Removal fees by size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalFees {
    /// Standard-size items.
    pub standard_size: RemovalRates,
    /// Heavy & bulky items.
    pub heavy_bulky: RemovalRates,
}

/// Fulfilment fees that are not weight- or price-driven.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherFees {
    /// Pick & pack fees.
    pub pick_and_pack: PickAndPackFees,
    /// Monthly storage fee per cubic foot.
    pub storage_per_cubic_foot_month: Option<Decimal>,
    /// Removal fees.
    pub removal: RemovalFees,
}

/// The complete set of rate tables fee resolution runs against.
///
/// Immutable once built; share it behind an `Arc` for concurrent readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    referral: ReferralFees,
    closing: ClosingFees,
    weight_handling: WeightHandlingFees,
    other: OtherFees,
}

impl RateTable {
    /// Creates a new RateTable from its component tables.
    pub fn new(
        referral: ReferralFees,
        closing: ClosingFees,
        weight_handling: WeightHandlingFees,
        other: OtherFees,
    ) -> Self {
        Self {
            referral,
            closing,
            weight_handling,
            other,
        }
    }

    /// Returns the referral-fee tiers.
    pub fn referral(&self) -> &ReferralFees {
        &self.referral
    }

    /// Returns the closing fees.
    pub fn closing(&self) -> &ClosingFees {
        &self.closing
    }

    /// Returns the weight-handling rates.
    pub fn weight_handling(&self) -> &WeightHandlingFees {
        &self.weight_handling
    }

    /// Returns the other fulfilment fees.
    pub fn other(&self) -> &OtherFees {
        &self.other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_bounded_tier_max_is_inclusive() {
        let tier = Tier::Bounded {
            min_price: None,
            max_price: Some(dec("500")),
            percentage: dec("4.5"),
        };
        assert!(tier.matches(dec("0")));
        assert!(tier.matches(dec("500")));
        assert!(!tier.matches(dec("500.01")));
    }

    #[test]
    fn test_bounded_tier_min_is_exclusive() {
        let tier = Tier::Bounded {
            min_price: Some(dec("500")),
            max_price: None,
            percentage: dec("8.5"),
        };
        assert!(!tier.matches(dec("500")));
        assert!(tier.matches(dec("500.01")));
    }

    #[test]
    fn test_flat_tier_matches_any_price() {
        let tier = Tier::Flat {
            percentage: dec("5"),
        };
        assert!(tier.matches(dec("0")));
        assert!(tier.matches(dec("1000000")));
        assert_eq!(tier.percentage(), dec("5"));
    }

    #[test]
    fn test_referral_category_sheet_labels() {
        assert_eq!(
            ReferralCategory::from_sheet_label("Automotive – Car and Bike parts"),
            Some(ReferralCategory::AutomotivePartsAndAccessories)
        );
        assert_eq!(
            ReferralCategory::from_sheet_label("Baby diapers"),
            Some(ReferralCategory::BabyDiapers)
        );
        assert_eq!(ReferralCategory::from_sheet_label("Toys"), None);
    }

    #[test]
    fn test_referral_fees_keep_sheet_order() {
        let fees = ReferralFees::new()
            .with_tier(
                ReferralCategory::Books,
                Tier::Bounded {
                    min_price: None,
                    max_price: Some(dec("250")),
                    percentage: dec("3"),
                },
            )
            .with_tier(
                ReferralCategory::Books,
                Tier::Bounded {
                    min_price: Some(dec("250")),
                    max_price: None,
                    percentage: dec("4.5"),
                },
            );

        let tiers = fees.tiers_for(ReferralCategory::Books);
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].percentage(), dec("3"));
        assert_eq!(tiers[1].percentage(), dec("4.5"));
        assert!(fees.tiers_for(ReferralCategory::BabyStrollers).is_empty());
    }

    #[test]
    fn test_price_bracket_boundaries() {
        assert_eq!(PriceBracket::for_price(dec("0")), PriceBracket::UpTo250);
        assert_eq!(PriceBracket::for_price(dec("250")), PriceBracket::UpTo250);
        assert_eq!(PriceBracket::for_price(dec("250.5")), PriceBracket::UpTo500);
        assert_eq!(PriceBracket::for_price(dec("500")), PriceBracket::UpTo500);
        assert_eq!(PriceBracket::for_price(dec("1000")), PriceBracket::UpTo1000);
        assert_eq!(PriceBracket::for_price(dec("1000.01")), PriceBracket::Above1000);
    }

    #[test]
    fn test_price_bracket_sheet_labels() {
        assert_eq!(
            PriceBracket::from_sheet_label("251-500"),
            Some(PriceBracket::UpTo500)
        );
        assert_eq!(
            PriceBracket::from_sheet_label("1000+"),
            Some(PriceBracket::Above1000)
        );
        assert_eq!(PriceBracket::from_sheet_label("2000+"), None);
    }

    #[test]
    fn test_bracket_fees_get_and_set() {
        let mut fees = BracketFees::default();
        fees.set(PriceBracket::UpTo1000, Some(dec("36")));
        assert_eq!(fees.get(PriceBracket::UpTo1000), Some(dec("36")));
        assert_eq!(fees.get(PriceBracket::Above1000), None);
    }

    #[test]
    fn test_zone_rates_lookup() {
        let rates = ZoneRates {
            local: Some(dec("20")),
            regional: Some(dec("40")),
            national: Some(dec("65")),
            ixd: None,
        };
        assert_eq!(rates.get(Location::Regional), Some(dec("40")));
        assert_eq!(rates.get(Location::Ixd), None);
    }
}
