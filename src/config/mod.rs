//! Rate-sheet loading and management for the Seller Fee Engine.
//!
//! This module turns the marketplace's published rate sheets (raw spreadsheet
//! rows, stored as YAML) into a typed [`RateTable`] that the fee resolvers
//! read from.
//!
//! # Example
//!
//! ```no_run
//! use seller_fee_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/marketplace").unwrap();
//! println!("Loaded fee schedule: {}", config.metadata().name);
//! ```

mod loader;
mod sheet;
mod types;

pub use loader::ConfigLoader;
pub use sheet::{
    CLOSING_FEES_SHEET, OTHER_FEES_SHEET, REFERRAL_FEES_SHEET, RateSheet,
    WEIGHT_HANDLING_FEES_SHEET, WEIGHT_HANDLING_ROWS, build_rate_table, parse_closing_fees,
    parse_other_fees, parse_referral_fees, parse_weight_handling_fees,
};
pub use types::{
    BracketFees, ClosingFees, EasyShipRates, EasyShipStandardRates, FbaRates, HeavyBulkyRates,
    MarketplaceMetadata, OtherFees, PickAndPackFees, PriceBracket, RateTable, ReferralCategory,
    ReferralFees, RemovalFees, RemovalRates, StandardBandRates, Tier, WeightHandlingFees,
    ZoneRates,
};
