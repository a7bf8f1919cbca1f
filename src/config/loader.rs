//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a marketplace
//! fee schedule from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::sheet::{
    CLOSING_FEES_SHEET, OTHER_FEES_SHEET, REFERRAL_FEES_SHEET, RateSheet,
    WEIGHT_HANDLING_FEES_SHEET, build_rate_table,
};
use super::types::{MarketplaceMetadata, RateTable};

/// Loads and provides access to a marketplace fee schedule.
///
/// The `ConfigLoader` reads the raw rate-sheet rows from a directory, parses
/// them once, and hands out the resulting [`RateTable`].
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/marketplace/
/// ├── marketplace.yaml              # Marketplace metadata
/// └── sheets/
///     ├── referral_fees.yaml        # Category, price range, percentage
///     ├── closing_fees.yaml         # Price range × channel
///     ├── weight_handling_fees.yaml # Weight bands × zone
///     └── other_fees.yaml           # Pick & pack, storage, removal
/// ```
///
/// Each sheet file holds `sheet: <tab name>` and `rows:`, a list of rows of
/// raw cell text with the header row first.
///
/// # Example
///
/// ```no_run
/// use seller_fee_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/marketplace").unwrap();
/// println!("Loaded fee schedule: {}", loader.metadata().name);
/// let closing = &loader.rate_table().closing().self_ship;
/// println!("Self Ship closing fees: {:?}", closing);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    metadata: MarketplaceMetadata,
    rate_table: RateTable,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/marketplace")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - A sheet has an unexpected layout or an unreadable cell
    ///   (`RateSheetShape`, `MalformedRateCell`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<MarketplaceMetadata>(&path.join("marketplace.yaml"))?;

        let sheets_dir = path.join("sheets");
        let referral = Self::load_sheet(&sheets_dir.join("referral_fees.yaml"), REFERRAL_FEES_SHEET)?;
        let closing = Self::load_sheet(&sheets_dir.join("closing_fees.yaml"), CLOSING_FEES_SHEET)?;
        let weight_handling = Self::load_sheet(
            &sheets_dir.join("weight_handling_fees.yaml"),
            WEIGHT_HANDLING_FEES_SHEET,
        )?;
        let other = Self::load_sheet(&sheets_dir.join("other_fees.yaml"), OTHER_FEES_SHEET)?;

        let rate_table = build_rate_table(&referral, &closing, &weight_handling, &other)?;

        info!(
            marketplace = %metadata.code,
            version = %metadata.version,
            "Loaded rate sheets"
        );

        Ok(Self {
            metadata,
            rate_table,
        })
    }

    /// Builds a loader around an already-constructed rate table.
    pub fn from_parts(metadata: MarketplaceMetadata, rate_table: RateTable) -> Self {
        Self {
            metadata,
            rate_table,
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads one sheet file, falling back to `default_name` if the file
    /// does not name its tab.
    fn load_sheet(path: &Path, default_name: &str) -> EngineResult<RateSheet> {
        #[derive(serde::Deserialize)]
        struct SheetFile {
            #[serde(default)]
            sheet: Option<String>,
            rows: Vec<Vec<String>>,
        }

        let file = Self::load_yaml::<SheetFile>(path)?;
        Ok(RateSheet {
            sheet: file.sheet.unwrap_or_else(|| default_name.to_string()),
            rows: file.rows,
        })
    }

    /// Returns the marketplace metadata.
    pub fn metadata(&self) -> &MarketplaceMetadata {
        &self.metadata
    }

    /// Returns the parsed rate table.
    pub fn rate_table(&self) -> &RateTable {
        &self.rate_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PriceBracket;
    use crate::models::ServiceLevel;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/marketplace"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "amazon_in");
        assert_eq!(loader.metadata().currency, "INR");
    }

    #[test]
    fn test_closing_fees_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let closing = loader.rate_table().closing();

        assert_eq!(closing.fba_normal.get(PriceBracket::UpTo250), Some(dec("25")));
        assert_eq!(closing.self_ship.get(PriceBracket::UpTo1000), Some(dec("36")));
        assert_eq!(
            closing.easy_ship_standard.get(PriceBracket::UpTo500),
            Some(dec("8"))
        );
    }

    #[test]
    fn test_weight_handling_placeholders_are_absent() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let easy_ship = &loader.rate_table().weight_handling().easy_ship.standard;

        assert_eq!(
            easy_ship.first_500g[&ServiceLevel::Standard].local,
            Some(dec("20"))
        );
        assert_eq!(easy_ship.first_500g[&ServiceLevel::Standard].ixd, None);
    }

    #[test]
    fn test_other_fees_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let other = loader.rate_table().other();

        assert_eq!(other.pick_and_pack.standard, Some(dec("14")));
        assert_eq!(other.pick_and_pack.oversize_heavy_bulky, Some(dec("26")));
        assert_eq!(other.storage_per_cubic_foot_month, Some(dec("45")));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("marketplace.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
