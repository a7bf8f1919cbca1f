//! Rate-sheet parsing.
//!
//! The fee schedule is maintained as a spreadsheet with one tab per fee
//! family. Each tab arrives as raw string rows (header first), exactly as a
//! spreadsheet export returns them: currency symbols, percent signs,
//! placeholder dashes and short rows with trailing empty cells omitted.
//! The functions here turn those rows into the typed tables in
//! [`super::types`].

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::ServiceLevel;

use super::types::{
    ClosingFees, EasyShipRates, EasyShipStandardRates, FbaRates, HeavyBulkyRates, OtherFees,
    PriceBracket, RateTable, ReferralCategory, ReferralFees, StandardBandRates, Tier,
    WeightHandlingFees, ZoneRates,
};

/// Sheet name of the referral-fee tab.
pub const REFERRAL_FEES_SHEET: &str = "Referral Fees";
/// Sheet name of the closing-fee tab.
pub const CLOSING_FEES_SHEET: &str = "Closing Fees";
/// Sheet name of the weight-handling tab.
pub const WEIGHT_HANDLING_FEES_SHEET: &str = "Weight Handling Fees";
/// Sheet name of the other-fees tab.
pub const OTHER_FEES_SHEET: &str = "Other Fees";

/// Number of data rows the weight-handling tab must carry.
pub const WEIGHT_HANDLING_ROWS: usize = 19;

/// Column of the first zone (Local) in the weight-handling tab.
const FIRST_ZONE_COLUMN: usize = 2;

const PLACEHOLDERS: [&str; 3] = ["", "-", "NA"];

/// One spreadsheet tab as raw string rows. The first row is the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSheet {
    /// Tab name, used in error messages.
    pub sheet: String,
    /// Raw cell text, row by row.
    pub rows: Vec<Vec<String>>,
}

impl RateSheet {
    /// Creates a sheet from string-like rows.
    pub fn new<S: AsRef<str>>(sheet: &str, rows: &[Vec<S>]) -> Self {
        Self {
            sheet: sheet.to_string(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
        }
    }

    /// Returns the data rows (header skipped).
    fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    fn malformed(&self, row: usize, column: usize, value: &str) -> EngineError {
        EngineError::MalformedRateCell {
            sheet: self.sheet.clone(),
            row,
            column,
            value: value.to_string(),
        }
    }

    fn shape_error(&self, message: impl Into<String>) -> EngineError {
        EngineError::RateSheetShape {
            sheet: self.sheet.clone(),
            message: message.into(),
        }
    }
}

/// Returns a cell's text, treating cells past the end of a short row as empty.
fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(|c| c.trim()).unwrap_or("")
}

/// Parses currency text into an amount.
///
/// Placeholders (`""`, `"-"`, `"NA"`) are absent. The rupee sign and
/// thousands separators are stripped, and a trailing unit phrase such as
/// `"per cubic foot per month"` is ignored. Anything else that does not
/// parse as a non-negative number is an error.
fn parse_currency(text: &str) -> Result<Option<Decimal>, ()> {
    let text = text.trim();
    if PLACEHOLDERS.contains(&text) {
        return Ok(None);
    }

    let cleaned: String = text.chars().filter(|c| *c != '₹' && *c != ',').collect();
    let mut parts = cleaned.trim().splitn(2, char::is_whitespace);
    let number = parts.next().unwrap_or("");
    let suffix = parts.next().map(str::trim).unwrap_or("");

    if !suffix.is_empty() && !suffix.starts_with("per ") {
        return Err(());
    }

    match Decimal::from_str(number) {
        Ok(amount) if amount >= Decimal::ZERO => Ok(Some(amount)),
        _ => Err(()),
    }
}

/// Parses a percentage cell such as `"8.5%"` into `8.5`.
fn parse_percentage(text: &str) -> Result<Decimal, ()> {
    let number = text.trim().trim_end_matches('%').trim();
    match Decimal::from_str(number) {
        Ok(percentage) if percentage >= Decimal::ZERO => Ok(percentage),
        _ => Err(()),
    }
}

/// Parses a referral price-range cell into a tier with the given percentage.
///
/// `"<= X"` gives an inclusive upper bound, `"> X"` an exclusive lower bound
/// and `"All"` a flat tier.
fn parse_price_range(text: &str, percentage: Decimal) -> Result<Tier, ()> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("all") {
        return Ok(Tier::Flat { percentage });
    }

    let bound = |rest: &str| -> Result<Decimal, ()> {
        match parse_currency(rest) {
            Ok(Some(value)) => Ok(value),
            _ => Err(()),
        }
    };

    if let Some(rest) = text.strip_prefix("<=") {
        Ok(Tier::Bounded {
            min_price: None,
            max_price: Some(bound(rest)?),
            percentage,
        })
    } else if let Some(rest) = text.strip_prefix('>') {
        Ok(Tier::Bounded {
            min_price: Some(bound(rest)?),
            max_price: None,
            percentage,
        })
    } else {
        Err(())
    }
}

/// Parses the referral-fee tab.
///
/// Columns: category label, price range, percentage. Rows whose category is
/// outside the taxonomy are skipped. Tiers keep sheet order, which must be
/// ascending by price for first-match resolution to pick the right bracket.
pub fn parse_referral_fees(sheet: &RateSheet) -> EngineResult<ReferralFees> {
    let mut fees = ReferralFees::new();

    for (index, row) in sheet.data_rows().iter().enumerate() {
        let label = cell(row, 0);
        let Some(category) = ReferralCategory::from_sheet_label(label) else {
            debug!(sheet = %sheet.sheet, row = index, label, "Skipping unmapped referral category");
            continue;
        };

        let percentage_text = cell(row, 2);
        let percentage =
            parse_percentage(percentage_text).map_err(|_| sheet.malformed(index, 2, percentage_text))?;

        let range_text = cell(row, 1);
        let tier = parse_price_range(range_text, percentage)
            .map_err(|_| sheet.malformed(index, 1, range_text))?;

        fees.push(category, tier);
    }

    Ok(fees)
}

/// Parses the closing-fee tab.
///
/// Columns: price range, FBA normal, FBA exception, Easy Ship standard,
/// Self Ship.
pub fn parse_closing_fees(sheet: &RateSheet) -> EngineResult<ClosingFees> {
    let mut fees = ClosingFees::default();

    for (index, row) in sheet.data_rows().iter().enumerate() {
        let label = cell(row, 0);
        let bracket = PriceBracket::from_sheet_label(label)
            .ok_or_else(|| sheet.shape_error(format!("unknown price range '{}' in row {}", label, index)))?;

        let amount = |column: usize| -> EngineResult<Option<Decimal>> {
            let text = cell(row, column);
            parse_currency(text).map_err(|_| sheet.malformed(index, column, text))
        };

        fees.fba_normal.set(bracket, amount(1)?);
        fees.fba_exception.set(bracket, amount(2)?);
        fees.easy_ship_standard.set(bracket, amount(3)?);
        fees.self_ship.set(bracket, amount(4)?);
    }

    Ok(fees)
}

/// Parses the weight-handling tab.
///
/// The tab is positional: column 0 names the channel, column 1 the band,
/// and columns 2 to 5 hold the Local, Regional, National and IXD rates.
///
/// | Rows  | Content |
/// |-------|---------|
/// | 0-3   | Easy Ship first 500g: premium, advanced, standard, basic |
/// | 4-6   | Easy Ship +500g to 1kg, per kg after 1kg, per kg after 5kg |
/// | 7-8   | Easy Ship heavy & bulky: first 12kg, per kg after 12kg |
/// | 9-11  | FBA first 500g: premium, standard, basic |
/// | 12-14 | FBA +500g to 1kg, per kg after 1kg, per kg after 5kg (shared) |
/// | 15-17 | FBA heavy & bulky first 12kg: premium, standard, basic |
/// | 18    | FBA heavy & bulky per kg after 12kg (shared) |
pub fn parse_weight_handling_fees(sheet: &RateSheet) -> EngineResult<WeightHandlingFees> {
    let rows = sheet.data_rows();
    if rows.len() < WEIGHT_HANDLING_ROWS {
        return Err(sheet.shape_error(format!(
            "expected {} data rows, found {}",
            WEIGHT_HANDLING_ROWS,
            rows.len()
        )));
    }

    let zones = |index: usize| -> EngineResult<ZoneRates> {
        let row = &rows[index];
        let mut values = [None; 4];
        for (offset, value) in values.iter_mut().enumerate() {
            let column = FIRST_ZONE_COLUMN + offset;
            let text = cell(row, column);
            *value = parse_currency(text).map_err(|_| sheet.malformed(index, column, text))?;
        }
        let [local, regional, national, ixd] = values;
        Ok(ZoneRates {
            local,
            regional,
            national,
            ixd,
        })
    };

    let mut easy_ship_first_500g = HashMap::new();
    for (index, level) in ServiceLevel::ALL.iter().enumerate() {
        easy_ship_first_500g.insert(*level, zones(index)?);
    }

    let easy_ship = EasyShipRates {
        standard: EasyShipStandardRates {
            first_500g: easy_ship_first_500g,
            additional_500g_up_to_1kg: zones(4)?,
            additional_kg_after_1kg: zones(5)?,
            additional_kg_after_5kg: zones(6)?,
        },
        heavy_bulky: HeavyBulkyRates {
            first_12kg: zones(7)?,
            additional_kg_after_12kg: zones(8)?,
        },
    };

    let fba_levels = [
        ServiceLevel::Premium,
        ServiceLevel::Standard,
        ServiceLevel::Basic,
    ];
    let mut fba = FbaRates::default();
    for (offset, level) in fba_levels.iter().enumerate() {
        fba.standard.insert(
            *level,
            StandardBandRates {
                first_500g: zones(9 + offset)?,
                additional_500g_up_to_1kg: zones(12)?,
                additional_kg_after_1kg: zones(13)?,
                additional_kg_after_5kg: zones(14)?,
            },
        );
        fba.heavy_bulky.insert(
            *level,
            HeavyBulkyRates {
                first_12kg: zones(15 + offset)?,
                additional_kg_after_12kg: zones(18)?,
            },
        );
    }

    Ok(WeightHandlingFees { easy_ship, fba })
}

/// Parses the other-fees tab.
///
/// Columns: fee type, category, rate. Unrecognised rows are skipped and
/// their fees stay absent.
pub fn parse_other_fees(sheet: &RateSheet) -> EngineResult<OtherFees> {
    let mut fees = OtherFees::default();

    for (index, row) in sheet.data_rows().iter().enumerate() {
        let fee_type = cell(row, 0);
        let category = cell(row, 1);
        let rate_text = cell(row, 2);
        let rate = parse_currency(rate_text).map_err(|_| sheet.malformed(index, 2, rate_text))?;

        match fee_type {
            "Pick & Pack Fee" => match category {
                "Standard Size" => fees.pick_and_pack.standard = rate,
                "Oversize/Heavy & Bulky" => fees.pick_and_pack.oversize_heavy_bulky = rate,
                _ => debug!(sheet = %sheet.sheet, row = index, category, "Skipping pick & pack row"),
            },
            "Storage Fee" => fees.storage_per_cubic_foot_month = rate,
            "Removal Fees" => {
                let sized = if category.contains("Standard Size") {
                    Some(&mut fees.removal.standard_size)
                } else if category.contains("Heavy & Bulky") {
                    Some(&mut fees.removal.heavy_bulky)
                } else {
                    None
                };

                match sized {
                    Some(rates) if category.contains("Standard Shipping") => {
                        rates.standard_shipping = rate
                    }
                    Some(rates) if category.contains("Expedited Shipping") => {
                        rates.expedited_shipping = rate
                    }
                    _ => debug!(sheet = %sheet.sheet, row = index, category, "Skipping removal row"),
                }
            }
            _ => debug!(sheet = %sheet.sheet, row = index, fee_type, "Skipping unknown fee type"),
        }
    }

    Ok(fees)
}

/// Parses all four tabs into a [`RateTable`].
pub fn build_rate_table(
    referral: &RateSheet,
    closing: &RateSheet,
    weight_handling: &RateSheet,
    other: &RateSheet,
) -> EngineResult<RateTable> {
    Ok(RateTable::new(
        parse_referral_fees(referral)?,
        parse_closing_fees(closing)?,
        parse_weight_handling_fees(weight_handling)?,
        parse_other_fees(other)?,
    ))
}
