//! Weight-handling fee calculation functionality.
//!
//! This module prices a shipment by weight band, service level and delivery
//! zone. Standard-size parcels pay a first-500g base charge plus stepwise
//! increments; heavy & bulky parcels pay a first-12kg base plus a per-kg
//! increment. Every partial kilogram beyond a base band is rounded up.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{WEIGHT_HANDLING_FEES_SHEET, WeightHandlingFees, ZoneRates};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Location, ProductSize, ServiceLevel, ShippingMode};

const HALF_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const ONE_KG: Decimal = Decimal::from_parts(1, 0, 0, false, 0);
const FIVE_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
const TWELVE_KG: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Most whole-kg units the 1kg to 5kg band can contribute.
const MAX_UNITS_AFTER_1KG: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// One band's contribution to a weight-handling fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandCharge {
    /// Band name, e.g. "first_500g" or "additional_kg_after_1kg".
    pub band: &'static str,
    /// Number of units charged (1 for flat bands).
    pub units: Decimal,
    /// Rate per unit.
    pub rate: Decimal,
    /// `units × rate`.
    pub amount: Decimal,
}

impl BandCharge {
    fn new(band: &'static str, units: Decimal, rate: Decimal) -> EngineResult<Self> {
        let amount = units.checked_mul(rate).ok_or_else(|| {
            warn!(band, %units, %rate, "Band charge overflowed");
            EngineError::out_of_range("weight_kg")
        })?;
        Ok(Self {
            band,
            units,
            rate,
            amount,
        })
    }
}

/// The result of resolving a weight-handling fee.
#[derive(Debug, Clone)]
pub struct WeightHandlingFeeResult {
    /// The weight-handling fee amount.
    pub fee: Decimal,
    /// The bands that were charged, in order.
    pub charges: Vec<BandCharge>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Looks up a zone rate, failing with the table and cell that were needed.
fn zone_rate(
    zones: &ZoneRates,
    location: Location,
    table: &str,
    band: &str,
) -> EngineResult<Decimal> {
    zones.get(location).ok_or_else(|| {
        warn!(table, band, location = location.as_str(), "Weight-handling cell is absent");
        EngineError::MissingRateCell {
            table: table.to_string(),
            cell: format!("{}/{}", band, location.as_str()),
        }
    })
}

/// Borrowed view of one set of standard-size bands.
struct StandardBands<'a> {
    table: &'static str,
    first_500g_cell: String,
    first_500g: &'a ZoneRates,
    additional_500g_up_to_1kg: &'a ZoneRates,
    additional_kg_after_1kg: &'a ZoneRates,
    additional_kg_after_5kg: &'a ZoneRates,
}

/// Prices a standard-size parcel band by band.
///
/// Only the bands the weight reaches are read, so an absent after-5kg rate
/// does not affect a 0.4kg parcel.
fn charge_standard(
    bands: &StandardBands<'_>,
    weight: Decimal,
    location: Location,
) -> EngineResult<Vec<BandCharge>> {
    let mut charges = vec![BandCharge::new(
        "first_500g",
        Decimal::ONE,
        zone_rate(bands.first_500g, location, bands.table, &bands.first_500g_cell)?,
    )?];

    if weight > HALF_KG {
        let rate = zone_rate(
            bands.additional_500g_up_to_1kg,
            location,
            bands.table,
            "additional_500g_up_to_1kg",
        )?;
        charges.push(BandCharge::new("additional_500g_up_to_1kg", Decimal::ONE, rate)?);
    }

    if weight > ONE_KG {
        let units = if weight > FIVE_KG {
            MAX_UNITS_AFTER_1KG
        } else {
            (weight - ONE_KG).ceil()
        };
        let rate = zone_rate(
            bands.additional_kg_after_1kg,
            location,
            bands.table,
            "additional_kg_after_1kg",
        )?;
        charges.push(BandCharge::new("additional_kg_after_1kg", units, rate)?);
    }

    if weight > FIVE_KG {
        let rate = zone_rate(
            bands.additional_kg_after_5kg,
            location,
            bands.table,
            "additional_kg_after_5kg",
        )?;
        charges.push(BandCharge::new(
            "additional_kg_after_5kg",
            (weight - FIVE_KG).ceil(),
            rate,
        )?);
    }

    Ok(charges)
}

/// Prices an Easy Ship heavy & bulky parcel.
fn charge_heavy_bulky(
    rates: &WeightHandlingFees,
    weight: Decimal,
    location: Location,
) -> EngineResult<Vec<BandCharge>> {
    let table = "weight_handling.easy_ship.heavy_bulky";
    let heavy_bulky = &rates.easy_ship.heavy_bulky;

    let mut charges = vec![BandCharge::new(
        "first_12kg",
        Decimal::ONE,
        zone_rate(&heavy_bulky.first_12kg, location, table, "first_12kg")?,
    )?];

    if weight > TWELVE_KG {
        let rate = zone_rate(
            &heavy_bulky.additional_kg_after_12kg,
            location,
            table,
            "additional_kg_after_12kg",
        )?;
        charges.push(BandCharge::new(
            "additional_kg_after_12kg",
            (weight - TWELVE_KG).ceil(),
            rate,
        )?);
    }

    Ok(charges)
}

fn missing_service_level(table: &str, service_level: ServiceLevel) -> EngineError {
    warn!(table, service_level = service_level.as_str(), "No rates for service level");
    EngineError::MissingRateCell {
        table: table.to_string(),
        cell: service_level.as_str().to_string(),
    }
}

/// Selects and prices the bands for a shipment.
fn resolve_charges(
    rates: &WeightHandlingFees,
    mode: ShippingMode,
    weight: Decimal,
    service_level: ServiceLevel,
    location: Location,
    size: ProductSize,
) -> EngineResult<Vec<BandCharge>> {
    match (mode, size) {
        (ShippingMode::EasyShip, ProductSize::Standard) => {
            let table = "weight_handling.easy_ship.standard";
            let standard = &rates.easy_ship.standard;
            let first_500g = standard
                .first_500g
                .get(&service_level)
                .ok_or_else(|| missing_service_level(table, service_level))?;

            let bands = StandardBands {
                table,
                first_500g_cell: format!("first_500g/{}", service_level.as_str()),
                first_500g,
                additional_500g_up_to_1kg: &standard.additional_500g_up_to_1kg,
                additional_kg_after_1kg: &standard.additional_kg_after_1kg,
                additional_kg_after_5kg: &standard.additional_kg_after_5kg,
            };
            charge_standard(&bands, weight, location)
        }
        (ShippingMode::EasyShip, ProductSize::HeavyBulky) => charge_heavy_bulky(rates, weight, location),
        // FBA is keyed by service level only; size does not select a table.
        (ShippingMode::Fba, _) => {
            let table = "weight_handling.fba.standard";
            let standard = rates
                .fba
                .standard
                .get(&service_level)
                .ok_or_else(|| missing_service_level(table, service_level))?;

            let bands = StandardBands {
                table,
                first_500g_cell: format!("first_500g/{}", service_level.as_str()),
                first_500g: &standard.first_500g,
                additional_500g_up_to_1kg: &standard.additional_500g_up_to_1kg,
                additional_kg_after_1kg: &standard.additional_kg_after_1kg,
                additional_kg_after_5kg: &standard.additional_kg_after_5kg,
            };
            charge_standard(&bands, weight, location)
        }
        (ShippingMode::SelfShip, _) => Ok(Vec::new()),
    }
}

/// Calculates the weight-handling fee for a shipment.
///
/// Standard-size Easy Ship and all FBA parcels are charged:
/// - the first-500g rate for the service level and zone;
/// - a flat increment if the weight exceeds 0.5kg;
/// - `ceil(weight - 1)` per-kg units if it exceeds 1kg, capped at 4;
/// - `ceil(weight - 5)` per-kg units if it exceeds 5kg.
///
/// Heavy & bulky Easy Ship parcels pay the first-12kg rate plus
/// `ceil(weight - 12)` per-kg units above 12kg. Self Ship parcels carry no
/// weight-handling fee.
///
/// # Errors
///
/// - `InvalidInput` if `weight` is zero or negative
/// - `MissingRateCell` if a rate the weight reaches is absent
/// - `InvalidInput` if a band charge does not fit in a `Decimal`
///
/// # Examples
///
/// ```
/// use seller_fee_engine::calculation::calculate_weight_handling_fee;
/// use seller_fee_engine::config::{WeightHandlingFees, ZoneRates};
/// use seller_fee_engine::models::{Location, ProductSize, ServiceLevel, ShippingMode};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let local = |amount: i64| ZoneRates { local: Some(Decimal::new(amount, 0)), ..Default::default() };
///
/// let mut rates = WeightHandlingFees::default();
/// rates.easy_ship.standard.first_500g.insert(ServiceLevel::Standard, local(20));
/// rates.easy_ship.standard.additional_500g_up_to_1kg = local(10);
/// rates.easy_ship.standard.additional_kg_after_1kg = local(15);
///
/// let result = calculate_weight_handling_fee(
///     &rates,
///     ShippingMode::EasyShip,
///     Decimal::from_str("1.2").unwrap(),
///     ServiceLevel::Standard,
///     Location::Local,
///     ProductSize::Standard,
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.fee, Decimal::new(45, 0));
/// ```
pub fn calculate_weight_handling_fee(
    rates: &WeightHandlingFees,
    mode: ShippingMode,
    weight: Decimal,
    service_level: ServiceLevel,
    location: Location,
    size: ProductSize,
    step_number: u32,
) -> EngineResult<WeightHandlingFeeResult> {
    if weight <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "weight_kg".to_string(),
            message: format!("must be greater than zero (got {})", weight),
        });
    }

    let charges = resolve_charges(rates, mode, weight, service_level, location, size)?;
    let fee = charges
        .iter()
        .try_fold(Decimal::ZERO, |total, c| total.checked_add(c.amount))
        .ok_or_else(|| EngineError::out_of_range("weight_kg"))?;

    debug!(
        mode = mode.as_str(),
        size = size.as_str(),
        service_level = service_level.as_str(),
        location = location.as_str(),
        %weight,
        bands = charges.len(),
        %fee,
        "Weight-handling fee resolved"
    );

    let reasoning = if charges.is_empty() {
        format!("{} parcels carry no weight-handling fee", mode)
    } else {
        let parts: Vec<String> = charges
            .iter()
            .map(|c| {
                format!(
                    "{} ({} x {})",
                    c.band,
                    c.units.normalize(),
                    c.rate.normalize()
                )
            })
            .collect();
        format!(
            "{}kg {} {} parcel to {}: {} = {}",
            weight.normalize(),
            mode,
            size,
            location,
            parts.join(" + "),
            fee.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "weight_handling_fee".to_string(),
        rule_name: "Weight Handling Fee".to_string(),
        rate_source: WEIGHT_HANDLING_FEES_SHEET.to_string(),
        input: serde_json::json!({
            "shipping_mode": mode.as_str(),
            "weight_kg": weight.normalize().to_string(),
            "service_level": service_level.as_str(),
            "location": location.as_str(),
            "product_size": size.as_str()
        }),
        output: serde_json::json!({
            "charges": charges
                .iter()
                .map(|c| serde_json::json!({
                    "band": c.band,
                    "units": c.units.normalize().to_string(),
                    "rate": c.rate.normalize().to_string(),
                    "amount": c.amount.normalize().to_string()
                }))
                .collect::<Vec<_>>(),
            "fee": fee.normalize().to_string()
        }),
        reasoning,
    };

    Ok(WeightHandlingFeeResult {
        fee,
        charges,
        audit_step,
    })
}
