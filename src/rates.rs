//! Carrier rate-quote request construction and response reduction.
//!
//! `build_rate_request` turns a cart snapshot plus the box-type catalog into
//! the document the carrier rate API accepts; `reduce_rates` collapses the
//! raw quote list to the cheapest option per delivery-speed tier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cart::CartSnapshot;
use crate::config::{CarrierConfig, ShipFrom};
use crate::model::BoxType;
use crate::packer::{PackingOutcome, PackingStrategy};

/// Generic package code advertised whenever a USPS priority service is selected.
const GENERIC_PACKAGE_CODE: &str = "package";
const USPS_PRIORITY_DOMESTIC: &str = "usps_priority_mail";
const USPS_PRIORITY_INTERNATIONAL: &str = "usps_priority_mail_international";

const OUNCE: &str = "ounce";
const CENTIMETER: &str = "centimeter";

/// The rate-quote request document.
#[derive(Clone, Debug, Serialize)]
pub struct RateRequest {
    pub rate_options: RateOptions,
    pub shipment: Shipment,
}

#[derive(Clone, Debug, Serialize)]
pub struct RateOptions {
    pub carrier_ids: Vec<String>,
    pub service_codes: Vec<String>,
    pub package_types: Vec<String>,
    pub calculate_tax_amount: bool,
    pub preferred_currency: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Shipment {
    pub ship_from: ShipFrom,
    pub ship_to: ShipTo,
    pub packages: Vec<ShipmentPackage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs: Option<Customs>,
}

/// Destination address, projected from the cart's shipping fields.
#[derive(Clone, Debug, Serialize)]
pub struct ShipTo {
    pub name: String,
    pub phone: String,
    pub address_line1: String,
    pub city_locality: String,
    pub state_province: String,
    pub postal_code: String,
    pub country_code: String,
}

impl ShipTo {
    /// A cart without a country ships domestically, so the ship-from
    /// country doubles as the fallback destination country.
    fn from_cart(cart: &CartSnapshot, fallback_country: &str) -> Self {
        Self {
            name: cart.recipient_name(),
            phone: cart.shipping_phone.clone().unwrap_or_default(),
            address_line1: cart.shipping_street_address.clone().unwrap_or_default(),
            city_locality: cart.shipping_city.clone().unwrap_or_default(),
            state_province: cart.shipping_state.clone().unwrap_or_default(),
            postal_code: cart.shipping_postal_code.clone().unwrap_or_default(),
            country_code: cart
                .shipping_country_code_alpha2
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| fallback_country.to_string()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ShipmentPackage {
    pub weight: WeightSpec,
    pub dimensions: DimensionSpec,
}

#[derive(Clone, Debug, Serialize)]
pub struct WeightSpec {
    pub value: f64,
    pub unit: String,
}

impl WeightSpec {
    fn ounces(value: f64) -> Self {
        Self {
            value,
            unit: OUNCE.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DimensionSpec {
    pub unit: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl DimensionSpec {
    fn centimeters((length, width, height): (f64, f64, f64)) -> Self {
        Self {
            unit: CENTIMETER.to_string(),
            length,
            width,
            height,
        }
    }
}

/// Customs declaration attached to international shipments.
#[derive(Clone, Debug, Serialize)]
pub struct Customs {
    pub contents: String,
    pub non_delivery: String,
    pub customs_items: Vec<CustomsItem>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CustomsItem {
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonized_tariff_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    pub value: MonetaryValue,
}

/// Currency + amount pair used on both sides of the wire.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonetaryValue {
    pub currency: String,
    pub amount: f64,
}

/// Envelope the carrier API wraps rate responses in.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RateApiResponse {
    #[serde(default)]
    pub rate_response: RateResponseBody,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RateResponseBody {
    #[serde(default)]
    pub rates: Vec<RateQuote>,
    #[serde(default)]
    pub invalid_rates: Vec<RateQuote>,
}

/// One quoted rate from the carrier response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateQuote {
    #[serde(default)]
    pub rate_id: Option<String>,
    #[serde(default)]
    pub carrier_id: Option<String>,
    #[serde(default)]
    pub carrier_friendly_name: Option<String>,
    #[serde(default)]
    pub service_code: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub package_type: Option<String>,
    #[serde(default)]
    pub delivery_days: Option<u32>,
    #[serde(default)]
    pub shipping_amount: MonetaryValue,
    #[serde(default)]
    pub error_messages: Vec<String>,
}

/// The assembled request together with the packing it was built from.
///
/// Callers need both: the request goes to the carrier, the packing outcome
/// explains the weight breakdown and any dropped items.
#[derive(Clone, Debug)]
pub struct PreparedRateRequest {
    pub request: RateRequest,
    pub packing: PackingOutcome,
}

/// Builds the carrier rate-quote request for a cart.
///
/// Expands line items by quantity, runs the packing strategy over the
/// supplied box-type catalog, selects service codes for the destination
/// class, and attaches a customs declaration when shipping internationally.
pub fn build_rate_request(
    cart: &CartSnapshot,
    box_types: &[BoxType],
    config: &CarrierConfig,
    strategy: &dyn PackingStrategy,
) -> PreparedRateRequest {
    let packing = strategy.pack(cart.expand_items(), box_types);

    let international = is_international(cart, config);
    let service_codes = config.service_codes(international);
    let package_types = advertised_package_types(&packing, &service_codes);

    let packages = packing
        .packed
        .iter()
        .map(|packed| ShipmentPackage {
            weight: WeightSpec::ounces(packed.total_weight_oz()),
            dimensions: DimensionSpec::centimeters(packed.box_type.dims()),
        })
        .collect();

    let customs = international.then(|| build_customs(cart, config));

    let request = RateRequest {
        rate_options: RateOptions {
            carrier_ids: config.carrier_ids(),
            service_codes,
            package_types,
            calculate_tax_amount: config.calculate_tax_amount,
            preferred_currency: config.preferred_currency.clone(),
        },
        shipment: Shipment {
            ship_from: config.ship_from.clone(),
            ship_to: ShipTo::from_cart(cart, &config.ship_from.country_code),
            packages,
            customs,
        },
    };

    PreparedRateRequest { request, packing }
}

/// Destination is domestic unless the cart names a country different from
/// the ship-from country; a missing country fails open to domestic.
fn is_international(cart: &CartSnapshot, config: &CarrierConfig) -> bool {
    match cart.shipping_country_code_alpha2.as_deref() {
        Some(code) if !code.is_empty() => code != config.ship_from.country_code,
        _ => false,
    }
}

/// Distinct carrier package codes across the packed boxes, plus the generic
/// code whenever a USPS priority service is among the selected codes.
fn advertised_package_types(packing: &PackingOutcome, service_codes: &[String]) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for packed in &packing.packed {
        if let Some(code) = &packed.box_type.code_for_carrier {
            if !codes.iter().any(|c| c == code) {
                codes.push(code.clone());
            }
        }
    }

    let uses_usps_priority = service_codes
        .iter()
        .any(|c| c == USPS_PRIORITY_DOMESTIC || c == USPS_PRIORITY_INTERNATIONAL);
    if uses_usps_priority && !codes.iter().any(|c| c == GENERIC_PACKAGE_CODE) {
        codes.push(GENERIC_PACKAGE_CODE.to_string());
    }

    codes
}

/// One customs line per cart line, declared value resolved per unit.
fn build_customs(cart: &CartSnapshot, config: &CarrierConfig) -> Customs {
    let currency = cart
        .currency
        .clone()
        .unwrap_or_else(|| config.preferred_currency.clone());

    let customs_items = cart
        .cart_items
        .iter()
        .map(|line| {
            let unit = line.unit_item();
            CustomsItem {
                quantity: line.quantity,
                description: unit.customs_description,
                harmonized_tariff_code: unit.harmonized_code,
                country_of_origin: unit.origin_country,
                value: MonetaryValue {
                    currency: currency.clone(),
                    amount: unit.declared_value,
                },
            }
        })
        .collect();

    Customs {
        contents: "merchandise".to_string(),
        non_delivery: "treat_as_abandoned".to_string(),
        customs_items,
    }
}

/// Reduces the raw carrier response to the cheapest quote per distinct
/// delivery time.
///
/// The first quote for a delivery-days value establishes the candidate;
/// later quotes replace it only if strictly cheaper. Output order follows
/// the order in which distinct delivery-days values first appear. Invalid
/// rates are carrier noise: logged as warnings, never an error.
pub fn reduce_rates(body: &RateResponseBody) -> Vec<RateQuote> {
    for invalid in &body.invalid_rates {
        warn!(
            carrier_id = invalid.carrier_id.as_deref().unwrap_or("unknown"),
            service_code = invalid.service_code.as_deref().unwrap_or("unknown"),
            errors = ?invalid.error_messages,
            "carrier marked a rate invalid, excluding it"
        );
    }

    let mut best: Vec<RateQuote> = Vec::new();
    let mut index_by_days: HashMap<Option<u32>, usize> = HashMap::new();

    for quote in &body.rates {
        match index_by_days.get(&quote.delivery_days) {
            Some(&idx) => {
                if quote.shipping_amount.amount < best[idx].shipping_amount.amount {
                    best[idx] = quote.clone();
                }
            }
            None => {
                index_by_days.insert(quote.delivery_days, best.len());
                best.push(quote.clone());
            }
        }
    }

    best
}
