//! Cart snapshots as delivered by the cart store.
//!
//! The upstream store serializes carts with a mix of snake_case and
//! camelCase field names; the serde renames and aliases below accept the
//! shapes it actually emits. This crate only reads these records — it never
//! writes back to the cart.

use serde::{Deserialize, Serialize};

use crate::model::{Item, ItemRef};

/// A number-or-numeric-string field.
///
/// Decimal columns arrive from the store as strings as often as numbers;
/// `as_f64` coerces either form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Shipping address and line items for one cart.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "shipping_countryCodeAlpha2")]
    pub shipping_country_code_alpha2: Option<String>,
    #[serde(default, rename = "shipping_firstName")]
    pub shipping_first_name: Option<String>,
    #[serde(default, rename = "shipping_lastName")]
    pub shipping_last_name: Option<String>,
    #[serde(default, rename = "shipping_streetAddress")]
    pub shipping_street_address: Option<String>,
    #[serde(default)]
    pub shipping_city: Option<String>,
    #[serde(default)]
    pub shipping_state: Option<String>,
    #[serde(default, rename = "shipping_postalCode")]
    pub shipping_postal_code: Option<String>,
    #[serde(default)]
    pub shipping_phone: Option<String>,
    #[serde(default)]
    pub cart_items: Vec<CartLine>,
}

impl CartSnapshot {
    /// Recipient name as the carrier expects it.
    pub fn recipient_name(&self) -> String {
        let first = self.shipping_first_name.as_deref().unwrap_or("");
        let last = self.shipping_last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }

    /// Expands the cart into one `Item` per physical unit, in line order.
    pub fn expand_items(&self) -> Vec<Item> {
        self.cart_items
            .iter()
            .flat_map(|line| {
                let unit = line.unit_item();
                (0..line.quantity).map(move |_| unit.clone())
            })
            .collect()
    }
}

/// One cart line with its resolved product/variant/SKU snapshot.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CartLine {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub product: Option<ProductRecord>,
    #[serde(default)]
    pub product_variant: Option<VariantRecord>,
    #[serde(default)]
    pub product_variant_sku: Option<SkuRecord>,
}

fn default_quantity() -> u32 {
    1
}

impl CartLine {
    /// Builds the per-unit snapshot for this line.
    ///
    /// Packaging dimensions come from the product; weight and declared value
    /// resolve through the SKU-before-variant fallback chains.
    pub fn unit_item(&self) -> Item {
        let product = self.product.as_ref();
        let variant = self.product_variant.as_ref();
        let sku = self.product_variant_sku.as_ref();

        Item {
            id: ItemRef {
                product_id: product.and_then(|p| p.id),
                variant_id: variant.and_then(|v| v.id),
                sku_id: sku.and_then(|s| s.id),
            },
            length: product.and_then(|p| p.length).unwrap_or(0.0),
            width: product.and_then(|p| p.width).unwrap_or(0.0),
            height: product.and_then(|p| p.height).unwrap_or(0.0),
            weight_oz: resolve_weight(sku, variant),
            ship_alone: product.and_then(|p| p.ship_alone).unwrap_or(false),
            customs_description: product.and_then(|p| p.customs_description.clone()),
            harmonized_code: product.and_then(|p| p.harmonized_code.clone()),
            origin_country: product.and_then(|p| p.origin_country.clone()),
            declared_value: resolve_display_price(sku, variant),
        }
    }
}

/// Product record slice: packaging dimensions and customs fields live here.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, alias = "shipAlone")]
    pub ship_alone: Option<bool>,
    #[serde(default, alias = "customsDescription")]
    pub customs_description: Option<String>,
    #[serde(default, alias = "harmonizedCode")]
    pub harmonized_code: Option<String>,
    #[serde(default, alias = "originCountry")]
    pub origin_country: Option<String>,
}

/// Variant record slice: the weight/price defaults a SKU may override.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct VariantRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub weight: Option<Scalar>,
    #[serde(default)]
    pub display_price: Option<Scalar>,
}

/// SKU record slice: the most specific weight/price overrides.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SkuRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub weight: Option<Scalar>,
    #[serde(default)]
    pub display_price: Option<Scalar>,
}

/// Resolves the shipping weight for one unit.
///
/// Precedence: SKU weight when present and non-zero (numeric strings are
/// coerced), else variant weight, else 0. The SKU-level override beating the
/// variant-level default is deliberate.
pub fn resolve_weight(sku: Option<&SkuRecord>, variant: Option<&VariantRecord>) -> f64 {
    if let Some(weight) = sku.and_then(|s| s.weight.as_ref()).and_then(Scalar::as_f64) {
        if weight != 0.0 {
            return weight;
        }
    }
    variant
        .and_then(|v| v.weight.as_ref())
        .and_then(Scalar::as_f64)
        .unwrap_or(0.0)
}

/// Resolves the declared customs value for one unit: SKU display price when
/// present, else variant display price, else 0.
pub fn resolve_display_price(sku: Option<&SkuRecord>, variant: Option<&VariantRecord>) -> f64 {
    sku.and_then(|s| s.display_price.as_ref())
        .and_then(Scalar::as_f64)
        .or_else(|| {
            variant
                .and_then(|v| v.display_price.as_ref())
                .and_then(Scalar::as_f64)
        })
        .unwrap_or(0.0)
}
