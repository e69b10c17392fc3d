//! Data models for carton packing and rate shopping.
//!
//! This module defines the structures shared by the packing planner and the
//! rate request builder:
//! - `Item`: one physical unit of a cart line, snapshotted for a single computation
//! - `BoxType`: a candidate carton from the package-type catalog
//! - `PackedBox`: a chosen carton together with the items assigned to it

use serde::{Deserialize, Serialize};

/// Validation error for catalog data.
#[derive(Debug, Clone)]
pub enum ValidationError {
    InvalidDimension(String),
    InvalidWeight(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidDimension(msg) => write!(f, "Invalid dimension: {}", msg),
            ValidationError::InvalidWeight(msg) => write!(f, "Invalid weight: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Helper function to validate a single dimension.
fn validate_dimension(value: f64, name: &str) -> Result<(), ValidationError> {
    if value <= 0.0 || value.is_nan() || value.is_infinite() {
        return Err(ValidationError::InvalidDimension(format!(
            "{} must be positive, got: {}",
            name, value
        )));
    }
    Ok(())
}

/// Helper function to validate an optional tare weight.
fn validate_tare_weight(value: Option<f64>) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if value < 0.0 || value.is_nan() || value.is_infinite() {
            return Err(ValidationError::InvalidWeight(format!(
                "Tare weight must be non-negative, got: {}",
                value
            )));
        }
    }
    Ok(())
}

/// Reference back to the product/variant/SKU tuple an item was built from.
///
/// Items are ephemeral snapshots; this is the only identity they carry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub product_id: Option<i64>,
    pub variant_id: Option<i64>,
    pub sku_id: Option<i64>,
}

/// One physical unit of a single cart line (quantity already expanded).
///
/// Dimensions are the *product's* packaging dimensions in centimeters — the
/// SKU and variant contribute weight and price, never footprint. Weight is
/// pre-resolved through the SKU → variant → 0 fallback chain.
///
/// # Fields
/// * `id` - Reference to the originating product/variant/SKU records
/// * `length`, `width`, `height` - Packaging footprint in cm
/// * `weight_oz` - Resolved unit weight in ounces
/// * `ship_alone` - Forces isolation into a dedicated box
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemRef,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight_oz: f64,
    pub ship_alone: bool,
    pub customs_description: Option<String>,
    pub harmonized_code: Option<String>,
    pub origin_country: Option<String>,
    pub declared_value: f64,
}

impl Item {
    /// Returns the packaging dimensions as a (length, width, height) tuple.
    #[inline]
    pub fn dims(&self) -> (f64, f64, f64) {
        (self.length, self.width, self.height)
    }

    /// Calculates the packaging volume.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// A candidate carton from the package-type catalog.
///
/// Read-only to this crate; the catalog is CRUD-managed elsewhere.
///
/// # Fields
/// * `length_cm`, `width_cm`, `height_cm` - Interior dimensions in cm
/// * `weight_oz` - Tare weight of the empty carton, if known
/// * `code_for_carrier` - Carrier-specific package code, if assigned
/// * `max_weight_oz` - Capacity cap from the catalog schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoxType {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub weight_oz: Option<f64>,
    #[serde(default)]
    pub code_for_carrier: Option<String>,
    // TODO: enforce max_weight_oz once the packer tracks per-box weight.
    #[serde(default)]
    pub max_weight_oz: Option<f64>,
}

impl BoxType {
    /// Creates a new box type with validation.
    ///
    /// # Returns
    /// `Ok(BoxType)` for valid values, otherwise `Err(ValidationError)`
    pub fn new(
        length_cm: f64,
        width_cm: f64,
        height_cm: f64,
        weight_oz: Option<f64>,
        code_for_carrier: Option<String>,
    ) -> Result<Self, ValidationError> {
        validate_dimension(length_cm, "Length")?;
        validate_dimension(width_cm, "Width")?;
        validate_dimension(height_cm, "Height")?;
        validate_tare_weight(weight_oz)?;
        Ok(Self {
            length_cm,
            width_cm,
            height_cm,
            weight_oz,
            code_for_carrier,
            max_weight_oz: None,
        })
    }

    /// Returns the interior dimensions as a (length, width, height) tuple.
    #[inline]
    pub fn dims(&self) -> (f64, f64, f64) {
        (self.length_cm, self.width_cm, self.height_cm)
    }

    /// Calculates the interior volume.
    pub fn volume(&self) -> f64 {
        self.length_cm * self.width_cm * self.height_cm
    }

    /// Tare weight of the empty carton, 0 when the catalog leaves it unset.
    pub fn tare_weight_oz(&self) -> f64 {
        self.weight_oz.unwrap_or(0.0)
    }
}

/// A chosen carton and the items assigned to it.
///
/// # Fields
/// * `box_type` - The catalog entry this box was opened from
/// * `items` - Items in placement order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackedBox {
    pub box_type: BoxType,
    pub items: Vec<Item>,
}

impl PackedBox {
    /// Opens a new box of the given type containing a first item.
    pub fn open(box_type: BoxType, first_item: Item) -> Self {
        Self {
            box_type,
            items: vec![first_item],
        }
    }

    /// Total shipping weight: carton tare plus the contained item weights.
    pub fn total_weight_oz(&self) -> f64 {
        self.box_type.tare_weight_oz() + self.items.iter().map(|i| i.weight_oz).sum::<f64>()
    }

    /// Number of items in the box.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
