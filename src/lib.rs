//! Carton packing and carrier rate shopping for cart checkout.
//!
//! Given a cart's line items (each with physical dimensions and weight) and
//! a catalog of candidate box types, this crate decides how many cartons a
//! shipment needs and which items go where, builds the outbound
//! rate-shopping request for an external carrier rate API, and reduces the
//! raw response to the best quote per delivery-speed tier.
//!
//! The crate is a library: the checkout route, the product/cart stores, and
//! the package-type catalog are collaborators supplied by the caller. The
//! carrier API is reached through the [`CarrierClient`] seam so tests can
//! substitute a fake.

pub mod cart;
pub mod client;
pub mod config;
pub mod error;
pub mod fit;
pub mod model;
pub mod packer;
pub mod rates;
pub mod shopper;

pub use cart::{resolve_display_price, resolve_weight, CartLine, CartSnapshot, Scalar};
pub use client::{CarrierClient, ShipEngineClient, ShipEngineConfig};
pub use config::{CarrierAccount, CarrierConfig, ServiceCodeSet, ShipFrom};
pub use error::RateError;
pub use fit::{assess_fit, FitAssessment};
pub use model::{BoxType, Item, ItemRef, PackedBox, ValidationError};
pub use packer::{FirstFitPacker, PackingOutcome, PackingStrategy};
pub use rates::{
    build_rate_request, reduce_rates, PreparedRateRequest, RateQuote, RateRequest,
    RateResponseBody,
};
pub use shopper::{RateOutcome, RateShopper};
