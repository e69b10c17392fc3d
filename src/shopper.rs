//! End-to-end rate shopping for one cart.
//!
//! Packs the cart, builds the carrier request, submits it through the
//! injected `CarrierClient`, and reduces the response. An empty rate list
//! is a valid result meaning no shippable option could be priced.

use tracing::{debug, error, warn};

use crate::cart::CartSnapshot;
use crate::client::CarrierClient;
use crate::config::CarrierConfig;
use crate::error::Result;
use crate::model::BoxType;
use crate::packer::{FirstFitPacker, PackingOutcome, PackingStrategy};
use crate::rates::{build_rate_request, reduce_rates, PreparedRateRequest, RateQuote};

/// Rates and the packing they were computed from.
#[derive(Clone, Debug)]
pub struct RateOutcome {
    pub rates: Vec<RateQuote>,
    pub packing: PackingOutcome,
}

/// Orchestrates packing, request construction, the carrier call, and
/// response reduction.
pub struct RateShopper<C> {
    config: CarrierConfig,
    client: C,
    strategy: Box<dyn PackingStrategy>,
}

impl<C: CarrierClient> RateShopper<C> {
    /// Creates a shopper with the default first-fit packing strategy.
    pub fn new(config: CarrierConfig, client: C) -> Self {
        Self {
            config,
            client,
            strategy: Box::new(FirstFitPacker),
        }
    }

    /// Swaps in a different packing strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn PackingStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds the rate request for a cart without calling the carrier.
    pub fn prepare(&self, cart: &CartSnapshot, box_types: &[BoxType]) -> PreparedRateRequest {
        build_rate_request(cart, box_types, &self.config, self.strategy.as_ref())
    }

    /// Computes shipping rates for a cart against the given box catalog.
    ///
    /// A shipment with zero packages never reaches the carrier API: a
    /// request without packages cannot yield meaningful rates, so the call
    /// is skipped with a warning and an empty rate list is returned.
    pub async fn shipping_rates_for_cart(
        &self,
        cart: &CartSnapshot,
        box_types: &[BoxType],
    ) -> Result<RateOutcome> {
        let prepared = self.prepare(cart, box_types);

        if prepared.request.shipment.packages.is_empty() {
            warn!(
                unpacked = prepared.packing.unpacked_count(),
                "no packable items in cart, skipping carrier rate call"
            );
            return Ok(RateOutcome {
                rates: Vec::new(),
                packing: prepared.packing,
            });
        }

        debug!(
            packages = prepared.request.shipment.packages.len(),
            "requesting carrier rates"
        );

        let response = self
            .client
            .get_rates(&prepared.request)
            .await
            .inspect_err(|err| error!(%err, "carrier rate request failed"))?;

        Ok(RateOutcome {
            rates: reduce_rates(&response),
            packing: prepared.packing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CarrierAccount, ServiceCodeSet, ShipFrom};
    use crate::error::RateError;
    use crate::rates::{MonetaryValue, RateRequest, RateResponseBody};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeClient {
        calls: AtomicUsize,
        body: RateResponseBody,
    }

    impl FakeClient {
        fn with_rates(body: RateResponseBody) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                body,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CarrierClient for FakeClient {
        async fn get_rates(&self, _request: &RateRequest) -> Result<RateResponseBody> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl CarrierClient for FailingClient {
        async fn get_rates(&self, _request: &RateRequest) -> Result<RateResponseBody> {
            Err(RateError::Config {
                message: "boom".into(),
            })
        }
    }

    fn config() -> CarrierConfig {
        CarrierConfig {
            ship_from: ShipFrom {
                country_code: "US".into(),
                ..ShipFrom::default()
            },
            carriers: vec![CarrierAccount {
                carrier_id: "se-123".into(),
                service_codes: ServiceCodeSet {
                    domestic: vec!["usps_priority_mail".into()],
                    international: vec!["usps_priority_mail_international".into()],
                },
            }],
            preferred_currency: "usd".into(),
            calculate_tax_amount: true,
        }
    }

    fn cart() -> CartSnapshot {
        serde_json::from_value(json!({
            "shipping_countryCodeAlpha2": "US",
            "cart_items": [{
                "quantity": 1,
                "product": { "id": 1, "length": 5.0, "width": 5.0, "height": 5.0 },
                "product_variant": { "id": 2, "weight": 8.0 }
            }]
        }))
        .unwrap()
    }

    fn catalog() -> Vec<BoxType> {
        vec![BoxType::new(20.0, 20.0, 20.0, Some(2.0), None).unwrap()]
    }

    fn one_rate() -> RateResponseBody {
        RateResponseBody {
            rates: vec![crate::rates::RateQuote {
                rate_id: None,
                carrier_id: Some("se-123".into()),
                carrier_friendly_name: None,
                service_code: Some("usps_priority_mail".into()),
                service_type: None,
                package_type: None,
                delivery_days: Some(2),
                shipping_amount: MonetaryValue {
                    currency: "usd".into(),
                    amount: 8.5,
                },
                error_messages: Vec::new(),
            }],
            invalid_rates: Vec::new(),
        }
    }

    #[tokio::test]
    async fn returns_reduced_rates_alongside_packing() {
        let client = FakeClient::with_rates(one_rate());
        let shopper = RateShopper::new(config(), client);

        let outcome = shopper
            .shipping_rates_for_cart(&cart(), &catalog())
            .await
            .unwrap();

        assert_eq!(outcome.rates.len(), 1);
        assert_eq!(outcome.rates[0].delivery_days, Some(2));
        assert_eq!(outcome.packing.package_count(), 1);
        assert_eq!(shopper.client.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_packages_short_circuits_without_carrier_call() {
        let client = FakeClient::with_rates(one_rate());
        let shopper = RateShopper::new(config(), client);
        let empty_cart: CartSnapshot = serde_json::from_value(json!({ "cart_items": [] })).unwrap();

        let outcome = shopper
            .shipping_rates_for_cart(&empty_cart, &catalog())
            .await
            .unwrap();

        assert!(outcome.rates.is_empty());
        assert_eq!(shopper.client.call_count(), 0);
    }

    #[tokio::test]
    async fn unfittable_only_cart_short_circuits_too() {
        let client = FakeClient::with_rates(one_rate());
        let shopper = RateShopper::new(config(), client);
        let oversized: CartSnapshot = serde_json::from_value(json!({
            "cart_items": [{
                "quantity": 1,
                "product": { "id": 1, "length": 500.0, "width": 500.0, "height": 500.0 },
                "product_variant": { "id": 2, "weight": 8.0 }
            }]
        }))
        .unwrap();

        let outcome = shopper
            .shipping_rates_for_cart(&oversized, &catalog())
            .await
            .unwrap();

        assert!(outcome.rates.is_empty());
        assert_eq!(outcome.packing.unpacked_count(), 1);
        assert_eq!(shopper.client.call_count(), 0);
    }

    #[tokio::test]
    async fn carrier_failure_propagates_unchanged() {
        let shopper = RateShopper::new(config(), FailingClient);
        let result = shopper.shipping_rates_for_cart(&cart(), &catalog()).await;
        assert!(matches!(result, Err(RateError::Config { .. })));
    }
}
