//! Carrier configuration for rate shopping.
//!
//! The embedding application parses this once (environment variables or its
//! own config layer) and injects it into the rate request builder — the core
//! never reads the process environment ad hoc. Malformed values degrade to
//! defaults with a warning; a missing carrier list degrades to "no carriers
//! selectable" rather than failing checkout.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Ship-from address, fixed per tenant/environment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ShipFrom {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub city_locality: String,
    #[serde(default)]
    pub state_province: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country_code: String,
}

/// Service codes a carrier account offers, split by destination class.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServiceCodeSet {
    #[serde(default)]
    pub domestic: Vec<String>,
    #[serde(default)]
    pub international: Vec<String>,
}

/// One connected carrier account.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarrierAccount {
    pub carrier_id: String,
    #[serde(default)]
    pub service_codes: ServiceCodeSet,
}

/// Everything the rate request builder needs to know about the tenant's
/// carrier setup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CarrierConfig {
    pub ship_from: ShipFrom,
    #[serde(default)]
    pub carriers: Vec<CarrierAccount>,
    #[serde(default = "default_currency")]
    pub preferred_currency: String,
    #[serde(default = "default_calculate_tax")]
    pub calculate_tax_amount: bool,
}

fn default_currency() -> String {
    CarrierConfig::DEFAULT_CURRENCY.to_string()
}

fn default_calculate_tax() -> bool {
    true
}

impl CarrierConfig {
    const CARRIERS_VAR: &'static str = "PACKRATE_CARRIERS";
    const SHIP_FROM_VAR: &'static str = "PACKRATE_SHIP_FROM";
    const CURRENCY_VAR: &'static str = "PACKRATE_PREFERRED_CURRENCY";
    const CALCULATE_TAX_VAR: &'static str = "PACKRATE_CALCULATE_TAX";

    pub const DEFAULT_CURRENCY: &'static str = "usd";

    /// Builds a configuration from the currently available environment
    /// variables. `PACKRATE_CARRIERS` and `PACKRATE_SHIP_FROM` hold JSON
    /// documents; anything missing or unparsable falls back with a warning.
    pub fn from_env() -> Self {
        let carriers = match env_string(Self::CARRIERS_VAR) {
            Some(raw) => match serde_json::from_str::<Vec<CarrierAccount>>(&raw) {
                Ok(carriers) => carriers,
                Err(err) => {
                    warn!(
                        %err,
                        "could not parse {} as a carrier list, no carriers will be selectable",
                        Self::CARRIERS_VAR
                    );
                    Vec::new()
                }
            },
            None => {
                warn!(
                    "{} not set, no carriers will be selectable",
                    Self::CARRIERS_VAR
                );
                Vec::new()
            }
        };

        let ship_from = match env_string(Self::SHIP_FROM_VAR) {
            Some(raw) => match serde_json::from_str::<ShipFrom>(&raw) {
                Ok(ship_from) => ship_from,
                Err(err) => {
                    warn!(
                        %err,
                        "could not parse {} as a ship-from address, using an empty one",
                        Self::SHIP_FROM_VAR
                    );
                    ShipFrom::default()
                }
            },
            None => ShipFrom::default(),
        };

        let preferred_currency =
            env_string(Self::CURRENCY_VAR).unwrap_or_else(|| Self::DEFAULT_CURRENCY.to_string());

        let calculate_tax_amount = env_string(Self::CALCULATE_TAX_VAR)
            .and_then(|raw| parse_bool(&raw, Self::CALCULATE_TAX_VAR))
            .unwrap_or(true);

        Self {
            ship_from,
            carriers,
            preferred_currency,
            calculate_tax_amount,
        }
    }

    /// Ids of every configured carrier account.
    pub fn carrier_ids(&self) -> Vec<String> {
        self.carriers.iter().map(|c| c.carrier_id.clone()).collect()
    }

    /// Service codes across all carriers for the destination class.
    pub fn service_codes(&self, international: bool) -> Vec<String> {
        self.carriers
            .iter()
            .flat_map(|c| {
                if international {
                    c.service_codes.international.iter()
                } else {
                    c.service_codes.domestic.iter()
                }
            })
            .cloned()
            .collect()
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(%err, "access to {} failed, using default value", name);
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            warn!(
                "could not interpret {} ('{}') as a boolean, using default value",
                var_name, other
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_carriers() -> CarrierConfig {
        CarrierConfig {
            ship_from: ShipFrom {
                country_code: "US".into(),
                ..ShipFrom::default()
            },
            carriers: vec![
                CarrierAccount {
                    carrier_id: "se-123".into(),
                    service_codes: ServiceCodeSet {
                        domestic: vec!["usps_priority_mail".into()],
                        international: vec!["usps_priority_mail_international".into()],
                    },
                },
                CarrierAccount {
                    carrier_id: "se-456".into(),
                    service_codes: ServiceCodeSet {
                        domestic: vec!["ups_ground".into()],
                        international: vec![],
                    },
                },
            ],
            preferred_currency: "usd".into(),
            calculate_tax_amount: true,
        }
    }

    #[test]
    fn service_codes_project_per_destination_class() {
        let config = config_with_carriers();
        assert_eq!(
            config.service_codes(false),
            vec!["usps_priority_mail", "ups_ground"]
        );
        assert_eq!(
            config.service_codes(true),
            vec!["usps_priority_mail_international"]
        );
    }

    #[test]
    fn carrier_ids_follow_config_order() {
        let config = config_with_carriers();
        assert_eq!(config.carrier_ids(), vec!["se-123", "se-456"]);
    }

    #[test]
    fn carrier_list_parses_from_json() {
        let raw = r#"[
            {"carrier_id": "se-999", "service_codes": {"domestic": ["fedex_ground"]}}
        ]"#;
        let carriers: Vec<CarrierAccount> = serde_json::from_str(raw).unwrap();
        assert_eq!(carriers.len(), 1);
        assert_eq!(carriers[0].carrier_id, "se-999");
        assert_eq!(carriers[0].service_codes.domestic, vec!["fedex_ground"]);
        assert!(carriers[0].service_codes.international.is_empty());
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("1", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool(" TRUE ", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("off", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("No", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("maybe", "TEST_VAR"), None);
    }
}
