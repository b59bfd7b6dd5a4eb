// 🧾 Tax Rate Entity - Sales tax by location
//
// Rates are keyed by an opaque id (usually the payment processor's tax rate id)
// and located by country + postal code. Archived rates stay in the store with
// active = false so historical invoices still resolve.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRate {
    /// Stable identity - NEVER changes
    #[serde(default)]
    pub id: String,

    /// Country code (ISO 3166-1 alpha-2)
    pub country: String,

    /// State / province, if the country has them
    #[serde(default, deserialize_with = "empty_as_none")]
    pub state: Option<String>,

    pub postal_code: String,

    /// Percentage, e.g. 8.25 for 8.25%
    pub rate: f64,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

// CSV exports leave optional columns as empty strings
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

impl TaxRate {
    pub fn new(id: &str, country: &str, state: Option<&str>, postal_code: &str, rate: f64) -> Self {
        TaxRate {
            id: id.to_string(),
            country: country.to_string(),
            state: state.map(|s| s.to_string()),
            postal_code: postal_code.to_string(),
            rate,
            active: true,
        }
    }

    /// Assign a fresh id when the source did not carry one
    pub fn ensure_id(&mut self) {
        if self.id.trim().is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
    }

    /// Normalize casing and whitespace so lookups by location are exact matches
    pub fn normalize(&mut self) {
        self.id = self.id.trim().to_string();
        self.country = self.country.trim().to_uppercase();
        self.postal_code = self.postal_code.trim().to_string();
        self.state = self.state.take().map(|s| s.trim().to_uppercase());
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::InvalidTaxRate("id is empty".to_string()));
        }

        if self.country.trim().is_empty() {
            return Err(CatalogError::InvalidTaxRate(format!(
                "{}: country is empty",
                self.id
            )));
        }

        if self.postal_code.trim().is_empty() {
            return Err(CatalogError::InvalidTaxRate(format!(
                "{}: postal code is empty",
                self.id
            )));
        }

        if !self.rate.is_finite() || self.rate < 0.0 || self.rate > 100.0 {
            return Err(CatalogError::InvalidTaxRate(format!(
                "{}: rate {} is outside 0-100",
                self.id, self.rate
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_validation() {
        let valid = TaxRate::new("txr_1", "US", Some("CA"), "90210", 9.5);
        assert!(valid.validate().is_ok());

        let negative = TaxRate::new("txr_2", "US", None, "10001", -1.0);
        assert!(matches!(negative.validate(), Err(CatalogError::InvalidTaxRate(_))));

        let too_high = TaxRate::new("txr_3", "US", None, "10001", 100.5);
        assert!(too_high.validate().is_err());

        let no_country = TaxRate::new("txr_4", " ", None, "10001", 5.0);
        assert!(no_country.validate().is_err());

        let no_postal = TaxRate::new("txr_5", "US", None, "", 5.0);
        assert!(no_postal.validate().is_err());

        let nan = TaxRate::new("txr_6", "US", None, "10001", f64::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_ensure_id_and_normalize() {
        let mut rate = TaxRate::new("", " us ", Some(" ny "), " 10001 ", 8.875);
        rate.ensure_id();
        rate.normalize();

        assert!(!rate.id.is_empty());
        assert_eq!(rate.country, "US");
        assert_eq!(rate.state.as_deref(), Some("NY"));
        assert_eq!(rate.postal_code, "10001");

        let mut keep = TaxRate::new("txr_keep", "US", None, "10001", 8.875);
        keep.ensure_id();
        assert_eq!(keep.id, "txr_keep");
    }
}
