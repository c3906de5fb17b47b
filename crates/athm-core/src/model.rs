//! # Wire Types
//!
//! Request bodies sent to the ATH Móvil e-commerce API and the values they are
//! built from. Field names follow the provider's camelCase JSON.

use crate::error::{AthMovilError, AthMovilResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lowest payment total accepted by the provider, in cents
pub const MIN_TOTAL_CENTS: i64 = 100;
/// Highest payment total accepted by the provider, in cents
pub const MAX_TOTAL_CENTS: i64 = 150_000;
/// Maximum characters in `metadata1` / `metadata2`
pub const MAX_METADATA_CHARS: usize = 40;
/// Payment timeout bounds in seconds
pub const MIN_TIMEOUT_SECS: u32 = 120;
pub const MAX_TIMEOUT_SECS: u32 = 600;
/// Smallest refundable amount, in cents
pub const MIN_REFUND_CENTS: i64 = 1;

// -2^63 and 2^63 as f64; every rounded value in between fits an i64
const CENTS_LOWER: f64 = -9_223_372_036_854_775_808.0;
const CENTS_UPPER: f64 = 9_223_372_036_854_775_808.0;
// float noise allowed when checking for a third fraction digit, in cents
const FRACTION_TOLERANCE: f64 = 1e-6;

/// A two-fraction-digit currency amount held in cents.
///
/// Written to the wire as a JSON number (`12.5` for 1250 cents).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount { cents: 0 };

    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Round a decimal value to the nearest cent. Non-finite values and values
    /// beyond the `i64` cent range yield `None`.
    pub fn from_decimal(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        if !cents.is_finite() || cents < CENTS_LOWER || cents >= CENTS_UPPER {
            return None;
        }
        Some(Self {
            cents: cents as i64,
        })
    }

    /// Like [`Amount::from_decimal`], but a value with more than two fraction
    /// digits is rejected instead of rounded.
    pub fn from_decimal_exact(value: f64) -> Option<Self> {
        let scaled = value * 100.0;
        if (scaled - scaled.round()).abs() > FRACTION_TOLERANCE {
            return None;
        }
        Self::from_decimal(value)
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.as_decimal())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawAmount {
            Number(f64),
            Text(String),
        }

        let value = match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => n,
            RawAmount::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s}")))?,
        };
        if !value.is_finite() {
            return Err(serde::de::Error::custom("amount must be a finite number"));
        }
        Amount::from_decimal_exact(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "amount {value} is out of range or has more than two decimal places"
            ))
        })
    }
}

/// Business-account tokens issued by the provider.
///
/// Supplied per invocation; never logged.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub public_token: String,
    pub private_token: String,
}

impl Credentials {
    pub fn new(public_token: impl Into<String>, private_token: impl Into<String>) -> Self {
        Self {
            public_token: public_token.into(),
            private_token: private_token.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_token", &"<redacted>")
            .field("private_token", &"<redacted>")
            .finish()
    }
}

/// A line item in a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub price: Amount,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default)]
    pub tax: Amount,

    #[serde(default)]
    pub metadata: String,
}

fn default_quantity() -> u32 {
    1
}

impl LineItem {
    pub fn new(name: impl Into<String>, price: Amount, quantity: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            price,
            quantity,
            tax: Amount::ZERO,
            metadata: String::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder: set tax
    pub fn with_tax(mut self, tax: Amount) -> Self {
        self.tax = tax;
        self
    }

    /// Builder: set metadata
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }
}

/// Optional fields of a payment.
///
/// `timeout` is only set from a truthy host value, while `tax` and
/// `subtotal` are set whenever the host defined them, zero included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdditionalFields {
    pub timeout: Option<u32>,
    pub tax: Option<Amount>,
    pub subtotal: Option<Amount>,
}

/// Body of `createPayment`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub public_token: String,
    pub phone_number: String,
    pub total: Amount,
    pub metadata1: String,
    pub metadata2: String,
    pub items: Vec<LineItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Amount>,
}

impl PaymentRequest {
    /// Apply the provider's documented limits
    pub fn validate(&self) -> AthMovilResult<()> {
        if self.total.cents() < MIN_TOTAL_CENTS || self.total.cents() > MAX_TOTAL_CENTS {
            return Err(AthMovilError::invalid(
                "total",
                format!("{} is outside 1.00-1500.00", self.total),
            ));
        }

        for (name, value) in [("metadata1", &self.metadata1), ("metadata2", &self.metadata2)] {
            if value.chars().count() > MAX_METADATA_CHARS {
                return Err(AthMovilError::invalid(
                    name,
                    format!("exceeds {MAX_METADATA_CHARS} characters"),
                ));
            }
        }

        if let Some(timeout) = self.timeout {
            if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout) {
                return Err(AthMovilError::invalid(
                    "timeout",
                    format!("{timeout} is outside {MIN_TIMEOUT_SECS}-{MAX_TIMEOUT_SECS} seconds"),
                ));
            }
        }

        Ok(())
    }
}

/// Body of `findPayment`, `authorizePayment` and `cancelPayment`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRef {
    pub public_token: String,
    pub ecommerce_id: String,
}

/// Body of `updatePhoneNumber`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePhoneNumberRequest {
    pub public_token: String,
    pub ecommerce_id: String,
    pub phone_number: String,
}

/// Body of `refundPayment`.
///
/// The basic node sends only the transaction reference; the tool node adds
/// the private token, reference number and amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub public_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_token: Option<String>,
    pub ecommerce_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
}

impl RefundRequest {
    pub fn validate(&self) -> AthMovilResult<()> {
        match self.amount {
            Some(amount) if amount.cents() < MIN_REFUND_CENTS => Err(AthMovilError::invalid(
                "refundAmount",
                "must be at least 0.01",
            )),
            _ => Ok(()),
        }
    }
}
