//! # Domain Types
//!
//! Master and transaction records shared across rxdist.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Master data                          Transactions                      │
//! │  ┌─────────────────┐                  ┌─────────────────┐              │
//! │  │    Product      │                  │    Purchase     │──► items     │
//! │  │  hsn, gst, min  │                  │  company, total │              │
//! │  └─────────────────┘                  └─────────────────┘              │
//! │  ┌─────────────────┐                  ┌─────────────────┐              │
//! │  │    Company      │──► Schemes       │      Sale       │──► items     │
//! │  │  credit days    │   (scheme mod)   │ customer, total │              │
//! │  └─────────────────┘                  └─────────────────┘              │
//! │  ┌─────────────────┐                  ┌─────────────────┐              │
//! │  │    Customer     │──► tier A/B/C    │    Payment      │              │
//! │  └─────────────────┘                  │ company, amount │              │
//! │                                       └─────────────────┘              │
//! │  Batches live in `inventory`, rate masters in `rate`.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON field names are camelCase to match the records the web front end
//! already writes. Money fields carry a `_paise` suffix and are integers.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::gst::GstRate;
use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// A percentage held in basis points (1 bp = 0.01%).
///
/// ## Why Basis Points?
/// Scheme terms such as 2.5% cash discount or 7.5% trade discount must
/// compare and sort exactly. 250 bps and 750 bps do; 2.5 and 7.5 as floats
/// mostly do, until they don't.
///
/// On the wire a `Percent` is a plain percentage number (`10`, `2.5`) so the
/// existing records load unchanged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(from = "f64", into = "f64")]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percent from a percentage number. Negative or NaN input
    /// clamps to zero.
    pub fn from_percentage(pct: f64) -> Self {
        if pct.is_nan() || pct <= 0.0 {
            return Percent(0);
        }
        Percent((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<f64> for Percent {
    fn from(pct: f64) -> Self {
        Percent::from_percentage(pct)
    }
}

impl From<Percent> for f64 {
    fn from(pct: Percent) -> Self {
        pct.percentage()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

// =============================================================================
// Record Status
// =============================================================================

/// Lifecycle status shared by products and schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Inactive,
}

impl RecordStatus {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, RecordStatus::Active)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A medicine or other stock-keeping item. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,

    /// Brand name as printed on the strip.
    pub name: String,

    /// Salt / generic composition, e.g. "Paracetamol 650mg".
    #[serde(default)]
    pub generic_name: Option<String>,

    /// HSN classification code (4, 6 or 8 digits).
    #[serde(default)]
    pub hsn_code: String,

    pub gst_rate: GstRate,

    /// Reorder threshold in units. On-hand below this is "low".
    #[serde(default)]
    pub min_stock: i64,

    #[serde(default)]
    pub status: RecordStatus,

    /// Manufacturer / marketing company, if known.
    #[serde(default)]
    pub company_id: Option<String>,

    /// Pack description, e.g. "10x10 strip".
    #[serde(default)]
    pub pack: Option<String>,
}

impl Product {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// =============================================================================
// Company
// =============================================================================

/// A supplier. Owns zero or more schemes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,

    /// Credit period granted on purchases, in days.
    #[serde(default = "default_payment_terms")]
    pub payment_terms_days: u32,

    #[serde(default)]
    pub gstin: Option<String>,

    #[serde(default)]
    pub contact_person: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,
}

fn default_payment_terms() -> u32 {
    30
}

// =============================================================================
// Customer
// =============================================================================

/// Customer class used to pick a rate master margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CustomerTier {
    A,
    B,
    C,
}

impl fmt::Display for CustomerTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerTier::A => write!(f, "A"),
            CustomerTier::B => write!(f, "B"),
            CustomerTier::C => write!(f, "C"),
        }
    }
}

impl FromStr for CustomerTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(CustomerTier::A),
            "B" => Ok(CustomerTier::B),
            "C" => Ok(CustomerTier::C),
            _ => Err(ValidationError::NotAllowed {
                field: "tier".to_string(),
                allowed: vec!["A".to_string(), "B".to_string(), "C".to_string()],
            }),
        }
    }
}

/// A retailer, hospital or clinic buying from the distributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub tier: CustomerTier,
    #[serde(default)]
    pub gstin: Option<String>,
}

// =============================================================================
// Purchase
// =============================================================================

/// One line of a supplier invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItem {
    pub product_id: String,
    #[serde(default)]
    pub batch_no: String,
    pub qty: i64,
    /// Free units received under a freeQty scheme.
    #[serde(default)]
    pub free_qty: i64,
    pub rate_paise: i64,
    pub expiry: NaiveDate,
    #[serde(default)]
    pub scheme_id: Option<String>,
    #[serde(default)]
    pub discount_paise: i64,
}

impl PurchaseItem {
    /// Line amount before scheme discount.
    pub fn gross(&self) -> Money {
        Money::from_paise(self.rate_paise).multiply_quantity(self.qty)
    }
}

/// A supplier invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub company_id: String,
    #[serde(default)]
    pub invoice_no: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<PurchaseItem>,
    /// Invoice total including GST, as billed.
    pub total_paise: i64,
}

impl Purchase {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    /// Batch the units were drawn from, when recorded.
    #[serde(default)]
    pub batch_id: Option<String>,
    pub qty: i64,
    pub rate_paise: i64,
}

/// An invoice raised to a customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    pub total_paise: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.total_paise)
    }
}

// =============================================================================
// Payment
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    Cash,
    Cheque,
    Upi,
    BankTransfer,
}

/// A payment made to a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub company_id: String,
    pub date: NaiveDate,
    pub amount_paise: i64,
    #[serde(default)]
    pub mode: PaymentMode,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Payment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_paise(self.amount_paise)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_from_percentage() {
        assert_eq!(Percent::from_percentage(10.0).bps(), 1000);
        assert_eq!(Percent::from_percentage(2.5).bps(), 250);
        assert_eq!(Percent::from_percentage(-3.0).bps(), 0);
        assert_eq!(Percent::from_percentage(f64::NAN).bps(), 0);
    }

    #[test]
    fn test_percent_json_is_plain_number() {
        let pct: Percent = serde_json::from_str("7.5").unwrap();
        assert_eq!(pct.bps(), 750);
        let pct: Percent = serde_json::from_str("12").unwrap();
        assert_eq!(pct.bps(), 1200);
        assert_eq!(serde_json::to_string(&Percent::from_bps(250)).unwrap(), "2.5");
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::from_bps(1000).to_string(), "10%");
        assert_eq!(Percent::from_bps(250).to_string(), "2.5%");
    }

    #[test]
    fn test_customer_tier_parsing() {
        assert_eq!("a".parse::<CustomerTier>().unwrap(), CustomerTier::A);
        assert_eq!(" C ".parse::<CustomerTier>().unwrap(), CustomerTier::C);
        assert!("D".parse::<CustomerTier>().is_err());
    }

    #[test]
    fn test_product_defaults() {
        let json = r#"{"id":"p1","name":"Dolo 650","gstRate":12}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.min_stock, 0);
        assert!(product.is_active());
        assert_eq!(product.gst_rate, GstRate::Twelve);
    }

    #[test]
    fn test_company_default_terms() {
        let company: Company = serde_json::from_str(r#"{"id":"c1","name":"Cipla"}"#).unwrap();
        assert_eq!(company.payment_terms_days, 30);
    }

    #[test]
    fn test_purchase_item_gross() {
        let item = PurchaseItem {
            product_id: "p1".into(),
            batch_no: "B1".into(),
            qty: 10,
            free_qty: 1,
            rate_paise: 4550,
            expiry: NaiveDate::from_ymd_opt(2027, 1, 31).unwrap(),
            scheme_id: None,
            discount_paise: 0,
        };
        assert_eq!(item.gross().paise(), 45500);
    }
}
