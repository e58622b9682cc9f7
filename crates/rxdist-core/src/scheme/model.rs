//! # Scheme Model
//!
//! A supplier scheme is a validity window, an applicability set and exactly
//! one set of terms. The terms are a sum type, so a `slab` scheme cannot
//! carry a stray `buyQty` and a `freeQty` scheme cannot lack one.
//!
//! ## Wire Format
//! ```json
//! {
//!   "id": "S-101", "companyId": "C-CIPLA", "name": "Monsoon slab",
//!   "type": "slab",
//!   "slabs": [ {"minQty": 1, "maxQty": 10, "discount": 5},
//!              {"minQty": 11, "maxQty": 999, "discount": 10} ],
//!   "validFrom": "2026-06-01", "validTo": "2026-09-30",
//!   "products": "all", "status": "active"
//! }
//! ```

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Percent, RecordStatus};

// =============================================================================
// Product Scope
// =============================================================================

/// Which products a scheme covers: the keyword `"all"` or a list of ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ScopeRepr", into = "ScopeRepr")]
pub enum ProductScope {
    #[default]
    All,
    Only(Vec<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ScopeRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<ScopeRepr> for ProductScope {
    type Error = String;

    fn try_from(repr: ScopeRepr) -> Result<Self, Self::Error> {
        match repr {
            ScopeRepr::Keyword(k) if k.eq_ignore_ascii_case("all") => Ok(ProductScope::All),
            ScopeRepr::Keyword(k) => Err(format!("products must be \"all\" or a list, got \"{}\"", k)),
            ScopeRepr::List(ids) => Ok(ProductScope::Only(ids)),
        }
    }
}

impl From<ProductScope> for ScopeRepr {
    fn from(scope: ProductScope) -> Self {
        match scope {
            ProductScope::All => ScopeRepr::Keyword("all".to_string()),
            ProductScope::Only(ids) => ScopeRepr::List(ids),
        }
    }
}

impl ProductScope {
    pub fn contains(&self, product_id: &str) -> bool {
        match self {
            ProductScope::All => true,
            ProductScope::Only(ids) => ids.iter().any(|id| id == product_id),
        }
    }
}

// =============================================================================
// Slabs
// =============================================================================

/// Quantity range `[minQty, maxQty]` (both inclusive) and its discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QtySlab {
    pub min_qty: i64,
    pub max_qty: i64,
    pub discount: Percent,
}

impl QtySlab {
    #[inline]
    pub fn contains(&self, qty: i64) -> bool {
        self.min_qty <= qty && qty <= self.max_qty
    }
}

/// Amount range (inclusive, in paise) and its discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountSlab {
    pub min_amount_paise: i64,
    pub max_amount_paise: i64,
    pub discount: Percent,
}

impl AmountSlab {
    #[inline]
    pub fn contains(&self, amount: Money) -> bool {
        self.min_amount_paise <= amount.paise() && amount.paise() <= self.max_amount_paise
    }
}

// =============================================================================
// Scheme Kind
// =============================================================================

/// Variant tag of a scheme, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum SchemeKind {
    FreeQty,
    Discount,
    Slab,
    Cash,
    Volume,
    Trade,
    Seasonal,
    Combo,
}

impl SchemeKind {
    /// Tie-break rank among monetary schemes with equal benefit. Higher wins:
    /// slab > volume > combo > seasonal > trade > discount.
    ///
    /// `None` for the kinds that are never compared on money.
    pub const fn precedence(&self) -> Option<u8> {
        match self {
            SchemeKind::Slab => Some(6),
            SchemeKind::Volume => Some(5),
            SchemeKind::Combo => Some(4),
            SchemeKind::Seasonal => Some(3),
            SchemeKind::Trade => Some(2),
            SchemeKind::Discount => Some(1),
            SchemeKind::FreeQty | SchemeKind::Cash => None,
        }
    }

    #[inline]
    pub const fn is_monetary(&self) -> bool {
        self.precedence().is_some()
    }
}

impl fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchemeKind::FreeQty => "freeQty",
            SchemeKind::Discount => "discount",
            SchemeKind::Slab => "slab",
            SchemeKind::Cash => "cash",
            SchemeKind::Volume => "volume",
            SchemeKind::Trade => "trade",
            SchemeKind::Seasonal => "seasonal",
            SchemeKind::Combo => "combo",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Scheme Terms
// =============================================================================

/// Variant-specific terms. The `type` field in JSON selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SchemeTerms {
    /// Buy `buy_qty`, get `free_qty` free, repeated per full multiple.
    FreeQty { buy_qty: i64, free_qty: i64 },

    /// Flat percentage off once the line reaches `min_purchase_qty` units.
    Discount {
        discount_percent: Percent,
        #[serde(default)]
        min_purchase_qty: Option<i64>,
    },

    /// Percentage by quantity band.
    Slab { slabs: Vec<QtySlab> },

    /// Early-payment incentive. Never deducted on the invoice line.
    Cash {
        cash_discount_percent: Percent,
        payment_days: u32,
    },

    /// Percentage by line value band.
    Volume { volume_slabs: Vec<AmountSlab> },

    Trade { trade_discount_percent: Percent },

    Seasonal {
        seasonal_discount_percent: Percent,
        #[serde(default)]
        season: Option<String>,
    },

    /// Percentage off when every product in `combo_products` is ordered together.
    Combo {
        combo_products: Vec<String>,
        combo_discount_percent: Percent,
    },
}

impl SchemeTerms {
    pub fn kind(&self) -> SchemeKind {
        match self {
            SchemeTerms::FreeQty { .. } => SchemeKind::FreeQty,
            SchemeTerms::Discount { .. } => SchemeKind::Discount,
            SchemeTerms::Slab { .. } => SchemeKind::Slab,
            SchemeTerms::Cash { .. } => SchemeKind::Cash,
            SchemeTerms::Volume { .. } => SchemeKind::Volume,
            SchemeTerms::Trade { .. } => SchemeKind::Trade,
            SchemeTerms::Seasonal { .. } => SchemeKind::Seasonal,
            SchemeTerms::Combo { .. } => SchemeKind::Combo,
        }
    }

    /// Structural sanity of the payload. Terms that fail this can never
    /// produce a benefit.
    pub fn is_well_formed(&self) -> bool {
        match self {
            SchemeTerms::FreeQty { buy_qty, free_qty } => *buy_qty > 0 && *free_qty > 0,
            SchemeTerms::Slab { slabs } => {
                !slabs.is_empty() && slabs.iter().all(|s| s.min_qty <= s.max_qty)
            }
            SchemeTerms::Volume { volume_slabs } => {
                !volume_slabs.is_empty()
                    && volume_slabs
                        .iter()
                        .all(|s| s.min_amount_paise <= s.max_amount_paise)
            }
            SchemeTerms::Combo { combo_products, .. } => !combo_products.is_empty(),
            SchemeTerms::Discount { .. }
            | SchemeTerms::Cash { .. }
            | SchemeTerms::Trade { .. }
            | SchemeTerms::Seasonal { .. } => true,
        }
    }

    /// Every percentage the terms carry, slab discounts included.
    pub fn percentages(&self) -> Vec<Percent> {
        match self {
            SchemeTerms::FreeQty { .. } => Vec::new(),
            SchemeTerms::Discount {
                discount_percent, ..
            } => vec![*discount_percent],
            SchemeTerms::Slab { slabs } => slabs.iter().map(|s| s.discount).collect(),
            SchemeTerms::Cash {
                cash_discount_percent,
                ..
            } => vec![*cash_discount_percent],
            SchemeTerms::Volume { volume_slabs } => {
                volume_slabs.iter().map(|s| s.discount).collect()
            }
            SchemeTerms::Trade {
                trade_discount_percent,
            } => vec![*trade_discount_percent],
            SchemeTerms::Seasonal {
                seasonal_discount_percent,
                ..
            } => vec![*seasonal_discount_percent],
            SchemeTerms::Combo {
                combo_discount_percent,
                ..
            } => vec![*combo_discount_percent],
        }
    }
}

// =============================================================================
// Scheme
// =============================================================================

/// A supplier scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub company_id: String,
    #[serde(default)]
    pub name: String,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    #[serde(default)]
    pub products: ProductScope,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(flatten)]
    pub terms: SchemeTerms,
}

impl Scheme {
    #[inline]
    pub fn kind(&self) -> SchemeKind {
        self.terms.kind()
    }

    /// Active status and `valid_from <= date <= valid_to`.
    pub fn is_live_on(&self, date: NaiveDate) -> bool {
        self.status.is_active() && self.valid_from <= date && date <= self.valid_to
    }

    #[inline]
    pub fn applies_to(&self, product_id: &str) -> bool {
        self.products.contains(product_id)
    }

    /// Window, scope and terms are all usable.
    pub fn is_well_formed(&self) -> bool {
        let scope_ok = match &self.products {
            ProductScope::All => true,
            ProductScope::Only(ids) => !ids.is_empty(),
        };
        self.valid_from <= self.valid_to && scope_ok && self.terms.is_well_formed()
    }

    /// The common eligibility gate shared by every variant.
    pub fn is_eligible(&self, product_id: &str, date: NaiveDate) -> bool {
        self.is_well_formed() && self.is_live_on(date) && self.applies_to(product_id)
    }

    /// One-line human summary for lists and CLI output.
    ///
    /// ```rust
    /// # use rxdist_core::scheme::SchemeTerms;
    /// let terms = SchemeTerms::FreeQty { buy_qty: 10, free_qty: 1 };
    /// assert_eq!(terms.describe(), "Buy 10 get 1 free");
    /// ```
    pub fn describe(&self) -> String {
        self.terms.describe()
    }
}

impl SchemeTerms {
    pub fn describe(&self) -> String {
        match self {
            SchemeTerms::FreeQty { buy_qty, free_qty } => {
                format!("Buy {} get {} free", buy_qty, free_qty)
            }
            SchemeTerms::Discount {
                discount_percent,
                min_purchase_qty,
            } => match min_purchase_qty {
                Some(min) if *min > 0 => format!("{} off from {} units", discount_percent, min),
                _ => format!("{} off", discount_percent),
            },
            SchemeTerms::Slab { slabs } => slabs
                .iter()
                .map(|s| format!("{} on {}-{} units", s.discount, s.min_qty, s.max_qty))
                .collect::<Vec<_>>()
                .join(", "),
            SchemeTerms::Cash {
                cash_discount_percent,
                payment_days,
            } => format!(
                "{} cash discount if paid within {} days",
                cash_discount_percent, payment_days
            ),
            SchemeTerms::Volume { volume_slabs } => volume_slabs
                .iter()
                .map(|s| {
                    format!(
                        "{} on {}-{}",
                        s.discount,
                        Money::from_paise(s.min_amount_paise),
                        Money::from_paise(s.max_amount_paise)
                    )
                })
                .collect::<Vec<_>>()
                .join(", "),
            SchemeTerms::Trade {
                trade_discount_percent,
            } => format!("{} trade discount", trade_discount_percent),
            SchemeTerms::Seasonal {
                seasonal_discount_percent,
                season,
            } => match season {
                Some(season) => format!("{} {} discount", seasonal_discount_percent, season),
                None => format!("{} seasonal discount", seasonal_discount_percent),
            },
            SchemeTerms::Combo {
                combo_products,
                combo_discount_percent,
            } => format!(
                "{} off when bought with {}",
                combo_discount_percent,
                combo_products.join(" + ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_deserialize_slab_scheme() {
        let json = r#"{
            "id": "S-101", "companyId": "C-1", "name": "Monsoon slab",
            "type": "slab",
            "slabs": [{"minQty": 1, "maxQty": 10, "discount": 5},
                      {"minQty": 11, "maxQty": 999, "discount": 10}],
            "validFrom": "2026-06-01", "validTo": "2026-09-30",
            "products": "all", "status": "active"
        }"#;
        let scheme: Scheme = serde_json::from_str(json).unwrap();
        assert_eq!(scheme.kind(), SchemeKind::Slab);
        assert_eq!(scheme.products, ProductScope::All);
        match &scheme.terms {
            SchemeTerms::Slab { slabs } => {
                assert_eq!(slabs.len(), 2);
                assert_eq!(slabs[1].discount, Percent::from_bps(1000));
            }
            other => panic!("unexpected terms {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_product_list_and_defaults() {
        let json = r#"{
            "id": "S-7", "companyId": "C-1", "type": "trade",
            "tradeDiscountPercent": 7.5,
            "validFrom": "2026-01-01", "validTo": "2026-12-31",
            "products": ["P-1", "P-2"]
        }"#;
        let scheme: Scheme = serde_json::from_str(json).unwrap();
        assert_eq!(scheme.status, RecordStatus::Active);
        assert!(scheme.applies_to("P-2"));
        assert!(!scheme.applies_to("P-3"));
    }

    #[test]
    fn test_missing_variant_field_is_rejected() {
        let json = r#"{
            "id": "S-8", "companyId": "C-1", "type": "freeQty", "buyQty": 10,
            "validFrom": "2026-01-01", "validTo": "2026-12-31"
        }"#;
        assert!(serde_json::from_str::<Scheme>(json).is_err());
    }

    #[test]
    fn test_unknown_scope_keyword_is_rejected() {
        let json = r#"{
            "id": "S-9", "companyId": "C-1", "type": "trade", "tradeDiscountPercent": 2,
            "validFrom": "2026-01-01", "validTo": "2026-12-31", "products": "some"
        }"#;
        assert!(serde_json::from_str::<Scheme>(json).is_err());
    }

    #[test]
    fn test_serialize_round_trip_keeps_type_tag() {
        let scheme = Scheme {
            id: "S-1".into(),
            company_id: "C-1".into(),
            name: String::new(),
            valid_from: date(2026, 1, 1),
            valid_to: date(2026, 12, 31),
            products: ProductScope::All,
            status: RecordStatus::Active,
            terms: SchemeTerms::FreeQty {
                buy_qty: 10,
                free_qty: 1,
            },
        };
        let value = serde_json::to_value(&scheme).unwrap();
        assert_eq!(value["type"], "freeQty");
        assert_eq!(value["buyQty"], 10);
        assert_eq!(value["products"], "all");
    }

    #[test]
    fn test_well_formedness() {
        assert!(!SchemeTerms::FreeQty { buy_qty: 0, free_qty: 1 }.is_well_formed());
        assert!(!SchemeTerms::Slab { slabs: vec![] }.is_well_formed());
        assert!(!SchemeTerms::Slab {
            slabs: vec![QtySlab {
                min_qty: 10,
                max_qty: 5,
                discount: Percent::from_bps(500)
            }]
        }
        .is_well_formed());
        assert!(!SchemeTerms::Combo {
            combo_products: vec![],
            combo_discount_percent: Percent::from_bps(500)
        }
        .is_well_formed());
    }

    #[test]
    fn test_live_window_is_inclusive() {
        let scheme = Scheme {
            id: "S-1".into(),
            company_id: "C-1".into(),
            name: String::new(),
            valid_from: date(2026, 1, 1),
            valid_to: date(2026, 1, 31),
            products: ProductScope::All,
            status: RecordStatus::Active,
            terms: SchemeTerms::Trade {
                trade_discount_percent: Percent::from_bps(200),
            },
        };
        assert!(scheme.is_live_on(date(2026, 1, 1)));
        assert!(scheme.is_live_on(date(2026, 1, 31)));
        assert!(!scheme.is_live_on(date(2026, 2, 1)));
        assert!(!scheme.is_live_on(date(2025, 12, 31)));
    }

    #[test]
    fn test_precedence_order() {
        let order = [
            SchemeKind::Slab,
            SchemeKind::Volume,
            SchemeKind::Combo,
            SchemeKind::Seasonal,
            SchemeKind::Trade,
            SchemeKind::Discount,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].precedence() > pair[1].precedence());
        }
        assert!(!SchemeKind::FreeQty.is_monetary());
        assert!(!SchemeKind::Cash.is_monetary());
    }

    #[test]
    fn test_describe() {
        let slab = SchemeTerms::Slab {
            slabs: vec![QtySlab {
                min_qty: 11,
                max_qty: 999,
                discount: Percent::from_bps(1000),
            }],
        };
        assert_eq!(slab.describe(), "10% on 11-999 units");

        let cash = SchemeTerms::Cash {
            cash_discount_percent: Percent::from_bps(250),
            payment_days: 7,
        };
        assert_eq!(cash.describe(), "2.5% cash discount if paid within 7 days");
    }

    #[test]
    fn test_percentages() {
        let volume = SchemeTerms::Volume {
            volume_slabs: vec![
                AmountSlab {
                    min_amount_paise: 0,
                    max_amount_paise: 999_999,
                    discount: Percent::from_bps(200),
                },
                AmountSlab {
                    min_amount_paise: 1_000_000,
                    max_amount_paise: i64::MAX,
                    discount: Percent::from_bps(400),
                },
            ],
        };
        assert_eq!(
            volume.percentages(),
            vec![Percent::from_bps(200), Percent::from_bps(400)]
        );

        let free = SchemeTerms::FreeQty {
            buy_qty: 10,
            free_qty: 1,
        };
        assert!(free.percentages().is_empty());
    }
}
