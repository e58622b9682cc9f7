//! # Snapshot
//!
//! The distributor's records as one JSON document.
//!
//! ## File Layout
//! ```json
//! {
//!   "products":    [ ... ],
//!   "companies":   [ ... ],
//!   "schemes":     [ ... ],
//!   "batches":     [ ... ],
//!   "rateMasters": [ ... ],
//!   "customers":   [ ... ],
//!   "purchases":   [ ... ],
//!   "sales":       [ ... ],
//!   "payments":    [ ... ]
//! }
//! ```
//! Every array is optional. Missing arrays load as empty.
//!
//! ## Load Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  schemes[i] fails to parse   → skipped, logged, listed in LoadReport   │
//! │  any other record malformed  → StoreError::Json, nothing loaded        │
//! │  record parses but is odd    → kept; Snapshot::validate() reports it   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Schemes get the lenient path because they are typed by hand in the web
//! front end and a single bad scheme must not take the whole book offline.

use std::collections::HashSet;
use std::path::Path;

use rxdist_core::inventory::InventoryBatch;
use rxdist_core::rate::RateMaster;
use rxdist_core::scheme::{ProductScope, Scheme, SchemeTerms};
use rxdist_core::types::{Company, Customer, Payment, Product, Purchase, Sale};
use rxdist_core::validation::{
    validate_date_window, validate_gstin, validate_hsn_code, validate_id, validate_paise,
    validate_percent, validate_quantity, ValidationResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Snapshot
// =============================================================================

/// All records, loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub schemes: Vec<Scheme>,
    #[serde(default)]
    pub batches: Vec<InventoryBatch>,
    #[serde(default)]
    pub rate_masters: Vec<RateMaster>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    #[serde(default)]
    pub sales: Vec<Sale>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// Same layout, with schemes kept as raw JSON until parsed one by one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    companies: Vec<Company>,
    #[serde(default)]
    schemes: Vec<serde_json::Value>,
    #[serde(default)]
    batches: Vec<InventoryBatch>,
    #[serde(default)]
    rate_masters: Vec<RateMaster>,
    #[serde(default)]
    customers: Vec<Customer>,
    #[serde(default)]
    purchases: Vec<Purchase>,
    #[serde(default)]
    sales: Vec<Sale>,
    #[serde(default)]
    payments: Vec<Payment>,
}

/// A scheme entry the loader could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedScheme {
    /// Position in the `schemes` array.
    pub index: usize,
    /// The entry's `id`, when it had a string one.
    pub id: Option<String>,
    pub reason: String,
}

/// What happened during a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub skipped_schemes: Vec<SkippedScheme>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped_schemes.is_empty()
    }
}

/// One problem found by [`Snapshot::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub entity: &'static str,
    pub id: String,
    pub message: String,
}

impl Snapshot {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Parses snapshot JSON, skipping schemes that do not parse.
    pub fn from_json(json: &str) -> StoreResult<(Self, LoadReport)> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        let mut report = LoadReport::default();
        let mut schemes = Vec::with_capacity(raw.schemes.len());

        for (index, value) in raw.schemes.into_iter().enumerate() {
            let id = value.get("id").and_then(|v| v.as_str()).map(str::to_string);
            match serde_json::from_value::<Scheme>(value) {
                Ok(scheme) => schemes.push(scheme),
                Err(e) => {
                    warn!(index, id = ?id, error = %e, "Skipping unreadable scheme");
                    report.skipped_schemes.push(SkippedScheme {
                        index,
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let snapshot = Snapshot {
            products: raw.products,
            companies: raw.companies,
            schemes,
            batches: raw.batches,
            rate_masters: raw.rate_masters,
            customers: raw.customers,
            purchases: raw.purchases,
            sales: raw.sales,
            payments: raw.payments,
        };

        debug!(
            products = snapshot.products.len(),
            schemes = snapshot.schemes.len(),
            batches = snapshot.batches.len(),
            skipped = report.skipped_schemes.len(),
            "Snapshot parsed"
        );

        Ok((snapshot, report))
    }

    /// Reads and parses a snapshot file.
    pub fn load(path: &Path) -> StoreResult<(Self, LoadReport)> {
        if !path.exists() {
            return Err(StoreError::SnapshotMissing(path.to_path_buf()));
        }

        info!(?path, "Loading snapshot");
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Writes the snapshot as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;

        info!(?path, "Snapshot saved");
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn product(&self, id: &str) -> StoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))
    }

    pub fn company(&self, id: &str) -> StoreResult<&Company> {
        self.companies
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Company", id))
    }

    pub fn customer(&self, id: &str) -> StoreResult<&Customer> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("Customer", id))
    }

    /// A company's schemes, owned, ready to pass to the engine.
    pub fn schemes_of(&self, company_id: &str) -> Vec<Scheme> {
        self.schemes
            .iter()
            .filter(|s| s.company_id == company_id)
            .cloned()
            .collect()
    }

    /// A product's batches, owned, ready to pass to the valuer.
    pub fn batches_of(&self, product_id: &str) -> Vec<InventoryBatch> {
        self.batches
            .iter()
            .filter(|b| b.product_id == product_id)
            .cloned()
            .collect()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Field and reference checks over every record. Never fails the load.
    pub fn validate(&self) -> Vec<Problem> {
        let mut problems = Vec::new();
        let mut push = |entity: &'static str, id: &str, result: ValidationResult<()>| {
            if let Err(e) = result {
                problems.push(Problem {
                    entity,
                    id: id.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let product_ids: HashSet<&str> = self.products.iter().map(|p| p.id.as_str()).collect();
        let company_ids: HashSet<&str> = self.companies.iter().map(|c| c.id.as_str()).collect();

        for p in &self.products {
            push("product", &p.id, validate_id("id", &p.id));
            push("product", &p.id, validate_hsn_code(&p.hsn_code));
            push("product", &p.id, validate_quantity("minStock", p.min_stock));
        }

        for c in &self.companies {
            push("company", &c.id, validate_id("id", &c.id));
            if let Some(gstin) = &c.gstin {
                push("company", &c.id, validate_gstin(gstin));
            }
        }

        for c in &self.customers {
            push("customer", &c.id, validate_id("id", &c.id));
            if let Some(gstin) = &c.gstin {
                push("customer", &c.id, validate_gstin(gstin));
            }
        }

        for s in &self.schemes {
            push("scheme", &s.id, validate_id("id", &s.id));
            push("scheme", &s.id, validate_date_window("validity", s.valid_from, s.valid_to));
            for pct in s.terms.percentages() {
                push("scheme", &s.id, validate_percent("discount", pct));
            }
            if !company_ids.contains(s.company_id.as_str()) {
                push("scheme", &s.id, Err(unknown("companyId", &s.company_id)));
            }
            if !s.is_well_formed() {
                push("scheme", &s.id, Err(malformed(s)));
            }
        }

        let mut batch_ids = HashSet::new();
        for b in &self.batches {
            push("batch", &b.id, validate_id("id", &b.id));
            if !batch_ids.insert(b.id.as_str()) {
                push("batch", &b.id, Err(duplicate("id", &b.id)));
            }
            push("batch", &b.id, validate_quantity("qty", b.qty));
            push("batch", &b.id, validate_paise("ratePaise", b.rate_paise));
            push("batch", &b.id, validate_date_window("shelf life", b.purchase_date, b.expiry));
            if !product_ids.contains(b.product_id.as_str()) {
                push("batch", &b.id, Err(unknown("productId", &b.product_id)));
            }
        }

        for r in &self.rate_masters {
            push("rateMaster", &r.product_id, validate_percent("margin", r.margin));
            if !product_ids.contains(r.product_id.as_str()) {
                push("rateMaster", &r.product_id, Err(unknown("productId", &r.product_id)));
            }
        }

        for p in &self.purchases {
            push("purchase", &p.id, validate_paise("totalPaise", p.total_paise));
            for item in &p.items {
                push("purchase", &p.id, validate_quantity("qty", item.qty));
                push("purchase", &p.id, validate_paise("ratePaise", item.rate_paise));
            }
        }

        for s in &self.sales {
            push("sale", &s.id, validate_paise("totalPaise", s.total_paise));
        }

        for p in &self.payments {
            push("payment", &p.id, validate_paise("amountPaise", p.amount_paise));
        }

        problems
    }
}

fn unknown(field: &str, id: &str) -> rxdist_core::ValidationError {
    rxdist_core::ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("refers to unknown record {}", id),
    }
}

fn duplicate(field: &str, id: &str) -> rxdist_core::ValidationError {
    rxdist_core::ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("{} is used by more than one record", id),
    }
}

fn malformed(scheme: &Scheme) -> rxdist_core::ValidationError {
    let reason = if scheme.valid_from > scheme.valid_to {
        "validity window is inverted"
    } else if matches!(&scheme.products, ProductScope::Only(ids) if ids.is_empty()) {
        "product list is empty"
    } else {
        match &scheme.terms {
            terms if terms.is_well_formed() => "unusable terms",
            SchemeTerms::FreeQty { .. } => "buyQty and freeQty must be positive",
            SchemeTerms::Slab { .. } | SchemeTerms::Volume { .. } => {
                "slabs must be non-empty with min <= max"
            }
            SchemeTerms::Combo { .. } => "comboProducts is empty",
            _ => "unusable terms",
        }
    };
    rxdist_core::ValidationError::InvalidFormat {
        field: "terms".to_string(),
        reason: format!("{} scheme is never applied: {}", scheme.kind(), reason),
    }
}
