//! File-backed tests for snapshot and config loading.

use std::fs;

use chrono::NaiveDate;
use rxdist_core::inventory::StockStatus;
use rxdist_core::money::Money;
use rxdist_core::scheme::{evaluate_scheme, SchemeContext};
use rxdist_store::{RxdistConfig, Snapshot, StoreError};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "products": [
        {"id": "P-PAN40", "name": "Pan 40", "hsnCode": "30049099", "gstRate": 12, "minStock": 100}
    ],
    "companies": [{"id": "C-SUN", "name": "Sun Pharma", "paymentTermsDays": 60}],
    "schemes": [
        {"id": "S-SLAB", "companyId": "C-SUN", "type": "slab",
         "slabs": [{"minQty": 1, "maxQty": 49, "discount": 3},
                   {"minQty": 50, "maxQty": 999, "discount": 7}],
         "validFrom": "2026-01-01", "validTo": "2026-12-31", "products": ["P-PAN40"]},
        {"id": "S-TYPO", "companyId": "C-SUN", "type": "slab", "slab": [],
         "validFrom": "2026-01-01", "validTo": "2026-12-31"}
    ],
    "batches": [
        {"id": "B-1", "productId": "P-PAN40", "batchNo": "PN01", "qty": 60,
         "purchaseDate": "2026-01-05", "expiry": "2026-03-20", "ratePaise": 9800},
        {"id": "B-2", "productId": "P-PAN40", "batchNo": "PN02", "qty": 30,
         "purchaseDate": "2026-02-01", "expiry": "2027-06-30", "ratePaise": 9800}
    ]
}"#;

#[test]
fn test_load_and_evaluate_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, SNAPSHOT).unwrap();

    let (snapshot, report) = Snapshot::load(&path).unwrap();
    assert_eq!(report.skipped_schemes.len(), 1);
    assert_eq!(report.skipped_schemes[0].id.as_deref(), Some("S-TYPO"));

    let as_of = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let schemes = snapshot.schemes_of("C-SUN");
    let ctx = SchemeContext::new("P-PAN40", 60, Money::from_rupees(5880), as_of);
    let decision = evaluate_scheme(&schemes, &ctx);
    assert_eq!(decision.applied_scheme_id.as_deref(), Some("S-SLAB"));
    assert_eq!(decision.monetary_discount, Money::from_paise(41_160));

    let config = RxdistConfig::default();
    let valuation = config.valuer().valuate(&snapshot.batches_of("P-PAN40"), 100, as_of);
    assert_eq!(valuation.on_hand, 90);
    assert_eq!(valuation.status, StockStatus::Low);
    assert_eq!(valuation.expiring_value, Money::from_paise(60 * 9800));
}

#[test]
fn test_missing_snapshot() {
    let dir = TempDir::new().unwrap();
    let err = Snapshot::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, StoreError::SnapshotMissing(_)));
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let (snapshot, _) = Snapshot::from_json(SNAPSHOT).unwrap();

    let path = dir.path().join("nested").join("out.json");
    snapshot.save(&path).unwrap();

    let (reloaded, report) = Snapshot::load(&path).unwrap();
    assert!(report.is_clean());
    assert_eq!(reloaded, snapshot);
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rxdist.toml");
    fs::write(
        &path,
        "[snapshot]\npath = \"/srv/rxdist/snapshot.json\"\n\n[inventory]\ncritical_window_days = 45\n",
    )
    .unwrap();

    let config = RxdistConfig::from_file(&path).unwrap();
    assert_eq!(config.inventory.critical_window_days, 45);
    assert_eq!(config.logging.filter, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_save_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf").join("rxdist.toml");

    let mut config = RxdistConfig::default();
    config.logging.json = true;
    config.save(Some(path.clone())).unwrap();

    assert_eq!(RxdistConfig::from_file(&path).unwrap(), config);
}

#[test]
fn test_explicit_missing_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = RxdistConfig::load(Some(dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, StoreError::InvalidConfig(_)));
}

#[test]
fn test_invalid_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rxdist.toml");
    fs::write(&path, "[inventory\ncritical_window_days = ").unwrap();
    assert!(matches!(RxdistConfig::from_file(&path), Err(StoreError::TomlDe(_))));
}
