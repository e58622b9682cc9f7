//! # Demo Snapshot Generator
//!
//! Writes a small but complete snapshot for trying the CLI.
//!
//! ## Usage
//! ```bash
//! # Write data/snapshot.json, dated from today
//! cargo run -p rxdist-store --bin rxdist-seed
//!
//! # Custom path and reference date
//! cargo run -p rxdist-store --bin rxdist-seed -- --out ./demo.json --today 2026-03-01
//! ```
//!
//! ## Generated Records
//! - 3 companies, 8 products, 2 customers
//! - One scheme of every kind, all valid around the reference date
//! - Batches spread across expired / critical / fine expiry buckets
//! - Rate masters for tiers A, B and C
//! - A purchase and a part payment so the ledger has an outstanding

use std::env;
use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use rxdist_core::gst::GstRate;
use rxdist_core::inventory::InventoryBatch;
use rxdist_core::rate::RateMaster;
use rxdist_core::scheme::{AmountSlab, ProductScope, QtySlab, Scheme, SchemeTerms};
use rxdist_core::types::{
    Company, Customer, CustomerTier, Payment, PaymentMode, Percent, Product, Purchase,
    PurchaseItem, RecordStatus,
};
use rxdist_store::Snapshot;
use uuid::Uuid;

/// (id, name, generic, hsn, gst, min stock, company, cost paise)
const PRODUCTS: &[(&str, &str, &str, &str, GstRate, i64, &str, i64)] = &[
    ("P-DOLO650", "Dolo 650", "Paracetamol 650mg", "30049099", GstRate::Twelve, 200, "C-MICRO", 2150),
    ("P-AMOX500", "Mox 500", "Amoxicillin 500mg", "30041010", GstRate::Twelve, 100, "C-SUN", 7200),
    ("P-AZEE500", "Azee 500", "Azithromycin 500mg", "30042019", GstRate::Twelve, 60, "C-CIPLA", 11900),
    ("P-PAN40", "Pan 40", "Pantoprazole 40mg", "30049099", GstRate::Twelve, 150, "C-SUN", 9800),
    ("P-ORS", "Electral", "Oral rehydration salts", "30049011", GstRate::Five, 300, "C-CIPLA", 2000),
    ("P-CALPOL", "Calpol 500", "Paracetamol 500mg", "30049099", GstRate::Twelve, 100, "C-MICRO", 1500),
    ("P-BANDAGE", "Crepe Bandage 10cm", "Cotton crepe", "30059040", GstRate::Twelve, 40, "C-CIPLA", 9000),
    ("P-INSULIN", "Huminsulin 40IU", "Human insulin", "30043110", GstRate::Five, 20, "C-SUN", 15600),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut out = PathBuf::from("data/snapshot.json");
    let mut today = Local::now().date_naive();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" | "-o" => {
                if i + 1 < args.len() {
                    out = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--today" | "-t" => {
                if i + 1 < args.len() {
                    today = NaiveDate::parse_from_str(&args[i + 1], "%Y-%m-%d")?;
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("rxdist demo snapshot generator");
                println!();
                println!("Usage: rxdist-seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -o, --out <PATH>     Output file (default: data/snapshot.json)");
                println!("  -t, --today <DATE>   Reference date YYYY-MM-DD (default: today)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 rxdist demo snapshot");
    println!("=======================");
    println!("Output:    {}", out.display());
    println!("Reference: {}", today);

    let snapshot = build_snapshot(today);

    let problems = snapshot.validate();
    if !problems.is_empty() {
        for p in &problems {
            eprintln!("⚠ {} {}: {}", p.entity, p.id, p.message);
        }
    }

    snapshot.save(&out)?;

    println!();
    println!("✓ {} products", snapshot.products.len());
    println!("✓ {} schemes", snapshot.schemes.len());
    println!("✓ {} batches", snapshot.batches.len());
    println!("✓ Seed complete!");

    Ok(())
}

fn build_snapshot(today: NaiveDate) -> Snapshot {
    let companies = vec![
        company("C-CIPLA", "Cipla Ltd", 45, Some("27AAACC1450B1ZX")),
        company("C-MICRO", "Micro Labs", 30, None),
        company("C-SUN", "Sun Pharma", 60, Some("24AADCS0472N1Z5")),
    ];

    let products: Vec<Product> = PRODUCTS
        .iter()
        .map(|(id, name, generic, hsn, gst, min_stock, company_id, _)| Product {
            id: id.to_string(),
            name: name.to_string(),
            generic_name: Some(generic.to_string()),
            hsn_code: hsn.to_string(),
            gst_rate: *gst,
            min_stock: *min_stock,
            status: RecordStatus::Active,
            company_id: Some(company_id.to_string()),
            pack: Some("10x10 strip".to_string()),
        })
        .collect();

    let schemes = build_schemes(today);

    // Offsets in days from `today`: one expired, one critical, the rest fine.
    let expiry_offsets = [-10i64, 20, 180, 400, 25, 700, 90, 45];
    let mut batches = Vec::new();
    for (n, (id, _, _, _, _, min_stock, company_id, cost)) in PRODUCTS.iter().enumerate() {
        let offset = expiry_offsets[n % expiry_offsets.len()];
        batches.push(batch(id, company_id, n, min_stock / 2, today - Duration::days(120), today + Duration::days(offset), *cost));
        batches.push(batch(id, company_id, n + 100, min_stock + 25, today - Duration::days(30), today + Duration::days(offset + 365), *cost));
    }

    let mut rate_masters = Vec::new();
    for (id, ..) in PRODUCTS {
        for (tier, bps) in [(CustomerTier::A, 800), (CustomerTier::B, 1200), (CustomerTier::C, 1800)] {
            rate_masters.push(RateMaster {
                product_id: id.to_string(),
                tier,
                margin: Percent::from_bps(bps),
            });
        }
    }

    let customers = vec![
        Customer {
            id: "CU-APOLLO".to_string(),
            name: "Apollo Pharmacy, Andheri".to_string(),
            tier: CustomerTier::A,
            gstin: Some("27AABCA1234F1Z2".to_string()),
        },
        Customer {
            id: "CU-RAJ".to_string(),
            name: "Raj Medical Stores".to_string(),
            tier: CustomerTier::C,
            gstin: None,
        },
    ];

    let items = vec![PurchaseItem {
        product_id: "P-DOLO650".to_string(),
        batch_no: "DL0100".to_string(),
        qty: 300,
        free_qty: 30,
        rate_paise: 2150,
        expiry: today + Duration::days(545),
        scheme_id: Some("S-MICRO-FREE".to_string()),
        discount_paise: 0,
    }];
    let gross: i64 = items.iter().map(|i| i.gross().paise()).sum();
    let purchases = vec![Purchase {
        id: Uuid::new_v4().to_string(),
        company_id: "C-MICRO".to_string(),
        invoice_no: "ML/2026/0412".to_string(),
        date: today - Duration::days(30),
        items,
        total_paise: gross + gross * 12 / 100,
    }];
    let payments = vec![Payment {
        id: Uuid::new_v4().to_string(),
        company_id: "C-MICRO".to_string(),
        date: today - Duration::days(5),
        amount_paise: gross / 2,
        mode: PaymentMode::BankTransfer,
        reference: Some("NEFT-88213".to_string()),
    }];

    Snapshot {
        products,
        companies,
        schemes,
        batches,
        rate_masters,
        customers,
        purchases,
        sales: Vec::new(),
        payments,
    }
}

fn build_schemes(today: NaiveDate) -> Vec<Scheme> {
    let pct = Percent::from_bps;
    let only = |ids: &[&str]| ProductScope::Only(ids.iter().map(|s| s.to_string()).collect());

    vec![
        scheme(today, "S-MICRO-FREE", "C-MICRO", "Dolo 10+1", only(&["P-DOLO650"]), SchemeTerms::FreeQty {
            buy_qty: 10,
            free_qty: 1,
        }),
        scheme(today, "S-MICRO-DISC", "C-MICRO", "Calpol flat", only(&["P-CALPOL"]), SchemeTerms::Discount {
            discount_percent: pct(600),
            min_purchase_qty: Some(50),
        }),
        scheme(today, "S-SUN-SLAB", "C-SUN", "Pan quantity slab", only(&["P-PAN40"]), SchemeTerms::Slab {
            slabs: vec![
                QtySlab { min_qty: 1, max_qty: 49, discount: pct(300) },
                QtySlab { min_qty: 50, max_qty: 199, discount: pct(700) },
                QtySlab { min_qty: 200, max_qty: 100_000, discount: pct(1200) },
            ],
        }),
        scheme(today, "S-SUN-CASH", "C-SUN", "Prompt payment", ProductScope::All, SchemeTerms::Cash {
            cash_discount_percent: pct(200),
            payment_days: 7,
        }),
        scheme(today, "S-CIPLA-VOL", "C-CIPLA", "Azee volume", only(&["P-AZEE500"]), SchemeTerms::Volume {
            volume_slabs: vec![
                AmountSlab { min_amount_paise: 0, max_amount_paise: 2_499_999, discount: pct(250) },
                AmountSlab { min_amount_paise: 2_500_000, max_amount_paise: i64::MAX, discount: pct(500) },
            ],
        }),
        scheme(today, "S-CIPLA-TRADE", "C-CIPLA", "Trade", ProductScope::All, SchemeTerms::Trade {
            trade_discount_percent: pct(400),
        }),
        scheme(today, "S-CIPLA-SEASON", "C-CIPLA", "Monsoon", only(&["P-ORS"]), SchemeTerms::Seasonal {
            seasonal_discount_percent: pct(800),
            season: Some("monsoon".to_string()),
        }),
        scheme(today, "S-SUN-COMBO", "C-SUN", "Amox + Pan", only(&["P-AMOX500", "P-PAN40"]), SchemeTerms::Combo {
            combo_products: vec!["P-AMOX500".to_string(), "P-PAN40".to_string()],
            combo_discount_percent: pct(1000),
        }),
    ]
}

fn company(id: &str, name: &str, terms: u32, gstin: Option<&str>) -> Company {
    Company {
        id: id.to_string(),
        name: name.to_string(),
        payment_terms_days: terms,
        gstin: gstin.map(str::to_string),
        contact_person: None,
        phone: None,
    }
}

fn scheme(
    today: NaiveDate,
    id: &str,
    company_id: &str,
    name: &str,
    products: ProductScope,
    terms: SchemeTerms,
) -> Scheme {
    Scheme {
        id: id.to_string(),
        company_id: company_id.to_string(),
        name: name.to_string(),
        valid_from: today - Duration::days(60),
        valid_to: today + Duration::days(120),
        products,
        status: RecordStatus::Active,
        terms,
    }
}

fn batch(
    product_id: &str,
    company_id: &str,
    seq: usize,
    qty: i64,
    purchase_date: NaiveDate,
    expiry: NaiveDate,
    rate_paise: i64,
) -> InventoryBatch {
    InventoryBatch {
        id: Uuid::new_v4().to_string(),
        product_id: product_id.to_string(),
        company_id: Some(company_id.to_string()),
        batch_no: format!("{}{:04}", &product_id[2..4], seq),
        qty,
        purchase_date,
        expiry,
        rate_paise,
    }
}
