//! Property-based tests for scheme selection and inventory valuation.
//!
//! Run with: cargo test -p rxdist-core --test properties

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use rxdist_core::inventory::{
    plan_fefo_consumption, valuate_inventory, ExpiryRisk, InventoryBatch, InventoryValuer,
};
use rxdist_core::money::Money;
use rxdist_core::scheme::{
    evaluate_scheme, scheme_benefit, AmountSlab, Benefit, ProductScope, QtySlab, Scheme,
    SchemeContext, SchemeKind, SchemeTerms,
};
use rxdist_core::types::{Percent, RecordStatus};

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn scheme(id: usize, terms: SchemeTerms) -> Scheme {
    Scheme {
        id: format!("S-{:03}", id),
        company_id: "C-1".to_string(),
        name: String::new(),
        valid_from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        valid_to: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        products: ProductScope::All,
        status: RecordStatus::Active,
        terms,
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Coarse percentages so different kinds often tie on benefit.
fn tied_percent_strategy() -> impl Strategy<Value = Percent> {
    (0u32..=8).prop_map(|step| Percent::from_bps(step * 250))
}

/// Contiguous amount slabs from 0 paise up, built from sorted cut points.
fn volume_slabs_strategy() -> impl Strategy<Value = Vec<AmountSlab>> {
    prop::collection::btree_set(1i64..5_000_000, 1..5).prop_flat_map(|cuts| {
        let cuts: Vec<i64> = cuts.into_iter().collect();
        let n = cuts.len();
        prop::collection::vec(tied_percent_strategy(), n).prop_map(move |discounts| {
            let mut slabs = Vec::with_capacity(n);
            let mut min = 0;
            for (cut, discount) in cuts.iter().zip(discounts) {
                slabs.push(AmountSlab {
                    min_amount_paise: min,
                    max_amount_paise: *cut,
                    discount,
                });
                min = cut + 1;
            }
            slabs
        })
    })
}

/// Every kind that needs no order context.
fn terms_strategy() -> impl Strategy<Value = SchemeTerms> {
    prop_oneof![
        tied_percent_strategy().prop_map(|p| SchemeTerms::Trade {
            trade_discount_percent: p
        }),
        tied_percent_strategy().prop_map(|p| SchemeTerms::Seasonal {
            seasonal_discount_percent: p,
            season: None,
        }),
        (tied_percent_strategy(), proptest::option::of(0i64..50)).prop_map(|(p, min)| {
            SchemeTerms::Discount {
                discount_percent: p,
                min_purchase_qty: min,
            }
        }),
        ((1i64..20), (1i64..5)).prop_map(|(buy, free)| SchemeTerms::FreeQty {
            buy_qty: buy,
            free_qty: free,
        }),
        slabs_strategy().prop_map(|slabs| SchemeTerms::Slab { slabs }),
        volume_slabs_strategy().prop_map(|volume_slabs| SchemeTerms::Volume { volume_slabs }),
        (tied_percent_strategy(), 0u32..4).prop_map(|(p, weeks)| SchemeTerms::Cash {
            cash_discount_percent: p,
            payment_days: weeks * 7,
        }),
    ]
}

fn schemes_strategy() -> impl Strategy<Value = Vec<Scheme>> {
    prop::collection::vec(terms_strategy(), 0..8).prop_map(|terms| {
        terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| scheme(i, t))
            .collect()
    })
}

/// Contiguous, non-overlapping slabs built from sorted cut points.
fn slabs_strategy() -> impl Strategy<Value = Vec<QtySlab>> {
    prop::collection::btree_set(1i64..500, 1..6).prop_flat_map(|cuts| {
        let cuts: Vec<i64> = cuts.into_iter().collect();
        let n = cuts.len();
        prop::collection::vec(tied_percent_strategy(), n).prop_map(move |discounts| {
            let mut slabs = Vec::with_capacity(n);
            let mut min = 1;
            for (cut, discount) in cuts.iter().zip(discounts) {
                slabs.push(QtySlab {
                    min_qty: min,
                    max_qty: *cut,
                    discount,
                });
                min = cut + 1;
            }
            slabs
        })
    })
}

fn batch_strategy() -> impl Strategy<Value = InventoryBatch> {
    (0usize..1000, -20i64..200, -60i64..120, 0i64..10_000).prop_map(|(n, qty, days, rate)| {
        InventoryBatch {
            id: format!("B-{:04}", n),
            product_id: "P-1".to_string(),
            company_id: None,
            batch_no: format!("BN{}", n),
            qty,
            purchase_date: as_of() - Duration::days(90),
            expiry: as_of() + Duration::days(days),
            rate_paise: rate,
        }
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Buying more never yields fewer free units.
    #[test]
    fn prop_free_qty_monotonic(buy in 1i64..50, free in 1i64..10, qty in 0i64..1000) {
        let schemes = vec![scheme(1, SchemeTerms::FreeQty { buy_qty: buy, free_qty: free })];
        let at = |q: i64| {
            evaluate_scheme(&schemes, &SchemeContext::new("P-1", q, Money::from_rupees(q), as_of()))
                .free_units
        };
        prop_assert!(at(qty + 1) >= at(qty));
        prop_assert_eq!(at(qty), (qty / buy) * free);
    }

    /// Contiguous slabs: a quantity inside the range hits exactly one slab,
    /// and the discount is that slab's percentage of the amount.
    #[test]
    fn prop_single_slab_applies(slabs in slabs_strategy(), qty in 1i64..600, rupees in 0i64..100_000) {
        let matching: Vec<&QtySlab> = slabs.iter().filter(|s| s.contains(qty)).collect();
        prop_assert!(matching.len() <= 1);

        let amount = Money::from_rupees(rupees);
        let schemes = vec![scheme(1, SchemeTerms::Slab { slabs: slabs.clone() })];
        let decision = evaluate_scheme(&schemes, &SchemeContext::new("P-1", qty, amount, as_of()));

        match matching.first() {
            Some(slab) => {
                prop_assert_eq!(decision.applied_scheme_id.as_deref(), Some("S-001"));
                prop_assert_eq!(decision.monetary_discount, amount.percent_of(slab.discount));
            }
            None => prop_assert!(decision.applied_scheme_id.is_none()),
        }
    }

    /// Selection does not depend on the order schemes are listed in.
    #[test]
    fn prop_selection_is_order_independent(
        (schemes, shuffled) in schemes_strategy().prop_flat_map(|s| {
            let shuffled = Just(s.clone()).prop_shuffle();
            (Just(s), shuffled)
        }),
        qty in 0i64..200,
        rupees in 0i64..50_000,
    ) {
        let ctx = SchemeContext::new("P-1", qty, Money::from_rupees(rupees), as_of());
        prop_assert_eq!(evaluate_scheme(&schemes, &ctx), evaluate_scheme(&shuffled, &ctx));
    }

    /// The applied monetary discount is at least every eligible scheme's benefit.
    #[test]
    fn prop_applied_discount_is_maximal(
        schemes in schemes_strategy(),
        qty in 0i64..200,
        rupees in 0i64..50_000,
    ) {
        let ctx = SchemeContext::new("P-1", qty, Money::from_rupees(rupees), as_of());
        let decision = evaluate_scheme(&schemes, &ctx);

        for s in &schemes {
            if let Some(Benefit::Monetary(value)) = scheme_benefit(s, &ctx) {
                prop_assert!(decision.applied_scheme_id.is_some());
                prop_assert!(decision.monetary_discount >= value);
            }
        }
    }

    /// The reported cash incentive beats every other eligible cash scheme on
    /// percent, then payment window.
    #[test]
    fn prop_cash_incentive_is_best(
        schemes in schemes_strategy(),
        qty in 0i64..200,
        rupees in 0i64..50_000,
    ) {
        let ctx = SchemeContext::new("P-1", qty, Money::from_rupees(rupees), as_of());
        let decision = evaluate_scheme(&schemes, &ctx);

        for s in &schemes {
            if let Some(Benefit::Cash { percent, payment_days }) = scheme_benefit(s, &ctx) {
                let best = decision.cash_incentive.as_ref();
                prop_assert!(best.is_some());
                let best = best.unwrap();
                prop_assert!((best.percent, best.payment_days) >= (percent, payment_days));
            }
        }
        prop_assert_ne!(decision.applied_kind, Some(SchemeKind::Cash));
    }

    /// Expiry buckets follow days-left: expired, then critical, then fine.
    #[test]
    fn prop_expiry_buckets(batch in batch_strategy(), window in 0i64..120) {
        let valuer = InventoryValuer::new(window);
        let days_left = (batch.expiry - as_of()).num_days();
        let expected = if days_left <= 0 {
            ExpiryRisk::Expired
        } else if days_left <= window {
            ExpiryRisk::Critical
        } else {
            ExpiryRisk::Fine
        };
        prop_assert_eq!(valuer.risk(&batch, as_of()), expected);
    }

    /// On-hand is the sum of positive quantities; negatives never subtract.
    #[test]
    fn prop_on_hand_ignores_negative(batches in prop::collection::vec(batch_strategy(), 0..12)) {
        let valuation = valuate_inventory(&batches, 0, as_of());
        let expected: i64 = batches.iter().map(|b| b.qty.max(0)).sum();
        prop_assert_eq!(valuation.on_hand, expected);
        prop_assert!(valuation.expiring_value >= Money::zero());
    }

    /// A FEFO plan never allocates more than requested or than a batch holds.
    #[test]
    fn prop_fefo_plan_bounded(
        batches in prop::collection::vec(batch_strategy(), 0..12),
        requested in 0i64..500,
    ) {
        let plan = plan_fefo_consumption(&batches, "P-1", requested, as_of());
        prop_assert_eq!(plan.allocated + plan.shortfall, requested);
        for allocation in &plan.allocations {
            prop_assert!(allocation.qty > 0);
            prop_assert!(allocation.expiry > as_of());
        }
        for pair in plan.allocations.windows(2) {
            prop_assert!(pair[0].expiry <= pair[1].expiry);
        }
    }
}
