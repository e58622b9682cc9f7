//! Subcommand handlers. Each returns a serializable output; `main` prints it.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rxdist_core::gst::{net_line_amount, LineAmounts};
use rxdist_core::inventory::{
    plan_fefo_consumption, stock_level, ConsumptionPlan, InventoryReport, InventoryValuation,
    InventoryValuer, StockLevel,
};
use rxdist_core::ledger::{company_balances, CompanyBalance};
use rxdist_core::money::Money;
use rxdist_core::rate::{margin_for, price_for_customer};
use rxdist_core::scheme::{
    evaluate_order, evaluate_scheme, OrderContext, OrderDecision, OrderLine, Scheme,
    SchemeContext, SchemeDecision,
};
use rxdist_core::types::{CustomerTier, Percent};
use rxdist_store::{LoadReport, Problem, Snapshot};
use serde::Serialize;
use tracing::{debug, info, warn};

// =============================================================================
// evaluate
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateOutput {
    pub context: SchemeContext,
    pub decision: SchemeDecision,
    /// Summary of the applied scheme, if any.
    pub applied: Option<String>,
    /// Taxable value, GST and total; absent for products not in the snapshot.
    pub line: Option<LineAmounts>,
}

pub fn evaluate(
    snapshot: &Snapshot,
    company: &str,
    context: SchemeContext,
) -> Result<EvaluateOutput> {
    snapshot
        .company(company)
        .with_context(|| format!("cannot evaluate schemes of {}", company))?;

    let schemes = snapshot.schemes_of(company);
    trace_malformed(&schemes);
    debug!(company, schemes = schemes.len(), "Evaluating line");

    let decision = evaluate_scheme(&schemes, &context);
    debug!(
        applied = ?decision.applied_scheme_id,
        discount = %decision.monetary_discount,
        free_units = decision.free_units,
        "Scheme decision"
    );
    let applied = decision
        .applied_scheme_id
        .as_deref()
        .and_then(|id| schemes.iter().find(|s| s.id == id))
        .map(|s| format!("{} ({})", s.name, s.describe()));

    let line = match snapshot.product(&context.product_id) {
        Ok(product) => Some(net_line_amount(
            context.amount,
            decision.monetary_discount,
            product.gst_rate,
        )),
        Err(e) => {
            warn!(error = %e, "No GST breakdown");
            None
        }
    };

    Ok(EvaluateOutput {
        context,
        decision,
        applied,
        line,
    })
}

/// Malformed schemes never apply; say so at debug level only.
fn trace_malformed(schemes: &[Scheme]) {
    for scheme in schemes.iter().filter(|s| !s.is_well_formed()) {
        debug!(scheme_id = %scheme.id, kind = %scheme.kind(), "Ignoring malformed scheme");
    }
}

// =============================================================================
// order
// =============================================================================

pub fn order(
    snapshot: &Snapshot,
    company: &str,
    lines: Vec<OrderLine>,
    as_of: NaiveDate,
) -> Result<OrderDecision> {
    snapshot
        .company(company)
        .with_context(|| format!("cannot evaluate schemes of {}", company))?;

    let schemes = snapshot.schemes_of(company);
    trace_malformed(&schemes);
    let order = OrderContext { lines, as_of };
    let decision = evaluate_order(&schemes, &order);

    info!(
        lines = decision.lines.len(),
        discount = %decision.total_discount,
        free_units = decision.total_free_units,
        "Order evaluated"
    );
    Ok(decision)
}

// =============================================================================
// valuate
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuateOutput {
    pub product_id: String,
    pub today: NaiveDate,
    pub min_stock: i64,
    pub valuation: InventoryValuation,
    pub plan: Option<ConsumptionPlan>,
}

pub fn valuate(
    snapshot: &Snapshot,
    valuer: InventoryValuer,
    product_id: &str,
    today: NaiveDate,
    plan_qty: Option<i64>,
) -> ValuateOutput {
    let min_stock = match snapshot.product(product_id) {
        Ok(product) => product.min_stock,
        Err(e) => {
            warn!(error = %e, "Unknown product, valuing with minimum stock 0");
            0
        }
    };

    let batches = snapshot.batches_of(product_id);
    let valuation = valuer.valuate(&batches, min_stock, today);
    let plan = plan_qty.map(|qty| plan_fefo_consumption(&batches, product_id, qty, today));

    ValuateOutput {
        product_id: product_id.to_string(),
        today,
        min_stock,
        valuation,
        plan,
    }
}

// =============================================================================
// report
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    pub inventory: InventoryReport,
    /// Stock levels of products that only appear in batches.
    pub orphan_stock: Vec<StockLevel>,
    pub supplier_balances: Vec<CompanyBalance>,
    pub total_outstanding: Money,
    pub load: LoadReport,
    pub problems: Vec<Problem>,
}

pub fn report(
    snapshot: &Snapshot,
    load: LoadReport,
    valuer: InventoryValuer,
    today: NaiveDate,
) -> ReportOutput {
    let inventory = valuer.report(&snapshot.products, &snapshot.batches, today);

    let mut orphan_ids: Vec<&str> = snapshot
        .batches
        .iter()
        .map(|b| b.product_id.as_str())
        .filter(|id| snapshot.product(id).is_err())
        .collect();
    orphan_ids.sort_unstable();
    orphan_ids.dedup();
    let orphan_stock = orphan_ids
        .into_iter()
        .map(|id| stock_level(&snapshot.batches, id, 0))
        .collect();

    let supplier_balances = company_balances(&snapshot.purchases, &snapshot.payments);
    let total_outstanding = supplier_balances.iter().map(|b| b.outstanding).sum();

    let problems = snapshot.validate();
    if !problems.is_empty() {
        warn!(count = problems.len(), "Snapshot has data problems");
    }

    ReportOutput {
        inventory,
        orphan_stock,
        supplier_balances,
        total_outstanding,
        load,
        problems,
    }
}

// =============================================================================
// price
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceOutput {
    pub product_id: String,
    pub tier: CustomerTier,
    pub cost: Money,
    pub margin: Percent,
    pub selling_price: Money,
    /// GST on the selling price at the product's slab.
    pub gst: Money,
}

pub fn price(snapshot: &Snapshot, product_id: &str, tier: CustomerTier, cost: Money) -> Result<PriceOutput> {
    let selling_price = price_for_customer(
        &snapshot.products,
        &snapshot.rate_masters,
        product_id,
        tier,
        cost,
    )?;

    // price_for_customer succeeded, so both lookups hit.
    let product = snapshot.product(product_id)?;
    let margin = margin_for(&snapshot.rate_masters, product_id, tier).unwrap_or_default();

    Ok(PriceOutput {
        product_id: product_id.to_string(),
        tier,
        cost,
        margin,
        selling_price,
        gst: selling_price.calculate_gst(product.gst_rate),
    })
}
