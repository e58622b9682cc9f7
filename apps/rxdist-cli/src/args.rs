//! Command line definitions and value parsers.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rxdist_core::money::Money;
use rxdist_core::scheme::OrderLine;
use rxdist_core::types::CustomerTier;

#[derive(Debug, Parser)]
#[command(name = "rxdist")]
#[command(about = "Supplier scheme evaluation and batch inventory valuation")]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir / rxdist.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file, overrides the config
    #[arg(long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Pick the scheme for one purchase line
    Evaluate {
        #[arg(long)]
        company: String,

        #[arg(long)]
        product: String,

        #[arg(long, allow_negative_numbers = true)]
        qty: i64,

        /// Line amount in rupees before discount, e.g. 3600 or 3600.50
        #[arg(long, value_parser = parse_rupees, allow_negative_numbers = true)]
        amount: Money,

        /// Evaluation date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Other products on the same order, comma separated (combo schemes).
        /// The evaluated product always counts as part of the order.
        #[arg(long, value_delimiter = ',')]
        order_products: Option<Vec<String>>,
    },

    /// Evaluate every line of a purchase order
    Order {
        #[arg(long)]
        company: String,

        /// product:qty:amount, repeatable
        #[arg(long = "line", value_parser = parse_order_line, required = true)]
        lines: Vec<OrderLine>,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Stock status and expiry risk of one product
    Valuate {
        #[arg(long)]
        product: String,

        #[arg(long)]
        today: Option<NaiveDate>,

        /// Also plan a FEFO draw of this many units
        #[arg(long)]
        plan_qty: Option<i64>,
    },

    /// Stock dashboard, supplier balances and data problems
    Report {
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Selling price for a customer tier
    Price {
        #[arg(long)]
        product: String,

        /// A, B or C
        #[arg(long)]
        tier: CustomerTier,

        /// Unit cost in rupees
        #[arg(long, value_parser = parse_rupees)]
        cost: Money,
    },
}

/// Parses rupees with up to two decimals into paise, without floats.
pub fn parse_rupees(s: &str) -> Result<Money, String> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(format!("'{}' is not an amount", s));
    }
    if frac.len() > 2 {
        return Err(format!("'{}' has more than two decimals", s));
    }

    let parse = |part: &str| -> Result<i64, String> {
        if part.is_empty() {
            Ok(0)
        } else if part.chars().all(|c| c.is_ascii_digit()) {
            part.parse::<i64>().map_err(|e| format!("'{}': {}", s, e))
        } else {
            Err(format!("'{}' is not an amount", s))
        }
    };

    let rupees = parse(whole)?;
    let mut paise = parse(frac)?;
    if frac.len() == 1 {
        paise *= 10;
    }

    let total = rupees
        .checked_mul(100)
        .and_then(|r| r.checked_add(paise))
        .ok_or_else(|| format!("'{}' is too large", s))?;

    Ok(Money::from_paise(if negative { -total } else { total }))
}

/// Parses `product:qty:amount`.
pub fn parse_order_line(s: &str) -> Result<OrderLine, String> {
    let mut parts = s.splitn(3, ':');
    let (Some(product), Some(qty), Some(amount)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("'{}' must look like product:qty:amount", s));
    };

    if product.trim().is_empty() {
        return Err(format!("'{}' has no product id", s));
    }

    let qty = qty
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("'{}': bad quantity: {}", s, e))?;

    Ok(OrderLine {
        product_id: product.trim().to_string(),
        qty,
        amount: parse_rupees(amount)?,
    })
}
