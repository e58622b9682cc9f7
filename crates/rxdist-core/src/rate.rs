//! # Rate Masters
//!
//! Selling price derivation from cost, per customer tier.
//!
//! ```text
//! cost ₹100.00 ── tier B margin 12% ──► selling ₹112.00
//! ```
//!
//! A rate master row is keyed by `(product_id, tier)`. When a snapshot holds
//! duplicate rows for the same key, the last one wins.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CustomerTier, Percent, Product};

/// Margin applied on cost for one product and customer tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RateMaster {
    pub product_id: String,
    pub tier: CustomerTier,
    pub margin: Percent,
}

impl RateMaster {
    #[inline]
    pub fn matches(&self, product_id: &str, tier: CustomerTier) -> bool {
        self.product_id == product_id && self.tier == tier
    }

    /// `cost + cost × margin`.
    #[inline]
    pub fn price(&self, cost: Money) -> Money {
        cost.apply_markup(self.margin)
    }
}

/// Margin for `(product_id, tier)`, last matching row wins.
pub fn margin_for(rate_masters: &[RateMaster], product_id: &str, tier: CustomerTier) -> Option<Percent> {
    rate_masters
        .iter()
        .rev()
        .find(|r| r.matches(product_id, tier))
        .map(|r| r.margin)
}

/// Selling price for a tier, or `None` without a rate master row.
///
/// ```rust
/// use rxdist_core::money::Money;
/// use rxdist_core::rate::{selling_price, RateMaster};
/// use rxdist_core::types::{CustomerTier, Percent};
///
/// let masters = vec![RateMaster {
///     product_id: "P-1".to_string(),
///     tier: CustomerTier::B,
///     margin: Percent::from_bps(1200),
/// }];
/// let price = selling_price(&masters, "P-1", CustomerTier::B, Money::from_rupees(100));
/// assert_eq!(price, Some(Money::from_rupees(112)));
/// assert_eq!(selling_price(&masters, "P-1", CustomerTier::A, Money::from_rupees(100)), None);
/// ```
pub fn selling_price(
    rate_masters: &[RateMaster],
    product_id: &str,
    tier: CustomerTier,
    cost: Money,
) -> Option<Money> {
    margin_for(rate_masters, product_id, tier).map(|margin| cost.apply_markup(margin))
}

/// Price quote for a product that must exist, be active and have a rate.
pub fn price_for_customer(
    products: &[Product],
    rate_masters: &[RateMaster],
    product_id: &str,
    tier: CustomerTier,
    cost: Money,
) -> CoreResult<Money> {
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if !product.is_active() {
        return Err(CoreError::ProductInactive(product_id.to_string()));
    }

    selling_price(rate_masters, product_id, tier, cost).ok_or_else(|| CoreError::RateMasterMissing {
        product_id: product_id.to_string(),
        tier,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gst::GstRate;
    use crate::types::RecordStatus;

    fn master(product: &str, tier: CustomerTier, bps: u32) -> RateMaster {
        RateMaster {
            product_id: product.to_string(),
            tier,
            margin: Percent::from_bps(bps),
        }
    }

    fn product(id: &str, status: RecordStatus) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            generic_name: None,
            hsn_code: "3004".to_string(),
            gst_rate: GstRate::Twelve,
            min_stock: 0,
            status,
            company_id: None,
            pack: None,
        }
    }

    #[test]
    fn test_selling_price_rounds_half_up() {
        let masters = vec![master("P-1", CustomerTier::A, 1000)];
        // 10% of 1005 paise = 100.5 -> 101
        assert_eq!(
            selling_price(&masters, "P-1", CustomerTier::A, Money::from_paise(1005)),
            Some(Money::from_paise(1106))
        );
    }

    #[test]
    fn test_last_duplicate_wins() {
        let masters = vec![
            master("P-1", CustomerTier::C, 500),
            master("P-2", CustomerTier::C, 900),
            master("P-1", CustomerTier::C, 800),
        ];
        assert_eq!(
            margin_for(&masters, "P-1", CustomerTier::C),
            Some(Percent::from_bps(800))
        );
    }

    #[test]
    fn test_missing_rate() {
        assert_eq!(selling_price(&[], "P-1", CustomerTier::A, Money::from_rupees(10)), None);
    }

    #[test]
    fn test_price_for_customer_errors() {
        let products = vec![
            product("P-1", RecordStatus::Active),
            product("P-OLD", RecordStatus::Inactive),
        ];
        let masters = vec![master("P-1", CustomerTier::A, 1500)];
        let cost = Money::from_rupees(200);

        assert_eq!(
            price_for_customer(&products, &masters, "P-1", CustomerTier::A, cost).unwrap(),
            Money::from_rupees(230)
        );
        assert!(matches!(
            price_for_customer(&products, &masters, "P-404", CustomerTier::A, cost),
            Err(CoreError::ProductNotFound(_))
        ));
        assert!(matches!(
            price_for_customer(&products, &masters, "P-OLD", CustomerTier::A, cost),
            Err(CoreError::ProductInactive(_))
        ));
        assert!(matches!(
            price_for_customer(&products, &masters, "P-1", CustomerTier::B, cost),
            Err(CoreError::RateMasterMissing { tier: CustomerTier::B, .. })
        ));
    }
}
