//! # GST
//!
//! Goods and Services Tax slabs and line-level tax math.
//!
//! Medicines fall in one of five legal slabs. Anything else in a product
//! record is a data-entry mistake, so `GstRate` refuses to deserialize it.
//!
//! ## Line Flow
//! ```text
//! gross amount ──► minus scheme discount ──► taxable ──► + GST ──► total
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percent;

/// The five GST slabs. Serialized as the bare percentage number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum GstRate {
    #[default]
    Zero,
    Five,
    Twelve,
    Eighteen,
    TwentyEight,
}

impl GstRate {
    pub const ALL: [GstRate; 5] = [
        GstRate::Zero,
        GstRate::Five,
        GstRate::Twelve,
        GstRate::Eighteen,
        GstRate::TwentyEight,
    ];

    /// Whole-percent value of the slab.
    pub const fn percent_value(&self) -> u32 {
        match self {
            GstRate::Zero => 0,
            GstRate::Five => 5,
            GstRate::Twelve => 12,
            GstRate::Eighteen => 18,
            GstRate::TwentyEight => 28,
        }
    }

    #[inline]
    pub const fn as_percent(&self) -> Percent {
        Percent::from_bps(self.percent_value() * 100)
    }
}

impl TryFrom<u32> for GstRate {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GstRate::Zero),
            5 => Ok(GstRate::Five),
            12 => Ok(GstRate::Twelve),
            18 => Ok(GstRate::Eighteen),
            28 => Ok(GstRate::TwentyEight),
            _ => Err(ValidationError::NotAllowed {
                field: "gstRate".to_string(),
                allowed: GstRate::ALL
                    .iter()
                    .map(|r| r.percent_value().to_string())
                    .collect(),
            }),
        }
    }
}

impl From<GstRate> for u32 {
    fn from(rate: GstRate) -> Self {
        rate.percent_value()
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent_value())
    }
}

impl Money {
    /// GST on a taxable amount, rounded to the paisa.
    ///
    /// ```rust
    /// use rxdist_core::gst::GstRate;
    /// use rxdist_core::money::Money;
    ///
    /// let taxable = Money::from_rupees(1350);
    /// assert_eq!(taxable.calculate_gst(GstRate::Twelve), Money::from_rupees(162));
    /// ```
    pub fn calculate_gst(&self, rate: GstRate) -> Money {
        self.percent_of(rate.as_percent())
    }
}

/// Tax breakdown of one invoice line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineAmounts {
    pub taxable: Money,
    pub gst: Money,
    pub total: Money,
}

/// Splits a line into taxable value, GST and total after a scheme discount.
///
/// GST is charged on the discounted value, as on a tax invoice.
pub fn net_line_amount(gross: Money, discount: Money, rate: GstRate) -> LineAmounts {
    let taxable = gross - discount;
    let gst = taxable.calculate_gst(rate);
    LineAmounts {
        taxable,
        gst,
        total: taxable + gst,
    }
}
