//! # Validation Module
//!
//! Field validators for master data loaded from a snapshot.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Shape and types                                                   │
//! │  └── GST slab, tier and status enums                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── HSN / GSTIN formats                                               │
//! │  └── Ranges, signs, date windows                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Snapshot::validate (rxdist-store)                            │
//! │  └── Collects problems into a report; the load never fails on them     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rxdist_core::validation::{validate_hsn_code, validate_quantity};
//!
//! assert!(validate_hsn_code("30049099").is_ok());
//! assert!(validate_quantity("qty", 5).is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::Percent;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// GSTIN length fixed by the GST portal.
pub const GSTIN_LEN: usize = 15;

/// Longest id the store accepts.
pub const MAX_ID_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a record id.
///
/// ## Rules
/// - Must not be blank
/// - At most 64 characters
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    Ok(())
}

/// Validates an HSN code.
///
/// ## Rules
/// - Digits only
/// - 4, 6 or 8 digits long
///
/// ```rust
/// use rxdist_core::validation::validate_hsn_code;
///
/// assert!(validate_hsn_code("3004").is_ok());
/// assert!(validate_hsn_code("300490").is_ok());
/// assert!(validate_hsn_code("30049").is_err());
/// assert!(validate_hsn_code("30AB").is_err());
/// ```
pub fn validate_hsn_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "hsnCode".to_string(),
        });
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "hsnCode".to_string(),
            reason: "must contain digits only".to_string(),
        });
    }

    if !matches!(code.len(), 4 | 6 | 8) {
        return Err(ValidationError::InvalidFormat {
            field: "hsnCode".to_string(),
            reason: "must be 4, 6 or 8 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates a GSTIN.
///
/// ## Rules
/// - Exactly 15 characters
/// - Uppercase ASCII letters and digits only
///
/// The check digit is not verified.
pub fn validate_gstin(gstin: &str) -> ValidationResult<()> {
    let gstin = gstin.trim();

    if gstin.len() != GSTIN_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "gstin".to_string(),
            reason: format!("must be {} characters", GSTIN_LEN),
        });
    }

    if !gstin
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidFormat {
            field: "gstin".to_string(),
            reason: "must contain only uppercase letters and digits".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a percentage is within `0..=100`.
pub fn validate_percent(field: &str, percent: Percent) -> ValidationResult<()> {
    if percent.bps() > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a stock or order quantity is not negative. Zero is allowed.
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an amount in paise is not negative.
///
/// ```rust
/// use rxdist_core::validation::validate_paise;
///
/// assert!(validate_paise("ratePaise", 4550).is_ok());
/// assert!(validate_paise("ratePaise", 0).is_ok());
/// assert!(validate_paise("ratePaise", -1).is_err());
/// ```
pub fn validate_paise(field: &str, paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Validates `from <= to`. A single-day window is fine.
pub fn validate_date_window(field: &str, from: NaiveDate, to: NaiveDate) -> ValidationResult<()> {
    if from > to {
        return Err(ValidationError::InvertedWindow {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string, for ids minted by `rxdist-seed`.
///
/// ```rust
/// use rxdist_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
