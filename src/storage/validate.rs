//! Item code and name validation
//!
//! Pure functions, no state. A code looks like `A12T-4GH7-QPL9-3N4M`:
//! 16 alphanumeric characters in four groups joined by dashes.

use super::record::ItemRecord;
use crate::error::{CodeError, Error, NameError, Result};

/// 16 alphanumeric characters + 3 dashes
pub const CODE_LENGTH: usize = 16 + 3;
/// Number of dash-separated groups in a code
pub const CODE_PARTS: usize = 4;
/// Characters per group
pub const CODE_PART_LENGTH: usize = 4;

/// Check the syntax of an item code
pub fn validate_code(code: &str) -> std::result::Result<(), CodeError> {
    if code.chars().count() != CODE_LENGTH {
        return Err(CodeError::WrongLength);
    }

    let parts: Vec<&str> = code.split('-').collect();
    if parts.len() != CODE_PARTS {
        return Err(CodeError::WrongPartCount);
    }

    for part in parts {
        if part.chars().count() != CODE_PART_LENGTH {
            return Err(CodeError::PartWrongLength);
        }
        if !is_alphanumeric(part) {
            return Err(CodeError::PartNotAlphanumeric);
        }
    }

    Ok(())
}

/// Check the syntax of an item name
///
/// Whitespace separates words; every word must be alphanumeric.
pub fn validate_name(name: &str) -> std::result::Result<(), NameError> {
    if name.split_whitespace().all(is_alphanumeric) {
        Ok(())
    } else {
        Err(NameError::PartNotAlphanumeric)
    }
}

/// Validate every item of an add request
///
/// Items are checked in order: code, name, then whether a later item in the
/// same batch repeats the code (case-insensitive). First violation wins.
pub fn validate_add_batch(items: &[ItemRecord]) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        validate_code(&item.code)?;
        validate_name(&item.name)?;

        if items[i + 1..]
            .iter()
            .any(|other| other.code.eq_ignore_ascii_case(&item.code))
        {
            return Err(Error::DuplicateCodeInBatch {
                code: item.code.clone(),
            });
        }
    }
    Ok(())
}

/// ASCII letters and digits only
pub fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}
