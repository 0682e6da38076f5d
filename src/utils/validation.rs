//! Validation utilities

use crate::types::*;
use bigdecimal::BigDecimal;

/// Validate that a transaction magnitude is strictly positive
pub fn validate_positive_amount(amount: &BigDecimal) -> LedgerResult<()> {
    if *amount <= BigDecimal::from(0) {
        Err(LedgerError::InvalidArgument(
            "amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a free-text field is non-empty and of reasonable length
pub fn validate_name(value: &str, what: &str) -> LedgerResult<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidArgument(format!(
            "{what} cannot be empty"
        )));
    }

    if value.len() > 256 {
        return Err(LedgerError::InvalidArgument(format!(
            "{what} cannot exceed 256 characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amounts_only() {
        assert!(validate_positive_amount(&BigDecimal::from(1)).is_ok());
        assert!(validate_positive_amount(&BigDecimal::from(0)).is_err());
        assert!(validate_positive_amount(&BigDecimal::from(-3)).is_err());
    }

    #[test]
    fn names_must_be_present_and_bounded() {
        assert!(validate_name("Checking", "account name").is_ok());
        assert!(validate_name("", "account name").is_err());
        assert!(validate_name("   ", "account name").is_err());
        assert!(validate_name(&"x".repeat(257), "account name").is_err());
    }
}
