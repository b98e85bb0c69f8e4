//! Validation utilities for the Local Marketplace Platform

use rust_decimal::Decimal;

use crate::models::RequestLine;

// ============================================================================
// Account Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a phone number: 10-13 digits, optional leading +
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let digits = rest.chars().filter(|c| c.is_ascii_digit()).count();
    if !rest.chars().all(|c| c.is_ascii_digit() || c == '-' || c == ' ') {
        return Err("Phone number contains invalid characters");
    }
    if !(10..=13).contains(&digits) {
        return Err("Phone number must have 10-13 digits");
    }
    Ok(())
}

// ============================================================================
// Inventory / Request Validations
// ============================================================================

/// Validate a quantity is strictly positive
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a price is non-negative
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate an item name is non-empty after trimming
pub fn validate_item_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Item name is required");
    }
    Ok(())
}

/// Validate the lines of a stock request: at least one line, every line with
/// a name and a positive quantity.
pub fn validate_request_lines(lines: &[RequestLine]) -> Result<(), &'static str> {
    if lines.is_empty() {
        return Err("A stock request needs at least one item");
    }
    for line in lines {
        validate_item_name(&line.name)?;
        validate_quantity(line.quantity)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn email_validation() {
        assert!(validate_email("dealer@example.com").is_ok());
        assert!(validate_email("nope").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn phone_validation() {
        assert!(validate_phone("0812345678").is_ok());
        assert!(validate_phone("+919876543210").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("phone-number").is_err());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(Decimal::ONE).is_ok());
        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_quantity(Decimal::NEGATIVE_ONE).is_err());
    }

    #[test]
    fn request_lines_must_be_well_formed() {
        assert!(validate_request_lines(&[]).is_err());

        let good = RequestLine {
            name: "Rice".into(),
            quantity: Decimal::from(20),
            source_item_id: Some(Uuid::nil()),
            price: None,
            image_url: None,
            unit: None,
        };
        assert!(validate_request_lines(std::slice::from_ref(&good)).is_ok());

        let blank_name = RequestLine {
            name: "   ".into(),
            ..good.clone()
        };
        assert!(validate_request_lines(&[blank_name]).is_err());

        let zero_qty = RequestLine {
            quantity: Decimal::ZERO,
            ..good
        };
        assert!(validate_request_lines(&[zero_qty]).is_err());
    }
}
