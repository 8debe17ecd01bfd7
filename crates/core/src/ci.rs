//! National identity number (Ecuadorian cédula) validation.

use crate::error::CoreError;

/// Checks whether a text is a valid national identity number.
///
/// Implementations backed by an external service report outages as
/// [`CoreError::ValidationUnavailable`], never as `Ok(false)`.
pub trait CiValidator: Send + Sync {
    fn validate(&self, text: &str) -> Result<bool, CoreError>;
}

/// Number of digits in a cédula.
const CEDULA_LENGTH: usize = 10;
/// Province code reserved for Ecuadorians registered abroad.
const FOREIGN_PROVINCE: u32 = 30;
/// Highest regular province code.
const MAX_PROVINCE: u32 = 24;
/// Third digits at or above this value belong to companies, not people.
const MAX_THIRD_DIGIT: u32 = 6;

/// Offline modulo-10 checksum validator for Ecuadorian cédulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct CedulaValidator;

impl CiValidator for CedulaValidator {
    fn validate(&self, text: &str) -> Result<bool, CoreError> {
        Ok(is_valid_cedula(text))
    }
}

/// Validate a cédula: 10 digits, a known province code, a natural-person
/// third digit, and a matching check digit.
pub fn is_valid_cedula(text: &str) -> bool {
    if text.len() != CEDULA_LENGTH || !text.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = text.bytes().map(|b| u32::from(b - b'0')).collect();

    let province = digits[0] * 10 + digits[1];
    if !((1..=MAX_PROVINCE).contains(&province) || province == FOREIGN_PROVINCE) {
        return false;
    }
    if digits[2] >= MAX_THIRD_DIGIT {
        return false;
    }

    let sum: u32 = digits[..9]
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let product = if i % 2 == 0 { d * 2 } else { *d };
            if product > 9 {
                product - 9
            } else {
                product
            }
        })
        .sum();
    let check = (10 - sum % 10) % 10;
    check == digits[9]
}
