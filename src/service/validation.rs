//! Field validation for contact details and pets.

use crate::error::AppError;
use crate::model::{Contact, Pet};
use regex::Regex;

const ZIP_PATTERN: &str = r"^\d{5}(-\d{4})?$";
const STATE_PATTERN: &str = r"^[A-Za-z]{2}$";
const PHONE_PATTERN: &str = r"^(\+?1[ .-]?)?(\(\d{3}\)|\d{3})[ .-]?\d{3}[ .-]?\d{4}$";

pub struct RequestValidator;

impl RequestValidator {
    /// A client-supplied id must be positive and leave room for the next generated id.
    pub fn validate_id(id: Option<i64>) -> Result<(), AppError> {
        match id {
            Some(id) if id < 1 || id == i64::MAX => Err(AppError::Validation(format!(
                "id must be between 1 and {}, got {}",
                i64::MAX - 1,
                id
            ))),
            _ => Ok(()),
        }
    }

    /// Name and zip are required; state, phone and email are checked only when present.
    pub fn validate_contact(contact: &Contact) -> Result<(), AppError> {
        require("name", &contact.name)?;
        require("zip", &contact.zip)?;
        validate_pattern("zip", &contact.zip, ZIP_PATTERN, "a 5-digit or ZIP+4 code")?;
        if let Some(state) = present(&contact.state) {
            validate_pattern("state", state, STATE_PATTERN, "a 2-letter code")?;
        }
        if let Some(phone) = present(&contact.phone_number) {
            validate_pattern("phoneNumber", phone, PHONE_PATTERN, "a US phone number")?;
        }
        if let Some(email) = present(&contact.email) {
            validate_email("email", email)?;
        }
        Ok(())
    }

    pub fn validate_pet(pet: &Pet) -> Result<(), AppError> {
        require("name", &pet.name)?;
        if let Some(age) = pet.age {
            if age < 0 {
                return Err(AppError::Validation(format!("age must be at least 0, got {}", age)));
            }
        }
        Ok(())
    }
}

/// Optional text that is set and not blank. Returned untrimmed: what is checked is what gets stored.
fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

fn require(field: &str, v: &str) -> Result<(), AppError> {
    if v.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_pattern(field: &str, v: &str, pattern: &str, expected: &str) -> Result<(), AppError> {
    let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", field)))?;
    if !re.is_match(v) {
        return Err(AppError::Validation(format!("{} must be {}", field, expected)));
    }
    Ok(())
}

fn validate_email(field: &str, v: &str) -> Result<(), AppError> {
    if !v.contains('@') || v.len() < 3 {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PetType;

    fn contact() -> Contact {
        Contact::new("Jane Doe", "12345")
    }

    #[test]
    fn minimal_contact_is_valid() {
        assert!(RequestValidator::validate_contact(&contact()).is_ok());
    }

    #[test]
    fn name_and_zip_required() {
        let c = Contact { name: "  ".into(), ..contact() };
        assert!(matches!(RequestValidator::validate_contact(&c), Err(AppError::Validation(m)) if m.contains("name")));
        let c = Contact { zip: String::new(), ..contact() };
        assert!(matches!(RequestValidator::validate_contact(&c), Err(AppError::Validation(m)) if m.contains("zip")));
    }

    #[test]
    fn zip_formats() {
        for ok in ["12345", "12345-6789"] {
            assert!(RequestValidator::validate_contact(&Contact { zip: ok.into(), ..contact() }).is_ok(), "{}", ok);
        }
        for bad in ["1234", "ABCDE", "12345-67", " 12345", "12345 "] {
            assert!(RequestValidator::validate_contact(&Contact { zip: bad.into(), ..contact() }).is_err(), "{}", bad);
        }
    }

    #[test]
    fn optional_fields_checked_when_present() {
        let ok = Contact {
            state: Some("OH".into()),
            phone_number: Some("(614) 555-0100".into()),
            email: Some("jane@example.com".into()),
            address_line2: Some(String::new()),
            ..contact()
        };
        assert!(RequestValidator::validate_contact(&ok).is_ok());
        assert!(RequestValidator::validate_contact(&Contact { state: Some("Ohio".into()), ..contact() }).is_err());
        assert!(RequestValidator::validate_contact(&Contact { phone_number: Some("555".into()), ..contact() }).is_err());
        assert!(RequestValidator::validate_contact(&Contact { email: Some("jane".into()), ..contact() }).is_err());
        assert!(RequestValidator::validate_contact(&Contact { state: Some("".into()), ..contact() }).is_ok());
    }

    #[test]
    fn phone_variants() {
        for ok in ["614-555-0100", "614.555.0100", "6145550100", "+1 614 555 0100"] {
            let c = Contact { phone_number: Some(ok.into()), ..contact() };
            assert!(RequestValidator::validate_contact(&c).is_ok(), "{}", ok);
        }
    }

    #[test]
    fn padded_state_is_rejected() {
        let c = Contact { state: Some(" OH".into()), ..contact() };
        assert!(RequestValidator::validate_contact(&c).is_err());
    }

    #[test]
    fn client_ids_must_be_positive_and_below_max() {
        assert!(RequestValidator::validate_id(None).is_ok());
        assert!(RequestValidator::validate_id(Some(1)).is_ok());
        assert!(RequestValidator::validate_id(Some(i64::MAX - 1)).is_ok());
        for bad in [0, -5, i64::MIN, i64::MAX] {
            assert!(matches!(RequestValidator::validate_id(Some(bad)), Err(AppError::Validation(_))), "{}", bad);
        }
    }

    #[test]
    fn pets_need_a_name_and_non_negative_age() {
        assert!(RequestValidator::validate_pet(&Pet::new("Rex", PetType::Dog)).is_ok());
        assert!(RequestValidator::validate_pet(&Pet::new("", PetType::Dog)).is_err());
        let old = Pet { age: Some(-1), ..Pet::new("Rex", PetType::Dog) };
        assert!(RequestValidator::validate_pet(&old).is_err());
    }
}
