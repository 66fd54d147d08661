//! Utilidades de validación
//!
//! Validadores personalizados usados por los modelos vía `#[validate(custom = ...)]`.
//! Los campos opcionales de los formularios llegan como cadena vacía, por eso
//! casi todos aceptan `""`.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// DNI (8 dígitos + letra) o NIE (X/Y/Z + 7 dígitos + letra)
    static ref DNI_NIE_RE: Regex = Regex::new(r"^[XYZ0-9][0-9]{7}[A-Z]$").unwrap();
    /// NIF de empresa: letra o dígito inicial, 7 dígitos y carácter de control
    static ref NIF_RE: Regex = Regex::new(r"^[A-Z0-9][0-9]{7}[A-Z0-9]$").unwrap();
}

const DNI_LETTERS: &[u8] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Validar DNI / NIE español, incluida la letra de control. Vacío = no informado.
pub fn validate_dni(value: &str) -> Result<(), ValidationError> {
    let clean = value.trim().to_uppercase().replace(['-', ' '], "");
    if clean.is_empty() {
        return Ok(());
    }

    if !DNI_NIE_RE.is_match(&clean) {
        let mut error = ValidationError::new("dni");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }

    // NIE: X=0, Y=1, Z=2
    let digits: String = clean[..8]
        .replace('X', "0")
        .replace('Y', "1")
        .replace('Z', "2");
    let number: usize = digits.parse().map_err(|_| ValidationError::new("dni"))?;
    let expected = DNI_LETTERS[number % 23] as char;

    if clean.ends_with(expected) {
        Ok(())
    } else {
        let mut error = ValidationError::new("dni_letter");
        error.add_param("value".into(), &value.to_string());
        error.add_param("expected".into(), &expected.to_string());
        Err(error)
    }
}

/// Validar NIF de empresa (formato). Vacío = no informado.
pub fn validate_nif(value: &str) -> Result<(), ValidationError> {
    let clean = value.trim().to_uppercase().replace(['-', ' '], "");
    if clean.is_empty() || NIF_RE.is_match(&clean) {
        return Ok(());
    }
    let mut error = ValidationError::new("nif");
    error.add_param("value".into(), &value.to_string());
    Err(error)
}

/// Validar formato de email si viene informado
pub fn validate_optional_email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    let valid = value
        .split_once('@')
        .map(|(user, domain)| !user.is_empty() && domain.contains('.') && !domain.ends_with('.'))
        .unwrap_or(false);
    if !valid {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico) si viene informado
pub fn validate_optional_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 9 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de matrícula de vehículo (obligatoria)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    // Formato básico: 1234-ABC, C-1234-BC o similar
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.len() < 5 || clean_plate.len() > 10 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
