//! CNPJ handling: punctuation stripping and length checks.

use super::error::AuditError;

/// Number of digits in a CNPJ.
pub const CNPJ_LEN: usize = 14;

/// Keep only ASCII digits (`"11.222.333/0001-44"` → `"11222333000144"`).
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strip punctuation from a CNPJ and require exactly 14 digits.
pub fn normalize_cnpj(value: &str) -> Result<String, AuditError> {
    let digits = digits_only(value);
    if digits.len() != CNPJ_LEN {
        return Err(AuditError::Config(format!(
            "CNPJ '{value}' must contain exactly {CNPJ_LEN} digits, found {}",
            digits.len()
        )));
    }
    Ok(digits)
}

/// Format a 14-digit CNPJ as `NN.NNN.NNN/NNNN-NN`; other inputs are returned unchanged.
pub fn format_cnpj(value: &str) -> String {
    let d = digits_only(value);
    if d.len() != CNPJ_LEN {
        return value.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &d[0..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..14]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation() {
        assert_eq!(digits_only("11.222.333/0001-44"), "11222333000144");
        assert_eq!(digits_only("abc"), "");
    }

    #[test]
    fn normalize_accepts_any_formatting() {
        assert_eq!(normalize_cnpj(" 11.222.333/0001-44 ").unwrap(), "11222333000144");
        assert_eq!(normalize_cnpj("11222333000144").unwrap(), "11222333000144");
    }

    #[test]
    fn normalize_rejects_wrong_length() {
        assert!(matches!(normalize_cnpj("123"), Err(AuditError::Config(_))));
        assert!(normalize_cnpj("112223330001445").is_err());
        assert!(normalize_cnpj("").is_err());
    }

    #[test]
    fn format_round_trip() {
        assert_eq!(format_cnpj("11222333000144"), "11.222.333/0001-44");
        assert_eq!(format_cnpj("999"), "999");
    }
}
