//! Validators for Brazilian tax identifiers and contact fields.
//!
//! All functions are pure; callers turn a `false` into a field-specific
//! validation error.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{2}\)\s\d{4,5}-\d{4}$").expect("phone regex"));

const CNPJ_WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

fn digits_of(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// `11 - (sum mod 11)`, with 10 and 11 folded to 0
fn check_digit(digits: &[u32], weights: impl Iterator<Item = u32>) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let digit = 11 - (sum % 11);
    if digit >= 10 {
        0
    } else {
        digit
    }
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// CPF check: 11 digits after stripping punctuation, two weighted check digits.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits = digits_of(cpf);
    if digits.len() != 11 || all_same(&digits) {
        return false;
    }

    let first = check_digit(&digits[..9], (2..=10).rev());
    let second = check_digit(&digits[..10], (2..=11).rev());

    digits[9] == first && digits[10] == second
}

/// CNPJ check: 14 digits after stripping punctuation, two weighted check digits.
pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let digits = digits_of(cnpj);
    if digits.len() != 14 || all_same(&digits) {
        return false;
    }

    let first = check_digit(&digits[..12], CNPJ_WEIGHTS_FIRST.iter().copied());
    let second = check_digit(&digits[..13], CNPJ_WEIGHTS_SECOND.iter().copied());

    digits[12] == first && digits[13] == second
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Accepts `(DD) DDDD-DDDD` and `(DD) DDDDD-DDDD`
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpf_reference_vectors() {
        for cpf in [
            "529.982.247-25",
            "52998224725",
            "111.444.777-35",
            "123.456.789-09",
            "390.533.447-05",
            "935.411.347-80",
        ] {
            assert!(is_valid_cpf(cpf), "{} should be valid", cpf);
        }
    }

    #[test]
    fn test_cpf_rejects_bad_input() {
        assert!(!is_valid_cpf("529.982.247-24"));
        assert!(!is_valid_cpf("529.982.247-15"));
        assert!(!is_valid_cpf("1234567890"));
        assert!(!is_valid_cpf("123456789012"));
        assert!(!is_valid_cpf(""));
        for d in 0..=9 {
            let repeated = d.to_string().repeat(11);
            assert!(!is_valid_cpf(&repeated), "{} must be rejected", repeated);
        }
    }

    #[test]
    fn test_cnpj_reference_vectors() {
        for cnpj in [
            "11.222.333/0001-81",
            "11222333000181",
            "11.444.777/0001-61",
            "45.997.418/0001-53",
            "04.252.011/0001-10",
            "33.000.167/0001-01",
        ] {
            assert!(is_valid_cnpj(cnpj), "{} should be valid", cnpj);
        }
    }

    #[test]
    fn test_cnpj_rejects_bad_input() {
        assert!(!is_valid_cnpj("11.222.333/0001-80"));
        assert!(!is_valid_cnpj("00.000.000/0000-00"));
        assert!(!is_valid_cnpj("112223330001"));
        assert!(!is_valid_cnpj("52998224725"));
    }

    #[test]
    fn test_email() {
        assert!(is_valid_email("contato@empresa.com.br"));
        assert!(is_valid_email("joao.silva+crm@mail.co"));
        assert!(!is_valid_email("joao@empresa"));
        assert!(!is_valid_email("joao@empresa.c"));
        assert!(!is_valid_email("joão@empresa.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("(11) 8765-4321"));
        assert!(!is_valid_phone("11987654321"));
        assert!(!is_valid_phone("(11)98765-4321"));
        assert!(!is_valid_phone("(11) 987654-4321"));
        assert!(!is_valid_phone("(11) 98765-432"));
    }
}
