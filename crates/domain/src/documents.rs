//! Brazilian taxpayer document validation (CPF and CNPJ check digits).
//!
//! Accepts formatted input (`111.444.777-35`, `11.222.333/0001-81`); anything
//! that is not a digit is stripped before validation.

/// Validates either document kind based on digit count (11 = CPF, 14 = CNPJ).
pub fn validate_document(input: &str) -> bool {
    let digits = strip_non_digits(input);
    match digits.len() {
        11 => validate_cpf_digits(&digits),
        14 => validate_cnpj_digits(&digits),
        _ => false,
    }
}

pub fn validate_cpf(input: &str) -> bool {
    let digits = strip_non_digits(input);
    digits.len() == 11 && validate_cpf_digits(&digits)
}

pub fn validate_cnpj(input: &str) -> bool {
    let digits = strip_non_digits(input);
    digits.len() == 14 && validate_cnpj_digits(&digits)
}

fn strip_non_digits(input: &str) -> Vec<u32> {
    input.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_digits_equal(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn validate_cpf_digits(digits: &[u32]) -> bool {
    // Sequences like 111.111.111-11 satisfy the check-digit math but are not
    // assignable documents.
    if all_digits_equal(digits) {
        return false;
    }

    let first = cpf_check_digit(&digits[..9], 10);
    let second = cpf_check_digit(&digits[..10], 11);

    first == digits[9] && second == digits[10]
}

fn cpf_check_digit(digits: &[u32], initial_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, digit)| digit * (initial_weight - i as u32))
        .sum();
    (sum * 10) % 11 % 10
}

fn validate_cnpj_digits(digits: &[u32]) -> bool {
    if all_digits_equal(digits) {
        return false;
    }

    const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let first = cnpj_check_digit(&digits[..12], &FIRST_WEIGHTS);
    let second = cnpj_check_digit(&digits[..13], &SECOND_WEIGHTS);

    first == digits[12] && second == digits[13]
}

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(digit, weight)| digit * weight)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_valid_cpf() {
        assert!(validate_cpf("11144477735"));
    }

    #[test]
    fn accepts_formatted_cpf() {
        assert!(validate_cpf("111.444.777-35"));
    }

    #[test]
    fn rejects_repeated_digit_cpf() {
        assert!(!validate_cpf("11111111111"));
        assert!(!validate_cpf("00000000000"));
    }

    #[test]
    fn rejects_cpf_with_wrong_check_digit() {
        assert!(!validate_cpf("11144477736"));
    }

    #[test]
    fn rejects_cpf_with_wrong_length() {
        assert!(!validate_cpf("1114447773"));
        assert!(!validate_cpf("111444777350"));
    }

    #[test]
    fn accepts_known_valid_cnpj() {
        assert!(validate_cnpj("11222333000181"));
        assert!(validate_cnpj("11.222.333/0001-81"));
    }

    #[test]
    fn rejects_repeated_digit_cnpj() {
        assert!(!validate_cnpj("11111111111111"));
    }

    #[test]
    fn rejects_cnpj_with_wrong_check_digit() {
        assert!(!validate_cnpj("11222333000182"));
    }

    #[test]
    fn validate_document_dispatches_by_length() {
        assert!(validate_document("11144477735"));
        assert!(validate_document("11222333000181"));
        assert!(!validate_document("123"));
    }
}
