//! ISSN checksum engine
//!
//! Mod-11 weighted checksum as published for ISSN: the seven leading digits are
//! weighted 8 down to 2, the check value is `11 - (sum % 11)` with 11 folded to
//! `0` and 10 written as `X`.

use crate::domain::IssnError;

/// Number of characters in a dashless ISSN.
pub const ISSN_LEN: usize = 8;

/// Number of characters the check digit is computed over.
pub const PREFIX_LEN: usize = ISSN_LEN - 1;

/// Removes every `-` from the input.
pub fn strip_dashes(s: &str) -> String {
    s.replace('-', "")
}

/// Computes the check digit for a 7 character prefix.
pub fn compute_check_digit(prefix: &str) -> Result<char, IssnError> {
    if prefix.chars().count() != PREFIX_LEN {
        return Err(IssnError::InvalidLength {
            input: prefix.to_string(),
            expected: PREFIX_LEN,
        });
    }

    let mut sum = 0u32;
    for (c, weight) in prefix.chars().zip((2..=8).rev()) {
        let digit = c.to_digit(10).ok_or(IssnError::InvalidDigit(c))?;
        sum += digit * weight;
    }

    Ok(match sum % 11 {
        0 => '0',
        1 => 'X',
        rem => char::from_digit(11 - rem, 10).unwrap_or('0'),
    })
}

/// Tells whether the last character of an ISSN matches its check digit.
///
/// Dashes are ignored. The comparison is case-sensitive, a lowercase `x` never
/// validates.
pub fn is_valid(issn: &str) -> Result<bool, IssnError> {
    let stripped = strip_dashes(issn);
    if stripped.chars().count() != ISSN_LEN {
        return Err(IssnError::InvalidLength {
            input: stripped,
            expected: ISSN_LEN,
        });
    }

    let prefix: String = stripped.chars().take(PREFIX_LEN).collect();
    let check = compute_check_digit(&prefix)?;
    Ok(stripped.chars().last() == Some(check))
}

/// Brings an ISSN into the dashed, uppercase `NNNN-NNNC` form.
///
/// Accepts 8 characters without a dash or 9 characters with a dash after the
/// fourth one. The content itself is not checked.
pub fn normalize(issn: &str) -> Result<String, IssnError> {
    let upper = issn.to_uppercase();
    let chars: Vec<char> = upper.chars().collect();

    match chars.len() {
        ISSN_LEN => {
            let (head, tail) = chars.split_at(4);
            Ok(format!(
                "{}-{}",
                head.iter().collect::<String>(),
                tail.iter().collect::<String>()
            ))
        }
        9 if chars[4] == '-' => Ok(upper),
        _ => Err(IssnError::Normalization(issn.to_string())),
    }
}

/// Completes a 7 character prefix into a dashed ISSN.
pub fn complete(prefix: &str) -> Result<String, IssnError> {
    let check = compute_check_digit(prefix)?;
    normalize(&format!("{}{}", prefix, check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_check_digits() {
        assert_eq!(compute_check_digit("2347671"), Ok('0'));
        assert_eq!(compute_check_digit("0003566"), Ok('1'));
        assert_eq!(compute_check_digit("0003200"), Ok('X'));
        assert_eq!(compute_check_digit("4444222"), Ok('X'));
        assert_eq!(compute_check_digit("0378595"), Ok('5'));
    }

    #[test]
    fn test_check_digit_is_deterministic() {
        for prefix in ["1234567", "0000000", "9999999", "0317847"] {
            let first = compute_check_digit(prefix).unwrap();
            for _ in 0..3 {
                assert_eq!(compute_check_digit(prefix).unwrap(), first);
            }
        }
    }

    #[test]
    fn test_check_digit_rejects_wrong_length() {
        for prefix in ["", "123456", "12345678", "1234-567"] {
            assert!(matches!(
                compute_check_digit(prefix),
                Err(IssnError::InvalidLength { expected: 7, .. })
            ));
        }
    }

    #[test]
    fn test_check_digit_rejects_non_digits() {
        assert_eq!(
            compute_check_digit("12a4567"),
            Err(IssnError::InvalidDigit('a'))
        );
    }

    #[test]
    fn test_is_valid() {
        assert_eq!(is_valid("1234-5678"), Ok(false));
        assert_eq!(is_valid("1234-5679"), Ok(true));
        assert_eq!(is_valid("12345679"), Ok(true));
        assert_eq!(is_valid("0003-200X"), Ok(true));
        assert_eq!(is_valid("0003-200x"), Ok(false));
        assert_eq!(is_valid("0003-5661"), Ok(true));
        assert_eq!(is_valid("0003-5660"), Ok(false));
    }

    #[test]
    fn test_is_valid_rejects_wrong_length() {
        for issn in ["1234-567", "123456789", "", "1234--5679X"] {
            assert!(matches!(
                is_valid(issn),
                Err(IssnError::InvalidLength { expected: 8, .. })
            ));
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("12345679").unwrap(), "1234-5679");
        assert_eq!(normalize("0003200x").unwrap(), "0003-200X");
        assert_eq!(normalize("1234-5679").unwrap(), "1234-5679");
        assert!(matches!(
            normalize("123-45679"),
            Err(IssnError::Normalization(_))
        ));
        assert!(matches!(normalize("1234567"), Err(IssnError::Normalization(_))));
    }

    #[test]
    fn test_normalize_round_trip() {
        for issn in ["12345679", "0003200X", "23476710", "00035661"] {
            let dashed = normalize(issn).unwrap();
            assert_eq!(strip_dashes(&dashed), issn);
        }
    }

    #[test]
    fn test_complete() {
        assert_eq!(complete("4444222").unwrap(), "4444-222X");
        assert_eq!(complete("2347671").unwrap(), "2347-6710");
    }
}
