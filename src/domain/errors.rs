//! Domain error types
//!
//! Failures of the ISSN checksum engine. These carry the offending input so the
//! command-line tools can print them as is.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssnError {
    /// Input does not have the number of characters the operation needs
    InvalidLength { input: String, expected: usize },
    /// Input cannot be brought into the dashed `NNNN-NNNC` form
    Normalization(String),
    /// A character that must be a decimal digit is not
    InvalidDigit(char),
}

impl fmt::Display for IssnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssnError::InvalidLength { input, expected: 7 } => {
                write!(f, "seven digits required: {}", input)
            }
            IssnError::InvalidLength { input, .. } => write!(f, "invalid issn: {}", input),
            IssnError::Normalization(s) => write!(f, "cannot normalize: {}", s),
            IssnError::InvalidDigit(c) => write!(f, "invalid digit: {:?}", c),
        }
    }
}

impl std::error::Error for IssnError {}
