//! Row logic of the `validateissn` tool
//!
//! A token that is seven characters long once dashes are removed is completed
//! with its check digit, anything else is validated as a full ISSN.

use std::fmt;

use crate::domain::IssnError;
use crate::domain::issn::{self, PREFIX_LEN};

/// Checked when the tool is run without arguments.
pub const DEMO_ISSNS: [&str; 5] = [
    "2347-6710",
    "0378-5955",
    "0003-200X",
    "0003-5661",
    "0003-5660",
];

/// One output row of the checksum tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckRow {
    /// A prefix together with the full ISSN it completes to
    Completed { input: String, issn: String },
    /// A normalized ISSN and whether its check digit matches
    Validated { issn: String, valid: bool },
}

impl fmt::Display for CheckRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckRow::Completed { input, issn } => write!(f, "{}\t{}", input, issn),
            CheckRow::Validated { issn, valid } => write!(f, "{}\t{}", issn, valid),
        }
    }
}

pub fn check_token(token: &str) -> Result<CheckRow, IssnError> {
    let stripped = issn::strip_dashes(token);
    if stripped.chars().count() == PREFIX_LEN {
        return Ok(CheckRow::Completed {
            input: token.to_string(),
            issn: issn::complete(&stripped)?,
        });
    }

    let normalized = issn::normalize(token)?;
    let valid = issn::is_valid(token)?;
    Ok(CheckRow::Validated {
        issn: normalized,
        valid,
    })
}

/// Checks tokens in order, stopping at the first failure.
///
/// Rows produced before the failure are returned alongside the error.
pub fn check_all<I, S>(tokens: I) -> (Vec<CheckRow>, Option<IssnError>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut rows = Vec::new();
    for token in tokens {
        match check_token(token.as_ref()) {
            Ok(row) => rows.push(row),
            Err(e) => return (rows, Some(e)),
        }
    }
    (rows, None)
}
