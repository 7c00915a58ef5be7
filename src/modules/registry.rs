//! Lookup of ISSN against a harvested list of registered ISSN.

use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, Write};

/// Answer for one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Not 8 characters after removing blanks and dashes
    Malformed(String),
    Registered(String),
    Unregistered(String),
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Malformed(s) => write!(f, "X\t{}", s),
            Lookup::Registered(s) => write!(f, "1\t{}", s),
            Lookup::Unregistered(s) => write!(f, "0\t{}", s),
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    issns: HashSet<String>,
}

impl Registry {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let issns = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self { issns }
    }

    pub fn len(&self) -> usize {
        self.issns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issns.is_empty()
    }

    pub fn lookup(&self, line: &str) -> Lookup {
        let cleaned: String = line
            .trim()
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();

        if cleaned.chars().count() != 8 {
            return Lookup::Malformed(cleaned);
        }

        let (head, tail) = cleaned.split_at(cleaned.char_indices().nth(4).map_or(4, |(i, _)| i));
        let issn = format!("{}-{}", head, tail);
        if self.issns.contains(&issn) {
            Lookup::Registered(issn)
        } else {
            Lookup::Unregistered(issn)
        }
    }

    /// Answers every line of `input` on its own line of `out`.
    pub fn check_all<R: BufRead, W: Write>(&self, input: R, mut out: W) -> std::io::Result<()> {
        for line in input.lines() {
            writeln!(out, "{}", self.lookup(&line?))?;
        }
        out.flush()
    }
}
