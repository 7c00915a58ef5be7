use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Reads all lines, with surrounding whitespace trimmed.
pub fn from_reader<R: BufRead>(r: R) -> io::Result<Vec<String>> {
    r.lines()
        .map(|line| line.map(|l| l.trim().to_string()))
        .collect()
}

pub fn from_file(path: &Path) -> io::Result<Vec<String>> {
    let f = std::fs::File::open(path)?;
    from_reader(BufReader::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_trims() {
        let lines = from_reader(" 0003-200X \r\n1234-5679\n\n".as_bytes()).unwrap();
        assert_eq!(lines, vec!["0003-200X", "1234-5679", ""]);
    }
}
