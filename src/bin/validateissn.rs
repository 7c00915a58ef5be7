//! Checks ISSN, or completes 7 digit prefixes with their check digit.
//!
//!     $ validateissn 1234-5678 12345679 4444222
//!     1234-5678	false
//!     1234-5679	true
//!     4444222	4444-222X

use std::process::ExitCode;

use clap::Parser;
use issnlister::domain::check::{DEMO_ISSNS, check_all};
use issnlister::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "validateissn")]
#[command(about = "Validate ISSN or compute their check digit")]
#[command(version)]
struct Args {
    /// ISSN (with or without dash) or 7 digit prefixes; a demo list when empty
    issns: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing("validateissn=info");
    let args = Args::parse();

    let tokens: Vec<String> = if args.issns.is_empty() {
        DEMO_ISSNS.iter().map(|s| s.to_string()).collect()
    } else {
        args.issns
    };
    tracing::debug!("checking {} token(s)", tokens.len());

    let (rows, err) = check_all(&tokens);
    for row in rows {
        println!("{}", row);
    }

    // Errors are part of the regular output of this tool.
    match err {
        Some(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}
