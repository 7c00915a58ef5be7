//! Domain layer - ISSN arithmetic
//!
//! Pure functions over identifiers, no I/O.

pub mod check;
pub mod errors;
pub mod issn;

pub use errors::IssnError;
