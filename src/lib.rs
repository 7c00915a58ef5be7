pub mod domain;
pub mod infrastructure;
pub mod modules;
pub mod utils;

pub use domain::issn::{compute_check_digit, is_valid, normalize};
pub use infrastructure::config;
pub use infrastructure::logging;
pub use modules::mapping;
pub use modules::portal;
pub use modules::registry;
