pub mod mapping;
pub mod portal;
pub mod registry;
