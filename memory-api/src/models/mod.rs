pub mod error;
pub mod memory;
