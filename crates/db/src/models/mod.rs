//! Row models and DTOs, one module per table.

pub mod character;
pub mod hall_of_fame;
pub mod prompt;
pub mod session;
pub mod trope;
pub mod user;
