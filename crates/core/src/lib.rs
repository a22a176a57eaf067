//! Domain types and pure logic shared by the Cyarika API, bot and CLI.
//!
//! Nothing in this crate performs I/O; persistence lives in `cyarika-db`.

pub mod accounts;
pub mod character_sheet;
pub mod dice;
pub mod error;
pub mod export;
pub mod hall_of_fame;
pub mod pagination;
pub mod prompts;
pub mod roles;
pub mod tupperbox;
pub mod types;
