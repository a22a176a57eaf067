//! One-off administration tasks for a Cyarika database.

pub mod admin;
pub mod defaults;
