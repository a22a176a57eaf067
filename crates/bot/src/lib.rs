//! Discord bot for Cyarika: the Hall-of-Fame star gate, prefix commands and
//! character proxying.

pub mod commands;
pub mod config;
pub mod error;
pub mod handler;
pub mod mirror;
pub mod proxy;
pub mod star_gate;

/// Discord snowflakes are stored as Postgres `BIGINT`.
pub fn db_id(id: u64) -> i64 {
    id as i64
}
