pub mod admin;
pub mod auth;
pub mod characters;
pub mod hall_of_fame;
pub mod messages;
pub mod prompts;
pub mod tropes;
