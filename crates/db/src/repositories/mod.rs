//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod character_repo;
pub mod hall_of_fame_repo;
pub mod prompt_repo;
pub mod session_repo;
pub mod trope_repo;
pub mod user_repo;

pub use character_repo::CharacterRepo;
pub use hall_of_fame_repo::HallOfFameRepo;
pub use prompt_repo::PromptRepo;
pub use session_repo::SessionRepo;
pub use trope_repo::TropeRepo;
pub use user_repo::UserRepo;

use cyarika_core::prompts::CatalogSort;

/// `ORDER BY` clause for a catalogue listing; `label` is the column sorted
/// alphabetically. Every clause ends in `id` so pagination is stable.
pub(crate) fn catalog_order(sort: CatalogSort, label: &str) -> String {
    match sort {
        CatalogSort::Popular => "use_count DESC, id ASC".to_string(),
        CatalogSort::Recent => "created_at DESC, id DESC".to_string(),
        CatalogSort::Alphabetical => format!("{label} ASC, id ASC"),
    }
}
