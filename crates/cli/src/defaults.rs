//! Bundled default prompts and tropes.

use anyhow::Context;
use cyarika_core::prompts::normalize_category;
use cyarika_db::models::prompt::CreatePrompt;
use cyarika_db::models::trope::CreateTrope;
use cyarika_db::repositories::{PromptRepo, TropeRepo};
use sqlx::PgPool;

const PROMPTS_JSON: &str = include_str!("../defaults/prompts.json");
const TROPES_JSON: &str = include_str!("../defaults/tropes.json");

pub struct Defaults {
    pub prompts: Vec<CreatePrompt>,
    pub tropes: Vec<CreateTrope>,
}

impl Defaults {
    /// Parse the bundled catalogues, normalising categories.
    pub fn bundled() -> anyhow::Result<Self> {
        let mut prompts: Vec<CreatePrompt> =
            serde_json::from_str(PROMPTS_JSON).context("bundled prompts.json is invalid")?;
        let mut tropes: Vec<CreateTrope> =
            serde_json::from_str(TROPES_JSON).context("bundled tropes.json is invalid")?;

        for prompt in &mut prompts {
            prompt.category = normalize_category(&prompt.category);
        }
        for trope in &mut tropes {
            trope.category = normalize_category(&trope.category);
        }
        Ok(Self { prompts, tropes })
    }
}

/// How many rows an import actually added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportCounts {
    pub prompts: usize,
    pub tropes: usize,
}

/// Insert every default not already present. Safe to run repeatedly.
pub async fn import(pool: &PgPool, defaults: &Defaults) -> anyhow::Result<ImportCounts> {
    let mut counts = ImportCounts::default();

    for prompt in &defaults.prompts {
        if PromptRepo::insert_if_absent(pool, prompt)
            .await
            .context("failed to insert prompt")?
        {
            counts.prompts += 1;
        }
    }
    for trope in &defaults.tropes {
        if TropeRepo::insert_if_absent(pool, trope)
            .await
            .with_context(|| format!("failed to insert trope '{}'", trope.name))?
        {
            counts.tropes += 1;
        }
    }

    tracing::info!(
        prompts = counts.prompts,
        tropes = counts.tropes,
        "Imported defaults"
    );
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_parse() {
        let defaults = Defaults::bundled().unwrap();
        assert!(!defaults.prompts.is_empty());
        assert!(!defaults.tropes.is_empty());
        assert!(defaults
            .prompts
            .iter()
            .all(|p| p.category == normalize_category(&p.category)));
    }
}
