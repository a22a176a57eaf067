//! Parsing of Tupperbox proxy-bot exports into character personas.
//!
//! Only the fields the platform uses are read; everything else in the export
//! (groups, message counts, birthdays) is ignored.

use std::collections::HashSet;

use serde::Deserialize;

use crate::character_sheet::{validate_name, validate_proxy_prefix};
use crate::error::CoreError;

/// Top-level shape of a Tupperbox `tuppers.json` export.
#[derive(Debug, Clone, Deserialize)]
pub struct TupperboxExport {
    #[serde(default)]
    pub tuppers: Vec<Tupper>,
}

/// One persona in the export.
#[derive(Debug, Clone, Deserialize)]
pub struct Tupper {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// `[prefix, suffix]` pairs, flattened. Only the first prefix is used.
    #[serde(default)]
    pub brackets: Vec<String>,
}

impl Tupper {
    /// The first non-blank bracket prefix, if it is usable as a proxy prefix.
    pub fn proxy_prefix(&self) -> Option<&str> {
        self.brackets
            .first()
            .map(String::as_str)
            .filter(|p| validate_proxy_prefix(p).is_ok())
    }
}

/// Parse an uploaded export document.
pub fn parse_export(value: serde_json::Value) -> Result<TupperboxExport, CoreError> {
    serde_json::from_value(value)
        .map_err(|e| CoreError::validation(format!("Not a Tupperbox export: {e}")))
}

/// Which tuppers to create and which names to skip.
#[derive(Debug)]
pub struct ImportPlan<'a> {
    pub to_create: Vec<&'a Tupper>,
    pub skipped: Vec<String>,
}

/// Decide what to import given the owner's existing character names.
///
/// Names are compared case-insensitively; duplicates inside the export and
/// invalid names are skipped.
pub fn plan_import<'a>(export: &'a TupperboxExport, existing_names: &[String]) -> ImportPlan<'a> {
    let mut seen: HashSet<String> = existing_names.iter().map(|n| n.to_lowercase()).collect();
    let mut plan = ImportPlan {
        to_create: Vec::new(),
        skipped: Vec::new(),
    };

    for tupper in &export.tuppers {
        let key = tupper.name.trim().to_lowercase();
        if validate_name(&tupper.name).is_err() || !seen.insert(key) {
            plan.skipped.push(tupper.name.clone());
        } else {
            plan.to_create.push(tupper);
        }
    }
    plan
}
