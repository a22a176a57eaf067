//! Character sheet model and DTOs.

use cyarika_core::character_sheet::{find_skill, AbilityScores, CheckTarget, Save};
use cyarika_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `character_sheets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterSheet {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    pub hp_current: i32,
    pub hp_max: i32,
    pub armor_class: i32,
    pub fortitude_save: i32,
    pub reflex_save: i32,
    pub will_save: i32,
    /// Object of skill name -> integer bonus.
    pub skills: serde_json::Value,
    /// Array of strings.
    pub feats: serde_json::Value,
    /// Array of strings.
    pub abilities: serde_json::Value,
    pub pathcompanion_id: Option<String>,
    pub proxy_prefix: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CharacterSheet {
    pub fn ability_scores(&self) -> AbilityScores {
        AbilityScores {
            strength: self.strength,
            dexterity: self.dexterity,
            constitution: self.constitution,
            intelligence: self.intelligence,
            wisdom: self.wisdom,
            charisma: self.charisma,
        }
    }

    pub fn save_bonus(&self, save: Save) -> i32 {
        match save {
            Save::Fortitude => self.fortitude_save,
            Save::Reflex => self.reflex_save,
            Save::Will => self.will_save,
        }
    }

    /// Modifier added to a d20 for the given check, or `None` for an unknown skill.
    pub fn check_modifier(&self, target: &CheckTarget) -> Option<i32> {
        match target {
            CheckTarget::Ability(ability) => Some(self.ability_scores().modifier(*ability)),
            CheckTarget::Save(save) => Some(self.save_bonus(*save)),
            CheckTarget::Skill(name) => find_skill(&self.skills, name),
        }
    }
}

/// DTO for creating a character sheet. Omitted scores default to 10.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCharacterSheet {
    pub name: String,
    pub strength: Option<i32>,
    pub dexterity: Option<i32>,
    pub constitution: Option<i32>,
    pub intelligence: Option<i32>,
    pub wisdom: Option<i32>,
    pub charisma: Option<i32>,
    pub hp_current: Option<i32>,
    pub hp_max: Option<i32>,
    pub armor_class: Option<i32>,
    pub fortitude_save: Option<i32>,
    pub reflex_save: Option<i32>,
    pub will_save: Option<i32>,
    pub skills: Option<serde_json::Value>,
    pub feats: Option<serde_json::Value>,
    pub abilities: Option<serde_json::Value>,
    pub pathcompanion_id: Option<String>,
    pub proxy_prefix: Option<String>,
    pub avatar_url: Option<String>,
}

/// DTO for updating a character sheet. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCharacterSheet {
    pub name: Option<String>,
    pub strength: Option<i32>,
    pub dexterity: Option<i32>,
    pub constitution: Option<i32>,
    pub intelligence: Option<i32>,
    pub wisdom: Option<i32>,
    pub charisma: Option<i32>,
    pub hp_current: Option<i32>,
    pub hp_max: Option<i32>,
    pub armor_class: Option<i32>,
    pub fortitude_save: Option<i32>,
    pub reflex_save: Option<i32>,
    pub will_save: Option<i32>,
    pub skills: Option<serde_json::Value>,
    pub feats: Option<serde_json::Value>,
    pub abilities: Option<serde_json::Value>,
    pub pathcompanion_id: Option<String>,
    pub proxy_prefix: Option<String>,
    pub avatar_url: Option<String>,
}
