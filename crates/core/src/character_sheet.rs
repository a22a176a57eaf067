//! Character sheet rules: ability modifiers, check targets and validation.

use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Score assigned to every ability when a sheet is created without one.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

/// Lowest and highest ability score accepted.
pub const MIN_ABILITY_SCORE: i32 = 1;
pub const MAX_ABILITY_SCORE: i32 = 50;

/// Maximum character name length.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum proxy prefix length.
pub const MAX_PROXY_PREFIX_LENGTH: usize = 32;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }
}

impl FromStr for Ability {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Strength),
            "dex" | "dexterity" => Ok(Ability::Dexterity),
            "con" | "constitution" => Ok(Ability::Constitution),
            "int" | "intelligence" => Ok(Ability::Intelligence),
            "wis" | "wisdom" => Ok(Ability::Wisdom),
            "cha" | "charisma" => Ok(Ability::Charisma),
            other => Err(CoreError::validation(format!("Unknown ability '{other}'"))),
        }
    }
}

/// Saving throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Save {
    Fortitude,
    Reflex,
    Will,
}

impl Save {
    pub fn name(self) -> &'static str {
        match self {
            Save::Fortitude => "fortitude",
            Save::Reflex => "reflex",
            Save::Will => "will",
        }
    }
}

impl FromStr for Save {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fort" | "fortitude" => Ok(Save::Fortitude),
            "ref" | "reflex" => Ok(Save::Reflex),
            "will" => Ok(Save::Will),
            other => Err(CoreError::validation(format!("Unknown save '{other}'"))),
        }
    }
}

/// What a `!roll <character> <target>` check rolls against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckTarget {
    Ability(Ability),
    Save(Save),
    Skill(String),
}

impl CheckTarget {
    /// Abilities and saves take priority; anything else is a skill name.
    pub fn parse(s: &str) -> Self {
        if let Ok(ability) = s.parse::<Ability>() {
            CheckTarget::Ability(ability)
        } else if let Ok(save) = s.parse::<Save>() {
            CheckTarget::Save(save)
        } else {
            CheckTarget::Skill(s.to_string())
        }
    }
}

/// Standard d20 ability modifier: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Raw ability scores of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }

    /// Modifiers for all six abilities, in [`Ability::ALL`] order.
    pub fn modifiers(&self) -> AbilityModifiers {
        AbilityModifiers {
            strength: self.modifier(Ability::Strength),
            dexterity: self.modifier(Ability::Dexterity),
            constitution: self.modifier(Ability::Constitution),
            intelligence: self.modifier(Ability::Intelligence),
            wisdom: self.modifier(Ability::Wisdom),
            charisma: self.modifier(Ability::Charisma),
        }
    }

    /// Check every score is within the accepted range.
    pub fn validate(&self) -> Result<(), CoreError> {
        for ability in Ability::ALL {
            validate_score(ability.name(), self.score(ability))?;
        }
        Ok(())
    }
}

/// Derived modifiers, serialized alongside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AbilityModifiers {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

/// Look up a skill bonus by case-insensitive name in a `skills` JSON map.
///
/// Non-integer values are ignored.
pub fn find_skill(skills: &serde_json::Value, name: &str) -> Option<i32> {
    skills
        .as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.as_i64())
        .and_then(|v| i32::try_from(v).ok())
}

/// Validate a character name (non-empty, at most [`MAX_NAME_LENGTH`] chars).
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("Character name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::validation(format!(
            "Character name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate one ability score.
pub fn validate_score(field: &str, score: i32) -> Result<(), CoreError> {
    if !(MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE).contains(&score) {
        return Err(CoreError::validation(format!(
            "{field} must be between {MIN_ABILITY_SCORE} and {MAX_ABILITY_SCORE}, got {score}"
        )));
    }
    Ok(())
}

/// Validate a proxy prefix such as `v:` or `[Vex]`.
pub fn validate_proxy_prefix(prefix: &str) -> Result<(), CoreError> {
    if prefix.trim().is_empty() {
        return Err(CoreError::validation("Proxy prefix must not be blank"));
    }
    if prefix.chars().count() > MAX_PROXY_PREFIX_LENGTH {
        return Err(CoreError::validation(format!(
            "Proxy prefix must be at most {MAX_PROXY_PREFIX_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate that `skills` is a JSON object of integer bonuses.
pub fn validate_skills(skills: &serde_json::Value) -> Result<(), CoreError> {
    let map = skills
        .as_object()
        .ok_or_else(|| CoreError::validation("skills must be an object"))?;
    for (name, value) in map {
        if value.as_i64().is_none() {
            return Err(CoreError::validation(format!(
                "Skill '{name}' must have an integer bonus"
            )));
        }
    }
    Ok(())
}

/// Validate that `value` is a JSON array of strings (feats, abilities).
pub fn validate_string_list(field: &str, value: &serde_json::Value) -> Result<(), CoreError> {
    let items = value
        .as_array()
        .ok_or_else(|| CoreError::validation(format!("{field} must be an array")))?;
    if items.iter().any(|item| !item.is_string()) {
        return Err(CoreError::validation(format!(
            "{field} must contain only strings"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn modifiers_round_toward_negative_infinity() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(12), 1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(18), 4);
    }

    #[test]
    fn check_target_prefers_abilities_and_saves() {
        assert_eq!(CheckTarget::parse("DEX"), CheckTarget::Ability(Ability::Dexterity));
        assert_eq!(CheckTarget::parse("will"), CheckTarget::Save(Save::Will));
        assert_eq!(
            CheckTarget::parse("Stealth"),
            CheckTarget::Skill("Stealth".to_string())
        );
    }

    #[test]
    fn skill_lookup_is_case_insensitive() {
        let skills = json!({"Stealth": 7, "Perception": "high"});
        assert_eq!(find_skill(&skills, "stealth"), Some(7));
        assert_eq!(find_skill(&skills, "perception"), None);
        assert_eq!(find_skill(&skills, "diplomacy"), None);
    }

    #[test]
    fn score_validation_bounds() {
        let mut scores = AbilityScores {
            strength: 10,
            dexterity: 14,
            constitution: 12,
            intelligence: 8,
            wisdom: 13,
            charisma: 50,
        };
        assert!(scores.validate().is_ok());
        scores.charisma = 51;
        assert!(scores.validate().is_err());
    }

    #[test]
    fn json_shape_validation() {
        assert!(validate_skills(&json!({"Climb": 3})).is_ok());
        assert!(validate_skills(&json!(["Climb"])).is_err());
        assert!(validate_string_list("feats", &json!(["Power Attack"])).is_ok());
        assert!(validate_string_list("feats", &json!([1])).is_err());
    }

    #[test]
    fn name_and_prefix_validation() {
        assert!(validate_name("Vex").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_proxy_prefix("v:").is_ok());
        assert!(validate_proxy_prefix(" ").is_err());
    }
}
