//! Subscription tiers and the authenticated session principal.
//!
//! Tier and status strings must match the CHECK constraints in
//! `20250101000002_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const TIER_FREE: &str = "free";
pub const TIER_RP: &str = "rp";

pub const STATUS_NONE: &str = "none";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PAST_DUE: &str = "past_due";
pub const STATUS_CANCELED: &str = "canceled";

/// All valid subscription status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_NONE, STATUS_ACTIVE, STATUS_PAST_DUE, STATUS_CANCELED];

/// Paid access level mirrored from the external billing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Rp,
}

impl SubscriptionTier {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionTier::Free => TIER_FREE,
            SubscriptionTier::Rp => TIER_RP,
        }
    }

    /// The tier a user actually gets: a lapsed `rp` subscription grants `free`.
    pub fn effective(tier: &str, status: &str) -> Self {
        match (tier, status) {
            (TIER_RP, STATUS_ACTIVE) => SubscriptionTier::Rp,
            _ => SubscriptionTier::Free,
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            TIER_FREE => Ok(SubscriptionTier::Free),
            TIER_RP => Ok(SubscriptionTier::Rp),
            other => Err(CoreError::validation(format!(
                "Unknown subscription tier '{other}'"
            ))),
        }
    }
}

/// Validate a subscription status string.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "Unknown subscription status '{status}'"
        )))
    }
}

/// The authenticated caller, decoded once at the authentication boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: DbId,
    pub is_admin: bool,
    pub subscription_tier: SubscriptionTier,
}

impl Principal {
    /// RP-tier features are open to RP subscribers and admins.
    pub fn has_rp_access(&self) -> bool {
        self.is_admin || self.subscription_tier == SubscriptionTier::Rp
    }

    /// Whether this principal may read or modify a row owned by `owner_id`.
    pub fn can_access(&self, owner_id: DbId) -> bool {
        self.is_admin || self.id == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lapsed_rp_subscription_is_free() {
        assert_eq!(SubscriptionTier::effective("rp", "active"), SubscriptionTier::Rp);
        assert_eq!(SubscriptionTier::effective("rp", "past_due"), SubscriptionTier::Free);
        assert_eq!(SubscriptionTier::effective("free", "active"), SubscriptionTier::Free);
    }

    #[test]
    fn parses_known_tiers_only() {
        assert_eq!("rp".parse::<SubscriptionTier>().unwrap(), SubscriptionTier::Rp);
        assert!("gold".parse::<SubscriptionTier>().is_err());
    }

    #[test]
    fn admin_has_rp_access_and_owns_everything() {
        let admin = Principal {
            id: 1,
            is_admin: true,
            subscription_tier: SubscriptionTier::Free,
        };
        assert!(admin.has_rp_access());
        assert!(admin.can_access(99));

        let user = Principal {
            id: 2,
            is_admin: false,
            subscription_tier: SubscriptionTier::Free,
        };
        assert!(!user.has_rp_access());
        assert!(user.can_access(2));
        assert!(!user.can_access(3));
    }

    #[test]
    fn status_validation() {
        assert!(validate_status("canceled").is_ok());
        assert!(validate_status("cancelled").is_err());
    }
}
