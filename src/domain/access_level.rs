//! Access level tiers and the authorization decision.
//!
//! Levels are totally ordered by rank: `Basic < Manager < Admin`. A level
//! satisfies a requirement iff its rank is greater than or equal to the
//! requirement's rank.

use serde::{Deserialize, Serialize};

use super::token::TokenPayload;

/// Ordered access tier attached to every user and embedded in session tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum AccessLevel {
    Basic = 1,
    Manager = 2,
    Admin = 3,
}

/// Rejected numeric access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("level access is wrong: {0} is outside 1..=3")]
pub struct InvalidAccessLevel(pub i16);

impl AccessLevel {
    /// Numeric rank of this level.
    pub fn rank(self) -> i16 {
        self as i16
    }

    /// Whether this level meets `required`.
    pub fn satisfies(self, required: AccessLevel) -> bool {
        self.rank() >= required.rank()
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        AccessLevel::Basic
    }
}

impl TryFrom<i16> for AccessLevel {
    type Error = InvalidAccessLevel;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AccessLevel::Basic),
            2 => Ok(AccessLevel::Manager),
            3 => Ok(AccessLevel::Admin),
            other => Err(InvalidAccessLevel(other)),
        }
    }
}

impl From<AccessLevel> for i16 {
    fn from(level: AccessLevel) -> Self {
        level.rank()
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessLevel::Basic => write!(f, "basic"),
            AccessLevel::Manager => write!(f, "manager"),
            AccessLevel::Admin => write!(f, "admin"),
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Decide whether a verified token grants `required`.
///
/// Operates only on the token snapshot; the store is never consulted.
pub fn authorize(payload: &TokenPayload, required: AccessLevel) -> Decision {
    if payload.access_level.satisfies(required) {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    const LEVELS: [AccessLevel; 3] = [AccessLevel::Basic, AccessLevel::Manager, AccessLevel::Admin];

    fn payload_with(level: AccessLevel) -> TokenPayload {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TokenPayload::new(7, level, now, Duration::hours(1)).unwrap()
    }

    #[test]
    fn test_authorize_all_combinations() {
        for held in LEVELS {
            for required in LEVELS {
                let decision = authorize(&payload_with(held), required);
                let expected = if held.rank() >= required.rank() {
                    Decision::Allow
                } else {
                    Decision::Deny
                };
                assert_eq!(decision, expected, "held={held} required={required}");
            }
        }
    }

    #[test]
    fn test_levels_are_ordered() {
        assert!(AccessLevel::Basic < AccessLevel::Manager);
        assert!(AccessLevel::Manager < AccessLevel::Admin);
        assert!(AccessLevel::Admin.satisfies(AccessLevel::Basic));
        assert!(!AccessLevel::Basic.satisfies(AccessLevel::Manager));
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(AccessLevel::try_from(1), Ok(AccessLevel::Basic));
        assert_eq!(AccessLevel::try_from(3), Ok(AccessLevel::Admin));
        assert_eq!(AccessLevel::try_from(0), Err(InvalidAccessLevel(0)));
        assert_eq!(AccessLevel::try_from(4), Err(InvalidAccessLevel(4)));
        assert_eq!(AccessLevel::try_from(-1), Err(InvalidAccessLevel(-1)));
    }

    #[test]
    fn test_serde_uses_numeric_rank() {
        assert_eq!(serde_json::to_string(&AccessLevel::Manager).unwrap(), "2");
        assert_eq!(
            serde_json::from_str::<AccessLevel>("3").unwrap(),
            AccessLevel::Admin
        );
        assert!(serde_json::from_str::<AccessLevel>("9").is_err());
    }
}
