//! Built-in user profiles.
//!
//! The board has no real authentication: picking a profile is the whole
//! login story. Profiles are fixed at compile time and never created or
//! destroyed at runtime; each one maps to a role that decides visibility
//! and edit rights.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fields::Role;
use crate::storage::Storage;

/// A selectable profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// The fixed profile set, in selection-menu order.
pub fn profiles() -> Vec<User> {
    let user = |id: &str, name: &str, role| User {
        id: id.to_string(),
        name: name.to_string(),
        role,
    };
    vec![
        user("ava", "Ava Chen", Role::Admin),
        user("marcus", "Marcus Reed", Role::Manager),
        user("priya", "Priya Sharma", Role::MarketingLead),
        user("tom", "Tom Baker", Role::Member),
    ]
}

/// Whether a role may create, change, or delete tasks.
pub fn role_can_edit(role: Role) -> bool {
    !matches!(role, Role::Member)
}

/// Resolve a profile by id, or by name case-insensitively.
pub fn resolve_user(identifier: &str) -> Result<User> {
    let wanted = identifier.trim();
    profiles()
        .into_iter()
        .find(|u| u.id == wanted || u.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| Error::UnknownUser(wanted.to_string()))
}

/// Pick the profile whose snapshot was touched most recently, falling back
/// to the first profile. Used when the CLI is invoked without `--user`.
pub fn most_recent_user(storage: &Storage) -> User {
    let mut best: Option<(User, std::time::SystemTime)> = None;
    for user in profiles() {
        let path = storage.snapshot_path(&user.id);
        if let Ok(modified) = std::fs::metadata(&path).and_then(|m| m.modified()) {
            match &best {
                Some((_, current)) if modified <= *current => {}
                _ => best = Some((user, modified)),
            }
        }
    }
    best.map(|(user, _)| user)
        .unwrap_or_else(|| profiles().remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_id_and_by_name_case_insensitively() {
        assert_eq!(resolve_user("priya").unwrap().role, Role::MarketingLead);
        assert_eq!(resolve_user("ava chen").unwrap().id, "ava");
        assert_eq!(resolve_user(" Tom Baker ").unwrap().id, "tom");
        assert!(matches!(resolve_user("nobody"), Err(Error::UnknownUser(_))));
    }

    #[test]
    fn only_members_are_read_only() {
        assert!(role_can_edit(Role::Admin));
        assert!(role_can_edit(Role::Manager));
        assert!(role_can_edit(Role::MarketingLead));
        assert!(!role_can_edit(Role::Member));
    }
}
