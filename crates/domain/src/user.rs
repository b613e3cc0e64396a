//! Fixture users and permission groups.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A named set of permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name.
    pub name: String,
    /// Permission codenames granted to members.
    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl Group {
    /// Creates a group without permissions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: BTreeSet::new(),
        }
    }

    /// Grants a permission to the group.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }
}

/// A user that tests can log in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUser {
    /// Unique username.
    pub username: String,
    /// Plain-text password, for form logins against a live server.
    pub password: String,
    /// Inactive users cannot log in and hold no permissions.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Staff users may access admin pages.
    #[serde(default)]
    pub is_staff: bool,
    /// Superusers implicitly hold every permission.
    #[serde(default)]
    pub is_superuser: bool,
    /// Directly granted permission codenames.
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    /// Names of groups the user belongs to.
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

const fn default_active() -> bool {
    true
}

impl TestUser {
    /// Creates an active, unprivileged user.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            permissions: BTreeSet::new(),
            groups: BTreeSet::new(),
        }
    }

    /// Marks the user as staff.
    #[must_use]
    pub const fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Marks the user as superuser (and staff).
    #[must_use]
    pub const fn superuser(mut self) -> Self {
        self.is_staff = true;
        self.is_superuser = true;
        self
    }

    /// Marks the user as inactive.
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Grants a permission directly.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Adds the user to a group.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Checks a permission, taking superuser status and group membership
    /// into account. `groups` is the set of known groups.
    #[must_use]
    pub fn has_perm(&self, permission: &str, groups: &[Group]) -> bool {
        if !self.is_active {
            return false;
        }
        if self.is_superuser || self.permissions.contains(permission) {
            return true;
        }
        groups
            .iter()
            .filter(|group| self.groups.contains(&group.name))
            .any(|group| group.permissions.contains(permission))
    }

    /// Every permission the user holds directly or through a group.
    #[must_use]
    pub fn all_permissions(&self, groups: &[Group]) -> BTreeSet<String> {
        let mut permissions = self.permissions.clone();
        for group in groups.iter().filter(|g| self.groups.contains(&g.name)) {
            permissions.extend(group.permissions.iter().cloned());
        }
        permissions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_direct_permission() {
        let user = TestUser::new("alice", "pw").with_permission("view_report");
        assert!(user.has_perm("view_report", &[]));
        assert!(!user.has_perm("delete_report", &[]));
    }

    #[test]
    fn test_group_permission() {
        let editors = Group::new("editors").with_permission("change_page");
        let user = TestUser::new("bob", "pw").with_group("editors");
        assert!(user.has_perm("change_page", std::slice::from_ref(&editors)));
        assert_eq!(
            user.all_permissions(&[editors]),
            BTreeSet::from(["change_page".to_string()])
        );
    }

    #[test]
    fn test_superuser_and_inactive() {
        let root = TestUser::new("root", "pw").superuser();
        assert!(root.is_staff);
        assert!(root.has_perm("anything", &[]));

        let ghost = TestUser::new("ghost", "pw").with_permission("x").inactive();
        assert!(!ghost.has_perm("x", &[]));
    }
}
