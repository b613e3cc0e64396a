//! Fixture users use case.

use expanse_domain::{Group, TestUser};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::UserRepository;

/// Superuser fixture.
pub const SUPERUSER: &str = "test_superuser";
/// Staff fixture.
pub const ADMIN: &str = "test_admin";
/// Inactive fixture.
pub const INACTIVE: &str = "test_inactive";
/// Regular user fixture.
pub const USER: &str = "test_user";

/// Manages the users and groups tests log in with.
pub struct UserFixtures<U: UserRepository> {
    repository: U,
}

impl<U: UserRepository> UserFixtures<U> {
    /// Wraps a repository without adding users.
    #[must_use]
    pub const fn new(repository: U) -> Self {
        Self { repository }
    }

    /// Wraps a repository and seeds the default fixture users.
    #[must_use]
    pub fn seeded(repository: U, password: &str) -> Self {
        let mut fixtures = Self::new(repository);
        fixtures.seed_defaults(password);
        fixtures
    }

    /// Creates (or resets) `test_superuser`, `test_admin`, `test_inactive`
    /// and `test_user`, all sharing `password`.
    pub fn seed_defaults(&mut self, password: &str) {
        self.repository
            .save_user(TestUser::new(SUPERUSER, password).superuser());
        self.repository.save_user(TestUser::new(ADMIN, password).staff());
        self.repository
            .save_user(TestUser::new(INACTIVE, password).inactive());
        self.repository.save_user(TestUser::new(USER, password));
        tracing::debug!(target: "expanse::users", "seeded default users");
    }

    /// Returns the underlying repository.
    #[must_use]
    pub const fn repository(&self) -> &U {
        &self.repository
    }

    /// Returns the underlying repository mutably.
    pub fn repository_mut(&mut self) -> &mut U {
        &mut self.repository
    }

    /// Looks up a user.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` if the user does not exist.
    pub fn get_user(&self, username: &str) -> ApplicationResult<TestUser> {
        self.repository
            .get_user(username)
            .ok_or_else(|| ApplicationError::NotFound(format!("user '{username}'")))
    }

    /// Adds or replaces a user.
    pub fn add_user(&mut self, user: TestUser) {
        self.repository.save_user(user);
    }

    /// Grants a permission to a user.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` if the user does not exist.
    pub fn add_user_permission(
        &mut self,
        permission: &str,
        username: &str,
    ) -> ApplicationResult<TestUser> {
        let user = self.get_user(username)?.with_permission(permission);
        self.repository.save_user(user.clone());
        tracing::debug!(target: "expanse::users", %username, %permission, "granted permission");
        Ok(user)
    }

    /// Adds a user to an existing group.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` if the user or the group does
    /// not exist.
    pub fn add_user_group(&mut self, group: &str, username: &str) -> ApplicationResult<TestUser> {
        if self.repository.get_group(group).is_none() {
            return Err(ApplicationError::NotFound(format!("group '{group}'")));
        }
        let user = self.get_user(username)?.with_group(group);
        self.repository.save_user(user.clone());
        tracing::debug!(target: "expanse::users", %username, %group, "added to group");
        Ok(user)
    }

    /// Creates (or replaces) a group with the given permissions.
    pub fn create_group<I, P>(&mut self, name: &str, permissions: I) -> Group
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let group = permissions
            .into_iter()
            .fold(Group::new(name), |group, permission| group.with_permission(permission));
        self.repository.save_group(group.clone());
        group
    }

    /// Checks a permission for a user, including group permissions.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` if the user does not exist.
    pub fn has_perm(&self, username: &str, permission: &str) -> ApplicationResult<bool> {
        let user = self.get_user(username)?;
        Ok(user.has_perm(permission, &self.repository.groups()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Store {
        users: BTreeMap<String, TestUser>,
        groups: BTreeMap<String, Group>,
    }

    impl UserRepository for Store {
        fn get_user(&self, username: &str) -> Option<TestUser> {
            self.users.get(username).cloned()
        }

        fn save_user(&mut self, user: TestUser) {
            self.users.insert(user.username.clone(), user);
        }

        fn get_group(&self, name: &str) -> Option<Group> {
            self.groups.get(name).cloned()
        }

        fn save_group(&mut self, group: Group) {
            self.groups.insert(group.name.clone(), group);
        }

        fn groups(&self) -> Vec<Group> {
            self.groups.values().cloned().collect()
        }
    }

    #[test]
    fn test_default_fixtures() {
        let fixtures = UserFixtures::seeded(Store::default(), "secret");

        let root = fixtures.get_user(SUPERUSER).unwrap();
        assert!(root.is_superuser && root.is_staff);
        assert!(fixtures.get_user(ADMIN).unwrap().is_staff);
        assert!(!fixtures.get_user(INACTIVE).unwrap().is_active);

        let user = fixtures.get_user(USER).unwrap();
        assert_eq!(user.password, "secret");
        assert!(!user.is_staff);
    }

    #[test]
    fn test_add_permission() {
        let mut fixtures = UserFixtures::seeded(Store::default(), "pw");
        assert!(!fixtures.has_perm(USER, "reports.view_report").unwrap());

        fixtures.add_user_permission("reports.view_report", USER).unwrap();
        assert!(fixtures.has_perm(USER, "reports.view_report").unwrap());

        let err = fixtures.add_user_permission("x", "ghost").unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
    }

    #[test]
    fn test_groups() {
        let mut fixtures = UserFixtures::seeded(Store::default(), "pw");
        let err = fixtures.add_user_group("editors", USER).unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));

        let group = fixtures.create_group("editors", ["pages.change_page"]);
        assert_eq!(group.permissions.len(), 1);

        let user = fixtures.add_user_group("editors", USER).unwrap();
        assert!(user.groups.contains("editors"));
        assert!(fixtures.has_perm(USER, "pages.change_page").unwrap());
        assert!(!fixtures.has_perm(INACTIVE, "pages.change_page").unwrap());
    }
}
