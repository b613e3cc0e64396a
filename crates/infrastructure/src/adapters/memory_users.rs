//! In-memory user repository.

use std::collections::BTreeMap;

use expanse_application::ports::UserRepository;
use expanse_domain::{Group, TestUser};

/// Keeps users and groups in ordered maps for the lifetime of a test.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: BTreeMap<String, TestUser>,
    groups: BTreeMap<String, Group>,
}

impl MemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }

    /// Usernames in sorted order.
    #[must_use]
    pub fn usernames(&self) -> Vec<&str> {
        self.users.keys().map(String::as_str).collect()
    }
}

impl UserRepository for MemoryUserRepository {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_replaces() {
        let mut repo = MemoryUserRepository::new();
        repo.save_user(TestUser::new("b", "pw"));
        repo.save_user(TestUser::new("a", "pw"));
        repo.save_user(TestUser::new("a", "pw").staff());

        assert_eq!(repo.usernames(), vec!["a", "b"]);
        assert!(repo.get_user("a").unwrap().is_staff);
        assert!(repo.get_user("c").is_none());
    }

    #[test]
    fn test_groups() {
        let mut repo = MemoryUserRepository::new();
        repo.save_group(Group::new("editors").with_permission("change_page"));
        assert_eq!(repo.groups().len(), 1);
        assert!(repo.get_group("editors").unwrap().permissions.contains("change_page"));
    }
}
