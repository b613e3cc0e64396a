//! User repository port
//!
//! Storage for fixture users and groups.

use expanse_domain::{Group, TestUser};

/// Repository trait for test users and permission groups.
pub trait UserRepository {
    /// Looks up a user by username.
    fn get_user(&self, username: &str) -> Option<TestUser>;

    /// Inserts or replaces a user.
    fn save_user(&mut self, user: TestUser);

    /// Looks up a group by name.
    fn get_group(&self, name: &str) -> Option<Group>;

    /// Inserts or replaces a group.
    fn save_group(&mut self, group: Group);

    /// Returns every known group.
    fn groups(&self) -> Vec<Group>;
}
