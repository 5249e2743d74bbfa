//! Unique test data so tests sharing one app never collide.

use uuid::Uuid;

/// A valid nick: `{prefix}_{12 hex chars}`.
///
/// ```
/// use tab_test_support::unique_helpers::unique_nick;
///
/// let a = unique_nick("alice");
/// let b = unique_nick("alice");
/// assert_ne!(a, b);
/// assert!(a.starts_with("alice_"));
/// ```
pub fn unique_nick(prefix: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &id[..12])
}
