//! Type-tagged unique identifier generator.

use chrono::Utc;
use uuid::Uuid;

/// Generate a unique, roughly time-ordered identifier for an entity type.
///
/// Layout: `{prefix}{unix_seconds}_{uuid4_hex}` where `prefix` is the first
/// three characters of `type_tag`, lowercased. The 128-bit random suffix
/// carries the collision resistance; the timestamp only makes ids sort
/// roughly by creation time. Ids generated within the same second still
/// differ in the suffix.
#[must_use]
pub fn gen_unique_id(type_tag: &str) -> String {
    let prefix: String = type_tag
        .chars()
        .take(3)
        .flat_map(char::to_lowercase)
        .collect();
    let ts = Utc::now().timestamp();
    let suffix = Uuid::new_v4().simple();
    format!("{prefix}{ts}_{suffix}")
}
