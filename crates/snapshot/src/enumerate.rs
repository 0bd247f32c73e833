//! Deterministic member enumeration.

use rollcall_common::{GroupRef, MemberRecord, SystemError};

use crate::platform::{MemberFetchError, MemberSource};

/// Resolve a group reference into its deterministically ordered member
/// sequence. Two enumerations of the same underlying membership yield
/// identical sequences.
pub async fn enumerate_members(
    source: &dyn MemberSource,
    group: &GroupRef,
) -> Result<Vec<MemberRecord>, SystemError> {
    let mut members = source.members_of(group).await.map_err(fetch_to_system)?;
    sort_members(&mut members);
    Ok(members)
}

pub(crate) fn fetch_to_system(err: MemberFetchError) -> SystemError {
    match err {
        MemberFetchError::AccessMissing => SystemError::MemberAccessMissing,
        MemberFetchError::Upstream(source) => SystemError::EnumerationFailed(source),
    }
}

/// Case-insensitive display-name order; equal keys keep platform order.
pub fn sort_members(members: &mut [MemberRecord]) {
    members.sort_by_cached_key(|m| m.display_name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> MemberRecord {
        MemberRecord {
            id: id.to_string(),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_sort_is_case_insensitive() {
        let mut members = vec![
            record("1", "charlie"),
            record("2", "Alice"),
            record("3", "bob"),
        ];
        sort_members(&mut members);
        let names: Vec<_> = members.iter().map(|m| m.display_name.as_str()).collect();
        assert_eq!(names, ["Alice", "bob", "charlie"]);
    }

    #[test]
    fn test_sort_ties_keep_original_order() {
        let mut members = vec![
            record("1", "Echo"),
            record("2", "echo"),
            record("3", "ECHO"),
        ];
        sort_members(&mut members);
        let ids: Vec<_> = members.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_sort_is_stable_across_repeats() {
        let original = vec![
            record("9", "Zoe"),
            record("4", "anna"),
            record("7", "Anna"),
            record("2", "mike"),
        ];
        let mut first = original.clone();
        sort_members(&mut first);
        let mut second = original;
        sort_members(&mut second);
        assert_eq!(first, second);
    }
}
