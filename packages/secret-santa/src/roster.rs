//! Roster normalization ahead of assignment.

use std::collections::HashSet;

use crate::assignment::MIN_PARTICIPANTS;
use crate::error::{Result, SantaError};

/// Trim names, drop blanks, and reject duplicates or too-small rosters.
///
/// Duplicate detection is case-sensitive, on the trimmed name.
pub fn normalize_names<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>> {
    let names: Vec<String> = raw
        .iter()
        .map(|n| n.as_ref().trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect();

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(SantaError::DuplicateName { name: name.clone() });
        }
    }

    if names.len() < MIN_PARTICIPANTS {
        return Err(SantaError::InsufficientParticipants { count: names.len() });
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_drops_blank_entries() {
        let names = normalize_names(&[" Ann ", "", "Bo", "   ", "Cy\n"]).unwrap();
        assert_eq!(names, vec!["Ann", "Bo", "Cy"]);
    }

    #[test]
    fn test_rejects_duplicates_after_trim() {
        let err = normalize_names(&["Ann", "Bo", " Ann"]).unwrap_err();
        assert!(matches!(err, SantaError::DuplicateName { name } if name == "Ann"));
    }

    #[test]
    fn test_duplicates_are_case_sensitive() {
        let names = normalize_names(&["ann", "Ann", "ANN"]).unwrap();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_blank_entries_do_not_count() {
        let err = normalize_names(&["Ann", "Bo", "  "]).unwrap_err();
        assert!(matches!(err, SantaError::InsufficientParticipants { count: 2 }));
    }
}
