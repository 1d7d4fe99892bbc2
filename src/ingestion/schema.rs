//! Required-field validation and canonical column renaming.
//!
//! Rules:
//!
//! - Every field in [`REQUIRED_FIELDS`] must match some column
//!   case-insensitively (surrounding whitespace ignored); otherwise the whole
//!   table is rejected with the missing names listed.
//! - Matched columns are renamed to their canonical uppercase spelling.
//! - Columns outside the required set are preserved under their original
//!   names; downstream consumers may rely on them.

use tracing::debug;

use crate::error::{IngestError, IngestResult};
use crate::types::{RawTable, REQUIRED_FIELDS};

/// Validate required fields and canonicalize their column names.
///
/// Fails with [`IngestError::SchemaValidation`] naming every missing field;
/// no partially renamed table is ever produced. When a required field matches
/// more than one column, the first match is canonicalized and later
/// duplicates stay extras under their original names.
pub fn validate_columns(mut table: RawTable) -> IngestResult<RawTable> {
    let mut claimed = vec![false; table.columns.len()];
    let mut renames: Vec<(usize, &'static str)> = Vec::new();
    let mut missing: Vec<String> = Vec::new();

    for required in REQUIRED_FIELDS {
        let found = table
            .columns
            .iter()
            .enumerate()
            .position(|(idx, name)| !claimed[idx] && name.trim().to_uppercase() == required);
        match found {
            Some(idx) => {
                claimed[idx] = true;
                renames.push((idx, required));
            }
            None => missing.push(required.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(IngestError::SchemaValidation { missing });
    }

    for (idx, canonical) in renames {
        if table.columns[idx] != canonical {
            debug!(from = %table.columns[idx], to = canonical, "canonicalized column name");
            table.columns[idx] = canonical.to_string();
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(columns: &[&str]) -> RawTable {
        RawTable::new(columns.iter().map(|c| c.to_string()).collect(), Vec::new())
    }

    #[test]
    fn mixed_case_headers_validate_and_canonicalize() {
        let table = table_with(&["date", "Player", "SOURCE", "chest", "Score"]);
        let out = validate_columns(table).unwrap();
        assert_eq!(out.columns, REQUIRED_FIELDS);
    }

    #[test]
    fn extras_keep_their_original_names() {
        let table = table_with(&["DATE", "player", "SOURCE", "CHEST", "SCORE", "Clan"]);
        let out = validate_columns(table).unwrap();
        assert_eq!(out.columns[1], "PLAYER");
        assert_eq!(out.columns[5], "Clan");
    }

    #[test]
    fn missing_field_is_named_exactly() {
        let table = table_with(&["DATE", "PLAYER", "SOURCE", "SCORE"]);
        let err = validate_columns(table).unwrap_err();
        let IngestError::SchemaValidation { missing } = err else {
            panic!("expected SchemaValidation");
        };
        assert_eq!(missing, vec!["CHEST".to_string()]);
    }

    #[test]
    fn all_missing_fields_are_listed() {
        let err = validate_columns(table_with(&["DATE", "PLAYER"])).unwrap_err();
        let IngestError::SchemaValidation { missing } = err else {
            panic!("expected SchemaValidation");
        };
        assert_eq!(
            missing,
            vec!["SOURCE".to_string(), "CHEST".to_string(), "SCORE".to_string()]
        );
    }

    #[test]
    fn duplicate_headers_first_match_wins() {
        let table = table_with(&["date", "DATE", "PLAYER", "SOURCE", "CHEST", "SCORE"]);
        let out = validate_columns(table).unwrap();
        assert_eq!(out.columns[0], "DATE");
        // The later duplicate is untouched and stays an extra.
        assert_eq!(out.columns[1], "DATE");
    }

    #[test]
    fn surrounding_whitespace_is_ignored_for_matching() {
        let table = table_with(&[" date ", "PLAYER", "SOURCE", "CHEST", "SCORE"]);
        let out = validate_columns(table).unwrap();
        assert_eq!(out.columns[0], "DATE");
    }
}
