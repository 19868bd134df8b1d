use std::collections::HashMap;

use crate::error::StoreError;
use crate::model::{GrantRecord, PRIORITY_LEVELS};

pub const MAX_RELEVANCE_SCORE: u8 = 100;

/// Check the invariants serde typing cannot express.
///
/// `index` is the record's position in the catalog and is only used for
/// error reporting.
pub fn validate_record(index: usize, record: &GrantRecord) -> Result<(), StoreError> {
    let program = Some(record.program_name.as_str());

    if record.program_name.trim().is_empty() {
        return Err(StoreError::schema(index, None, "program_name must not be blank"));
    }

    if record.required_documents.is_empty() {
        return Err(StoreError::schema(
            index,
            program,
            "required_documents must list at least one document",
        ));
    }

    if record.relevance_score > MAX_RELEVANCE_SCORE {
        return Err(StoreError::schema(
            index,
            program,
            format!(
                "relevance_score {} exceeds {MAX_RELEVANCE_SCORE}",
                record.relevance_score
            ),
        ));
    }

    if !record.priority.is_known() {
        return Err(StoreError::schema(
            index,
            program,
            format!(
                "priority '{}' is not one of {}",
                record.priority,
                PRIORITY_LEVELS.join(", ")
            ),
        ));
    }

    Ok(())
}

/// Program names that occur more than once, compared case-insensitively.
/// Returned in order of first appearance.
pub fn duplicate_names(records: &[GrantRecord]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for record in records {
        let key = record.program_name.trim().to_lowercase();
        let count = seen.entry(key).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(record.program_name.clone());
        }
    }

    duplicates
}
