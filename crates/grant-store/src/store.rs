/// Read-only, ordered grant catalog.
///
/// Built once (from the embedded catalog or an external script) and never
/// mutated afterwards. Cloning shares the same records.
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::model::GrantRecord;
use crate::parser;
use crate::validate;

/// The authored catalog, compiled into the binary.
pub const EMBEDDED_CATALOG: &str = include_str!("../data/grants.js");

#[derive(Debug, Clone)]
pub struct GrantStore {
    records: Arc<[GrantRecord]>,
}

impl GrantStore {
    /// Load the embedded catalog.
    pub fn load() -> Result<Self, StoreError> {
        Self::from_script(EMBEDDED_CATALOG)
    }

    /// Load a catalog from script text.
    pub fn from_script(content: &str) -> Result<Self, StoreError> {
        let records = parser::parse_grants_script(content)?;
        for name in validate::duplicate_names(&records) {
            warn!(program_name = %name, "duplicate program name in catalog");
        }
        Ok(Self {
            records: records.into(),
        })
    }

    /// Load a catalog script from disk.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_script(&content)?;
        info!(path = %path.display(), records = store.len(), "loaded grant catalog from file");
        Ok(store)
    }

    pub fn records(&self) -> &[GrantRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GrantRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get_by_index(&self, index: usize) -> Result<&GrantRecord, StoreError> {
        self.records.get(index).ok_or(StoreError::OutOfRange {
            index,
            len: self.records.len(),
        })
    }

    /// Lazily yield records matching `predicate`, in catalog order. Each call
    /// starts a fresh pass.
    pub fn filter_by<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a GrantRecord> + 'a
    where
        P: Fn(&GrantRecord) -> bool + 'a,
    {
        self.records.iter().filter(move |&record| predicate(record))
    }

    /// First record whose name matches, ignoring case.
    pub fn find_by_name(&self, program_name: &str) -> Option<(usize, &GrantRecord)> {
        let wanted = program_name.trim();
        self.records
            .iter()
            .enumerate()
            .find(|(_, r)| r.program_name.eq_ignore_ascii_case(wanted))
    }

    /// Hex SHA-256 over the canonical JSON form of the catalog.
    pub fn fingerprint(&self) -> Result<String, StoreError> {
        let mut hasher = Sha256::new();
        for record in self.records.iter() {
            let json =
                serde_json::to_vec(record).map_err(|e| StoreError::Serialize(e.to_string()))?;
            hasher.update(&json);
            hasher.update(b"\n");
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}

impl<'a> IntoIterator for &'a GrantStore {
    type Item = &'a GrantRecord;
    type IntoIter = std::slice::Iter<'a, GrantRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Deadline, EffortLevel, PRIORITY_LEVELS};

    fn store() -> GrantStore {
        GrantStore::load().expect("embedded catalog should load")
    }

    #[test]
    fn embedded_catalog_has_eight_records() {
        let store = store();
        assert_eq!(store.len(), 8);
        assert!(!store.is_empty());
    }

    #[test]
    fn first_record_is_google_cloud() {
        let store = store();
        let first = store.get_by_index(0).unwrap();
        assert_eq!(first.program_name, "Google for Startups Cloud Program");
        assert_eq!(first.relevance_score, 98);
        assert_eq!(first.deadline, Deadline::OpenAllYear);
    }

    #[test]
    fn fourth_record_is_elevate_nxt() {
        let store = store();
        let elevate = store.get_by_index(3).unwrap();
        assert_eq!(elevate.program_name, "ELEVATE NXT 2026");
        assert_eq!(elevate.required_documents.len(), 4);
        assert_eq!(elevate.funding_amount, "Up to \u{20b9}1 Crore");
        assert_eq!(elevate.deadline.to_string(), "2026-02-17");
    }

    #[test]
    fn index_past_end_is_out_of_range() {
        let store = store();
        match store.get_by_index(8) {
            Err(StoreError::OutOfRange { index, len }) => {
                assert_eq!(index, 8);
                assert_eq!(len, 8);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
        assert!(store.get_by_index(usize::MAX).is_err());
    }

    #[test]
    fn every_record_meets_invariants() {
        for (index, record) in store().iter().enumerate() {
            assert!(
                EffortLevel::ALL.contains(&record.effort_level),
                "record {index}: bad effort"
            );
            assert!(
                PRIORITY_LEVELS.contains(&record.priority.as_str()),
                "record {index}: bad priority"
            );
            assert!(
                ["High", "Medium"].contains(&record.priority.as_str()),
                "record {index}: priority '{}' not seen before in the authored catalog",
                record.priority
            );
            assert!(!record.required_documents.is_empty(), "record {index}: no documents");
            assert!(record.relevance_score <= 100, "record {index}: score out of range");

            let wire = record.deadline.to_string();
            assert!(
                wire == "Open All Year" || crate::model::parse_iso_date(&wire).is_some(),
                "record {index}: bad deadline {wire}"
            );
        }
    }

    #[test]
    fn every_record_serializes_all_fields() {
        const FIELDS: [&str; 13] = [
            "program_name",
            "provider",
            "country",
            "sector_focus",
            "funding_type",
            "funding_amount",
            "eligibility_summary",
            "deadline",
            "application_link",
            "required_documents",
            "effort_level",
            "relevance_score",
            "priority",
        ];
        for record in store().iter() {
            let value = serde_json::to_value(record).unwrap();
            let object = value.as_object().unwrap();
            assert_eq!(object.len(), FIELDS.len());
            for field in FIELDS {
                assert!(object.contains_key(field), "missing {field}");
            }
            assert!(object["relevance_score"].is_u64());
            assert!(object["required_documents"].is_array());
        }
    }

    #[test]
    fn authored_order_is_preserved() {
        let store = store();
        let names: Vec<&str> = store.iter().map(|r| r.program_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Google for Startups Cloud Program",
                "NVIDIA Inception Program",
                "Y Combinator W26 Batch",
                "ELEVATE NXT 2026",
                "HDFC Parivartan Start-up Grants 2026",
                "Startup India Seed Fund Scheme (SISFS)",
                "Microsoft for Startups Founders Hub",
                "AWS Activate",
            ]
        );
    }

    #[test]
    fn loading_twice_is_identical() {
        let a = store();
        let b = store();
        assert_eq!(a.len(), b.len());
        assert_eq!(a.records(), b.records());
        let fingerprint = a.fingerprint().unwrap();
        assert_eq!(fingerprint, b.fingerprint().unwrap());
        assert_eq!(fingerprint.len(), 64);
    }

    #[test]
    fn filter_by_is_lazy_and_restartable() {
        let store = store();
        let open = |r: &GrantRecord| r.deadline.is_open_all_year();

        let first: Vec<&str> = store.filter_by(open).map(|r| r.program_name.as_str()).collect();
        let second: Vec<&str> = store.filter_by(open).map(|r| r.program_name.as_str()).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert_eq!(first[0], "Google for Startups Cloud Program");

        assert_eq!(store.filter_by(|_| false).count(), 0);
        assert_eq!(store.filter_by(|_| true).count(), store.len());
    }

    #[test]
    fn find_by_name_ignores_case() {
        let store = store();
        let (index, record) = store.find_by_name("aws activate").unwrap();
        assert_eq!(index, 7);
        assert_eq!(record.provider, "Amazon Web Services");
        assert!(store.find_by_name("Sequoia Arc").is_none());
    }

    #[test]
    fn schema_violation_aborts_load() {
        let content = EMBEDDED_CATALOG.replacen(
            r#""effort_level": "Low""#,
            r#""effort_level": "None""#,
            1,
        );
        match GrantStore::from_script(&content) {
            Err(StoreError::SchemaViolation { index, .. }) => assert_eq!(index, 0),
            other => panic!("expected schema violation, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_do_not_fail_the_load() {
        let store = store();
        let aws = store.get_by_index(7).unwrap().clone();
        let mut shouted = aws.clone();
        shouted.program_name = "AWS ACTIVATE".to_string();

        let script = parser::render_grants_script(&[aws, shouted]).unwrap();
        let loaded = GrantStore::from_script(&script).expect("duplicates are only warned about");
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.find_by_name("aws activate").map(|(i, _)| i), Some(0));
        assert_eq!(validate::duplicate_names(loaded.records()), vec!["AWS ACTIVATE"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = GrantStore::from_path(Path::new("/nonexistent/grants.js")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GrantStore>();

        let store = store();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.fingerprint().unwrap())
            })
            .collect();
        let expected = store.fingerprint().unwrap();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
