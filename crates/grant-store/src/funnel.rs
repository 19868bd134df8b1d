/// Heuristic extraction of a draft grant record from pasted text
/// (announcement emails, program pages).
///
/// Labelled lines such as `Program: ...`, `Amount: ...`, `Deadline: ...` are
/// picked up with regexes; everything else falls back to placeholder values.
/// Drafts are never added to a store.
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::StoreError;
use crate::model::{Deadline, EffortLevel, GrantRecord, Priority};
use crate::validate::validate_record;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Grant Name|Program|Title):?\s*(.+)").expect("valid regex")
});
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:Amount|Funding|Value):?\s*(.+)").expect("valid regex"));
static DEADLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Deadline|Due Date|Apply by):?\s*(.+)").expect("valid regex")
});
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://\S+)").expect("valid regex"));

const DEADLINE_FORMATS: &[&str] = &["%Y-%m-%d", "%d %B %Y", "%B %d, %Y", "%B %d %Y", "%d/%m/%Y"];

const DRAFT_DEFAULT_RELEVANCE: u8 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantDraft {
    pub record: GrantRecord,
    /// Deadline text that was found but could not be read as a date
    pub unparsed_deadline: Option<String>,
}

pub fn extract_draft(raw_text: &str) -> Result<GrantDraft, StoreError> {
    if raw_text.trim().is_empty() {
        return Err(StoreError::EmptyInput);
    }

    let program_name = capture(&NAME_RE, raw_text).unwrap_or("Unknown Grant Program");
    let funding_amount = capture(&AMOUNT_RE, raw_text).unwrap_or("Unknown Amount");
    let application_link = capture(&LINK_RE, raw_text).unwrap_or("#");

    let (deadline, unparsed_deadline) = match capture(&DEADLINE_RE, raw_text) {
        Some(text) => match parse_loose_date(text) {
            Some(date) => (Deadline::Date(date), None),
            None => (Deadline::OpenAllYear, Some(text.to_string())),
        },
        None => (Deadline::OpenAllYear, None),
    };

    let record = GrantRecord {
        program_name: program_name.to_string(),
        provider: "External Source (Funnel)".to_string(),
        country: "Unknown".to_string(),
        sector_focus: "General".to_string(),
        funding_type: "Grant/Other".to_string(),
        funding_amount: funding_amount.to_string(),
        eligibility_summary: "See details.".to_string(),
        deadline,
        application_link: application_link.to_string(),
        required_documents: vec!["Check website".to_string()],
        effort_level: EffortLevel::Medium,
        relevance_score: DRAFT_DEFAULT_RELEVANCE,
        priority: Priority::medium(),
    };
    validate_record(0, &record)?;

    debug!(
        program_name = %record.program_name,
        deadline = %record.deadline,
        unparsed_deadline = unparsed_deadline.is_some(),
        "extracted grant draft"
    );

    Ok(GrantDraft {
        record,
        unparsed_deadline,
    })
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn parse_loose_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.trim().trim_end_matches(['.', ',', ';']);
    DEADLINE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cleaned, format).ok())
}
