use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Wire value for a program that accepts applications year-round.
pub const OPEN_ALL_YEAR: &str = "Open All Year";

/// Priority values accepted by validation. Extend this list to admit a new
/// level; the wire format stays a plain string.
pub const PRIORITY_LEVELS: &[&str] = &["High", "Medium", "Low"];

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid regex"));

/// Strict `YYYY-MM-DD`: rejects `2026-3-5`, `+2026-03-30` and surrounding
/// whitespace, which chrono's `%Y-%m-%d` alone lets through.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    if !ISO_DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// A single funding opportunity (e.g. "AWS Activate" from Amazon Web Services).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantRecord {
    /// Display name, e.g. "Y Combinator W26 Batch"
    pub program_name: String,
    /// Organization offering the grant
    pub provider: String,
    /// Free-text geographic scope, e.g. "Global", "India"
    pub country: String,
    /// Comma-separated sector tags, e.g. "AI, Web3, SaaS"
    pub sector_focus: String,
    /// Free-text category: grant, equity, credits, debt
    pub funding_type: String,
    /// Free-text amount or range, currency-mixed
    pub funding_amount: String,
    pub eligibility_summary: String,
    pub deadline: Deadline,
    /// URL, or an instruction when no direct URL exists
    pub application_link: String,
    /// Documents to prepare, in presentation order
    pub required_documents: Vec<String>,
    pub effort_level: EffortLevel,
    /// 0..=100
    pub relevance_score: u8,
    pub priority: Priority,
}

impl GrantRecord {
    /// Sector tags split on commas, trimmed, blanks dropped.
    pub fn sector_tags(&self) -> impl Iterator<Item = &str> {
        self.sector_focus
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    /// The application link when it is an actual http(s) URL.
    pub fn application_url(&self) -> Option<&str> {
        let link = self.application_link.trim();
        (link.starts_with("https://") || link.starts_with("http://")).then_some(link)
    }
}

/// Either a fixed calendar date or the "Open All Year" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Deadline {
    OpenAllYear,
    Date(NaiveDate),
}

impl Deadline {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Deadline::OpenAllYear => None,
            Deadline::Date(date) => Some(*date),
        }
    }

    pub fn is_open_all_year(&self) -> bool {
        matches!(self, Deadline::OpenAllYear)
    }
}

impl FromStr for Deadline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == OPEN_ALL_YEAR {
            return Ok(Deadline::OpenAllYear);
        }
        parse_iso_date(s)
            .map(Deadline::Date)
            .ok_or_else(|| {
                format!("deadline '{s}' is neither '{OPEN_ALL_YEAR}' nor a YYYY-MM-DD date")
            })
    }
}

impl TryFrom<String> for Deadline {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Deadline> for String {
    fn from(deadline: Deadline) -> Self {
        deadline.to_string()
    }
}

impl fmt::Display for Deadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deadline::OpenAllYear => f.write_str(OPEN_ALL_YEAR),
            Deadline::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Qualitative estimate of applicant effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

impl EffortLevel {
    pub const ALL: [EffortLevel; 3] = [EffortLevel::Low, EffortLevel::Medium, EffortLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffortLevel::Low => "Low",
            EffortLevel::Medium => "Medium",
            EffortLevel::High => "High",
        }
    }
}

impl FromStr for EffortLevel {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffortLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown effort level '{s}' (expected Low, Medium or High)"))
    }
}

impl fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-backed priority. Deserialization accepts any string so that an
/// unlisted level surfaces as a validation error naming the record, not as
/// an opaque serde failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(String);

impl Priority {
    pub fn high() -> Self {
        Priority("High".to_string())
    }

    pub fn medium() -> Self {
        Priority("Medium".to_string())
    }

    pub fn low() -> Self {
        Priority("Low".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        PRIORITY_LEVELS.contains(&self.0.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    /// Case-insensitive against `PRIORITY_LEVELS`; yields the canonical spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PRIORITY_LEVELS
            .iter()
            .find(|level| level.eq_ignore_ascii_case(s.trim()))
            .map(|level| Priority(level.to_string()))
            .ok_or_else(|| {
                format!(
                    "unknown priority '{s}' (expected one of {})",
                    PRIORITY_LEVELS.join(", ")
                )
            })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
