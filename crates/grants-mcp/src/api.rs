use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use grant_store::model::GrantRecord;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetGrantParams {
    /// Zero-based position in the catalog.
    pub index: u32,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindGrantParams {
    /// Exact program name, case-insensitive, e.g. "AWS Activate".
    pub program_name: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct FilterGrantsParams {
    /// Substring of the country field, e.g. "India" or "Global".
    pub country: Option<String>,
    /// One sector tag, e.g. "AI" or "DeepTech".
    pub sector: Option<String>,
    /// Substring of the funding type, e.g. "Credits" or "Equity".
    pub funding_type: Option<String>,
    /// "Low", "Medium" or "High".
    pub effort_level: Option<String>,
    /// "High", "Medium" or "Low".
    pub priority: Option<String>,
    /// Minimum relevance score (0-100).
    pub min_relevance: Option<u8>,
    /// true for year-round programs only, false for dated deadlines only.
    pub open_all_year: Option<bool>,
    /// Only dated deadlines on or before this YYYY-MM-DD day.
    pub deadline_on_or_before: Option<String>,
    /// Maximum number of grants to return (default: 50, max: 100).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExtractDraftParams {
    /// Raw text of a grant email or program page.
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GrantDetail {
    /// Catalog position; absent for drafts.
    pub index: Option<usize>,
    pub program_name: String,
    pub provider: String,
    pub country: String,
    pub sector_focus: String,
    pub sector_tags: Vec<String>,
    pub funding_type: String,
    pub funding_amount: String,
    pub eligibility_summary: String,
    /// "Open All Year" or YYYY-MM-DD
    pub deadline: String,
    pub open_all_year: bool,
    pub application_link: String,
    /// Set when the application link is an http(s) URL.
    pub application_url: Option<String>,
    pub required_documents: Vec<String>,
    pub effort_level: String,
    pub relevance_score: u8,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GrantListResponse {
    pub total_matches: usize,
    pub grants: Vec<GrantDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GrantDraftResponse {
    pub draft: GrantDetail,
    /// Deadline text found in the input that could not be read as a date.
    pub unparsed_deadline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogInfoResponse {
    pub record_count: usize,
    /// Hex SHA-256 of the catalog contents.
    pub fingerprint: String,
    /// "embedded" or the GRANTS_FILE path.
    pub source: String,
    pub effort_levels: Vec<String>,
    pub priority_levels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CatalogExportResponse {
    pub record_count: usize,
    pub fingerprint: String,
    /// `window.grantsData = [...];`
    pub script: String,
}

pub fn to_api_grant(index: Option<usize>, record: &GrantRecord) -> GrantDetail {
    GrantDetail {
        index,
        program_name: record.program_name.clone(),
        provider: record.provider.clone(),
        country: record.country.clone(),
        sector_focus: record.sector_focus.clone(),
        sector_tags: record.sector_tags().map(str::to_string).collect(),
        funding_type: record.funding_type.clone(),
        funding_amount: record.funding_amount.clone(),
        eligibility_summary: record.eligibility_summary.clone(),
        deadline: record.deadline.to_string(),
        open_all_year: record.deadline.is_open_all_year(),
        application_link: record.application_link.clone(),
        application_url: record.application_url().map(str::to_string),
        required_documents: record.required_documents.clone(),
        effort_level: record.effort_level.to_string(),
        relevance_score: record.relevance_score,
        priority: record.priority.to_string(),
    }
}
