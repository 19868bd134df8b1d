use chrono::NaiveDate;

use crate::model::{EffortLevel, GrantRecord, Priority};

/// Conjunctive record predicate for [`GrantStore::filter_by`].
///
/// Unset criteria match everything, so `GrantFilter::default()` selects the
/// whole catalog. Text criteria compare case-insensitively.
///
/// [`GrantStore::filter_by`]: crate::store::GrantStore::filter_by
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantFilter {
    /// Substring of `country`
    pub country: Option<String>,
    /// Exact match against one of the sector tags
    pub sector: Option<String>,
    /// Substring of `funding_type`
    pub funding_type: Option<String>,
    pub effort: Option<EffortLevel>,
    pub priority: Option<Priority>,
    pub min_relevance: Option<u8>,
    /// `true` keeps only year-round programs, `false` only dated ones
    pub open_all_year: Option<bool>,
    /// Keeps dated deadlines on or before this day; year-round programs never match
    pub deadline_on_or_before: Option<NaiveDate>,
}

impl GrantFilter {
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn funding_type(mut self, funding_type: impl Into<String>) -> Self {
        self.funding_type = Some(funding_type.into());
        self
    }

    pub fn effort(mut self, effort: EffortLevel) -> Self {
        self.effort = Some(effort);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn min_relevance(mut self, score: u8) -> Self {
        self.min_relevance = Some(score);
        self
    }

    pub fn open_all_year(mut self, open: bool) -> Self {
        self.open_all_year = Some(open);
        self
    }

    pub fn deadline_on_or_before(mut self, date: NaiveDate) -> Self {
        self.deadline_on_or_before = Some(date);
        self
    }

    pub fn matches(&self, record: &GrantRecord) -> bool {
        if let Some(country) = &self.country {
            if !contains_ignore_case(&record.country, country) {
                return false;
            }
        }

        if let Some(sector) = &self.sector {
            let wanted = sector.trim();
            if !record.sector_tags().any(|tag| tag.eq_ignore_ascii_case(wanted)) {
                return false;
            }
        }

        if let Some(funding_type) = &self.funding_type {
            if !contains_ignore_case(&record.funding_type, funding_type) {
                return false;
            }
        }

        if self.effort.is_some_and(|effort| effort != record.effort_level) {
            return false;
        }

        if self
            .priority
            .as_ref()
            .is_some_and(|priority| *priority != record.priority)
        {
            return false;
        }

        if self
            .min_relevance
            .is_some_and(|min| record.relevance_score < min)
        {
            return false;
        }

        if self
            .open_all_year
            .is_some_and(|open| open != record.deadline.is_open_all_year())
        {
            return false;
        }

        if let Some(cutoff) = self.deadline_on_or_before {
            match record.deadline.date() {
                Some(date) if date <= cutoff => {}
                _ => return false,
            }
        }

        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(&needle.trim().to_lowercase())
}
