/// MCP server over the grant catalog.
///
/// Exposes read-only tools:
/// - `list_grants`: the whole catalog in authored order
/// - `get_grant`: one record by position
/// - `find_grant`: one record by program name
/// - `filter_grants`: records matching optional criteria
/// - `extract_grant_draft`: draft record from pasted text (never stored)
/// - `catalog_info`: size, fingerprint and accepted enum values
/// - `export_catalog`: the catalog as a `window.grantsData` script for front-ends
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::{debug, info};

use crate::api::{
    CatalogExportResponse, CatalogInfoResponse, ExtractDraftParams, FilterGrantsParams,
    FindGrantParams, GetGrantParams, GrantDetail, GrantDraftResponse, GrantListResponse,
    to_api_grant,
};
use grant_store::filter::GrantFilter;
use grant_store::funnel;
use grant_store::model::{EffortLevel, PRIORITY_LEVELS, Priority, parse_iso_date};
use grant_store::parser::render_grants_script;
use grant_store::store::GrantStore;

const DEFAULT_FILTER_LIMIT: u32 = 50;
const MAX_FILTER_LIMIT: u32 = 100;

#[derive(Clone)]
pub struct GrantsServer {
    store: Arc<GrantStore>,
    source: String,
    tool_router: ToolRouter<GrantsServer>,
}

impl GrantsServer {
    pub fn new(store: Arc<GrantStore>, source: String) -> Self {
        Self {
            store,
            source,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl GrantsServer {
    #[tool(description = "List every grant program in the catalog, in authored priority order.")]
    async fn list_grants(&self) -> Result<Json<GrantListResponse>, String> {
        let grants: Vec<GrantDetail> = self
            .store
            .iter()
            .enumerate()
            .map(|(index, record)| to_api_grant(Some(index), record))
            .collect();

        Ok(Json(GrantListResponse {
            total_matches: grants.len(),
            grants,
        }))
    }

    #[tool(description = "Get one grant program by its zero-based position in the catalog.")]
    async fn get_grant(
        &self,
        Parameters(params): Parameters<GetGrantParams>,
    ) -> Result<Json<GrantDetail>, String> {
        let index = params.index as usize;
        let record = self.store.get_by_index(index).map_err(|e| {
            format!("{e}; valid indices are 0..{}", self.store.len())
        })?;
        Ok(Json(to_api_grant(Some(index), record)))
    }

    #[tool(description = "Look up a grant program by its exact name (case-insensitive), e.g. 'AWS Activate'.")]
    async fn find_grant(
        &self,
        Parameters(params): Parameters<FindGrantParams>,
    ) -> Result<Json<GrantDetail>, String> {
        let program_name = params.program_name.trim().to_string();
        if program_name.is_empty() {
            return Err("program_name must not be empty".to_string());
        }

        let (index, record) = self
            .store
            .find_by_name(&program_name)
            .ok_or_else(|| format!("grant not found: {program_name}"))?;
        Ok(Json(to_api_grant(Some(index), record)))
    }

    #[tool(description = "Filter grant programs by country, sector tag, funding type, effort level, priority, minimum relevance, or deadline. All criteria are optional and combined with AND; results keep catalog order.")]
    async fn filter_grants(
        &self,
        Parameters(params): Parameters<FilterGrantsParams>,
    ) -> Result<Json<GrantListResponse>, String> {
        let limit = params
            .limit
            .unwrap_or(DEFAULT_FILTER_LIMIT)
            .min(MAX_FILTER_LIMIT) as usize;
        let filter = build_filter(params)?;
        debug!(?filter, limit, "filtering grants");

        let matched: Vec<GrantDetail> = self
            .store
            .iter()
            .enumerate()
            .filter(|(_, record)| filter.matches(record))
            .map(|(index, record)| to_api_grant(Some(index), record))
            .collect();
        let total_matches = matched.len();

        Ok(Json(GrantListResponse {
            total_matches,
            grants: matched.into_iter().take(limit).collect(),
        }))
    }

    #[tool(description = "Extract a draft grant record from pasted announcement text (labels like 'Program:', 'Amount:', 'Deadline:' and the first URL). The draft is returned for review and is not added to the catalog.")]
    async fn extract_grant_draft(
        &self,
        Parameters(params): Parameters<ExtractDraftParams>,
    ) -> Result<Json<GrantDraftResponse>, String> {
        let draft =
            funnel::extract_draft(&params.text).map_err(|e| format!("extract failed: {e}"))?;
        info!(program_name = %draft.record.program_name, "grant draft extracted");

        Ok(Json(GrantDraftResponse {
            draft: to_api_grant(None, &draft.record),
            unparsed_deadline: draft.unparsed_deadline,
        }))
    }

    #[tool(description = "Describe the loaded grant catalog: record count, content fingerprint, source, and accepted effort/priority values.")]
    async fn catalog_info(&self) -> Result<Json<CatalogInfoResponse>, String> {
        let fingerprint = self
            .store
            .fingerprint()
            .map_err(|e| format!("fingerprint failed: {e}"))?;
        Ok(Json(CatalogInfoResponse {
            record_count: self.store.len(),
            fingerprint,
            source: self.source.clone(),
            effort_levels: EffortLevel::ALL.iter().map(|e| e.to_string()).collect(),
            priority_levels: PRIORITY_LEVELS.iter().map(|p| p.to_string()).collect(),
        }))
    }

    #[tool(description = "Export the catalog as a browser script (`window.grantsData = [...];`) for front-end use.")]
    async fn export_catalog(&self) -> Result<Json<CatalogExportResponse>, String> {
        let script =
            render_grants_script(self.store.records()).map_err(|e| format!("export failed: {e}"))?;
        let fingerprint = self
            .store
            .fingerprint()
            .map_err(|e| format!("export failed: {e}"))?;
        Ok(Json(CatalogExportResponse {
            record_count: self.store.len(),
            fingerprint,
            script,
        }))
    }
}

fn build_filter(params: FilterGrantsParams) -> Result<GrantFilter, String> {
    let effort = params
        .effort_level
        .as_deref()
        .map(str::parse::<EffortLevel>)
        .transpose()?;
    let priority = params
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let deadline_on_or_before = params
        .deadline_on_or_before
        .as_deref()
        .map(|s| {
            parse_iso_date(s)
                .ok_or_else(|| format!("deadline_on_or_before '{s}' is not a YYYY-MM-DD date"))
        })
        .transpose()?;

    if params.min_relevance.is_some_and(|score| score > 100) {
        return Err("min_relevance must be between 0 and 100".to_string());
    }

    Ok(GrantFilter {
        country: non_blank(params.country),
        sector: non_blank(params.sector),
        funding_type: non_blank(params.funding_type),
        effort,
        priority,
        min_relevance: params.min_relevance,
        open_all_year: params.open_all_year,
        deadline_on_or_before,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[tool_handler]
impl ServerHandler for GrantsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "grants-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Startup grant catalog MCP server. Read-only access to curated funding \
                 programs (grants, credits, equity, debt). Use list_grants to browse in \
                 priority order, get_grant or find_grant for one program, filter_grants to \
                 narrow by country, sector, effort, priority or deadline, and \
                 extract_grant_draft to turn pasted announcement text into a draft record. \
                 export_catalog returns the catalog as a window.grantsData script."
                    .to_string(),
            ),
        }
    }
}
