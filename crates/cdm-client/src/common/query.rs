//! Query utilities for the CDM API
//!
//! Provides helpers for filtered list queries and offset pagination.

use crate::common::{ApiVersion, HttpClient, PaginatedResponse};
use crate::error::CdmError;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Query resources with optional filtering and pagination
///
/// With `fetch_all` set, pages are requested with an increasing `offset`
/// until the API reports `hasMore: false`.
pub async fn query_resources<T: DeserializeOwned>(
    http: &HttpClient,
    version: ApiVersion,
    endpoint: &str,
    filters: &[(&str, &str)],
    fetch_all: bool,
) -> Result<Vec<T>, CdmError> {
    let base = endpoint_with_filters(http, endpoint, filters);

    if !fetch_all {
        let response: PaginatedResponse<T> = http.get(version, &base).await?;
        return Ok(response.data);
    }

    let mut all_results = Vec::new();
    loop {
        let separator = if base.contains('?') { '&' } else { '?' };
        let url = format!("{}{}offset={}", base, separator, all_results.len());
        debug!("Fetching page: {}", url);

        let page: PaginatedResponse<T> = http.get(version, &url).await?;
        let page_len = page.data.len();
        all_results.extend(page.data);

        if !page.has_more || page_len == 0 {
            break;
        }
    }

    Ok(all_results)
}

fn endpoint_with_filters(http: &HttpClient, endpoint: &str, filters: &[(&str, &str)]) -> String {
    if filters.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}?{}", endpoint, http.build_query_string(filters))
    }
}
