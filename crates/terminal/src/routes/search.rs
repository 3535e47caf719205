//! Catalog and customer search handlers.
//!
//! Product search goes through the [`SearchDispatcher`]: the terminal
//! debounces bursts of keystrokes and drops superseded responses, so the
//! results a client renders always belong to the newest query.
//!
//! [`SearchDispatcher`]: crate::search::SearchDispatcher

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use countertop_core::{Customer, Product};

use crate::error::Result;
use crate::state::AppState;

const SEARCH_LIMIT: u32 = 25;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Product search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<Product>,
    /// True when this query was superseded by a newer one before its
    /// results came back; the client should ignore the (empty) results.
    pub superseded: bool,
}

/// Debounced catalog search.
#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let term = query.q.trim().to_string();
    if term.is_empty() {
        return Ok(Json(SearchResponse {
            query: term,
            results: Vec::new(),
            superseded: false,
        }));
    }

    let backoffice = state.backoffice().clone();
    let outcome = {
        let term = term.clone();
        state
            .search()
            .dispatch(|| async move { backoffice.search_products(&term, SEARCH_LIMIT).await })
            .await
    };

    match outcome {
        Some(results) => Ok(Json(SearchResponse {
            query: term,
            results: results?,
            superseded: false,
        })),
        None => Ok(Json(SearchResponse {
            query: term,
            results: Vec::new(),
            superseded: true,
        })),
    }
}

/// Customer lookup for the customer picker.
#[instrument(skip(state))]
pub async fn search_customers(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Customer>>> {
    let term = query.q.trim();
    if term.is_empty() {
        return Ok(Json(Vec::new()));
    }

    Ok(Json(state.backoffice().search_customers(term).await?))
}
