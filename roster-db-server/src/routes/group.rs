//! Group endpoint: /accounts/group/
//!
//! Parses the requested key list, order flag, limit, and the optional
//! year-of-birth filter, runs the aggregator, and shapes each ranked group
//! as its key/value pairs plus a count.

use crate::error::{Result, ServerError};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use roster_db_query::{group_accounts, AccountFilter, GroupKey, GroupRow, SortOrder, TimePredicate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Recognized query parameters; anything else on the wire is ignored
#[derive(Debug, Default, Deserialize)]
pub struct GroupParams {
    keys: Option<String>,
    order: Option<String>,
    limit: Option<String>,
    birth: Option<String>,
}

/// Parsed request: keys, order, limit, filter chain
pub(crate) fn parse_params(
    params: &GroupParams,
) -> Result<(Vec<GroupKey>, SortOrder, usize, Vec<AccountFilter>)> {
    let order = match &params.order {
        None => return Err(ServerError::MissingOrder),
        Some(v) if v.starts_with('-') => SortOrder::Descending,
        Some(_) => SortOrder::Ascending,
    };

    let limit: usize = match &params.limit {
        None => 0,
        Some(v) => v.parse().map_err(ServerError::InvalidLimit)?,
    };

    // unrecognized key names are skipped, not rejected
    let keys: Vec<GroupKey> = params
        .keys
        .as_deref()
        .unwrap_or("")
        .split(',')
        .filter_map(GroupKey::parse)
        .collect();

    let mut filters = Vec::new();
    if let Some(v) = &params.birth {
        filters.push(AccountFilter::Birth(TimePredicate::year(v)?));
    }

    Ok((keys, order, limit, filters))
}

/// One ranked group on the wire: the key/value pairs plus "count".
/// Duplicate key names collapse last-wins.
fn shape_row(row: GroupRow) -> Map<String, Value> {
    let mut shaped = Map::new();
    for (name, value) in row.fields {
        shaped.insert(name, Value::String(value));
    }
    shaped.insert("count".to_string(), row.count.into());
    shaped
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupsResponse {
    groups: Vec<Map<String, Value>>,
}

/// Group query handler
///
/// GET /accounts/group/
pub async fn group(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GroupParams>,
) -> Result<Json<GroupsResponse>> {
    let (keys, order, limit, filters) = parse_params(&params)?;

    let rows = group_accounts(&state.catalog, &keys, order, limit, &filters);
    let groups = rows.into_iter().map(shape_row).collect();

    Ok(Json(GroupsResponse { groups }))
}
