//! Filter endpoint: /accounts/filter/
//!
//! Parses the query string into a filter chain (all-or-nothing: any bad
//! argument rejects the request before the engine runs), evaluates it,
//! then projects each match onto `id`, `email`, and exactly the fields the
//! query's criteria referenced. Results sort by descending id and truncate
//! to the required `limit` after sorting.

use crate::error::{Result, ServerError};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use roster_db_core::Account;
use roster_db_query::{filter_accounts, AccountFilter, StringPredicate, TimePredicate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Recognized query parameters; anything else on the wire is ignored
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    limit: Option<String>,
    sex_eq: Option<String>,
    email_domain: Option<String>,
    email_lt: Option<String>,
    email_gt: Option<String>,
    status_eq: Option<String>,
    status_neq: Option<String>,
    fname_eq: Option<String>,
    fname_any: Option<String>,
    fname_null: Option<String>,
    sname_eq: Option<String>,
    sname_starts: Option<String>,
    sname_null: Option<String>,
    phone_code: Option<String>,
    phone_null: Option<String>,
    country_eq: Option<String>,
    country_null: Option<String>,
    city_eq: Option<String>,
    city_any: Option<String>,
    city_null: Option<String>,
    birth_lt: Option<String>,
    birth_gt: Option<String>,
    birth_year: Option<String>,
    interests_contains: Option<String>,
    interests_any: Option<String>,
    likes_contains: Option<String>,
    premium_now: Option<String>,
    premium_null: Option<String>,
}

/// Which optional fields this query's criteria referenced.
///
/// `id` and `email` are always in the output; everything else appears only
/// when a filter touched it. Premium criteria add no output field.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Projection {
    sex: bool,
    status: bool,
    fname: bool,
    sname: bool,
    phone: bool,
    country: bool,
    city: bool,
    birth: bool,
    interests: bool,
    likes: bool,
}

/// Build the filter chain and projection set from the wire parameters
pub(crate) fn build_filters(params: &FilterParams) -> Result<(Vec<AccountFilter>, Projection)> {
    let mut filters = Vec::new();
    let mut projection = Projection::default();

    if let Some(v) = &params.sex_eq {
        filters.push(AccountFilter::sex(v)?);
        projection.sex = true;
    }
    if let Some(v) = &params.email_domain {
        filters.push(AccountFilter::Email(StringPredicate::Domain(v.clone())));
    }
    if let Some(v) = &params.email_lt {
        filters.push(AccountFilter::Email(StringPredicate::Lt(v.clone())));
    }
    if let Some(v) = &params.email_gt {
        filters.push(AccountFilter::Email(StringPredicate::Gt(v.clone())));
    }
    if let Some(v) = &params.status_eq {
        filters.push(AccountFilter::Status(StringPredicate::Equal(v.clone())));
        projection.status = true;
    }
    if let Some(v) = &params.status_neq {
        filters.push(AccountFilter::Status(StringPredicate::NotEqual(v.clone())));
        projection.status = true;
    }
    if let Some(v) = &params.fname_eq {
        filters.push(AccountFilter::Fname(StringPredicate::Equal(v.clone())));
        projection.fname = true;
    }
    if let Some(v) = &params.fname_any {
        filters.push(AccountFilter::Fname(StringPredicate::any(v)));
        projection.fname = true;
    }
    if let Some(v) = &params.fname_null {
        filters.push(AccountFilter::Fname(StringPredicate::null(v)));
        projection.fname = true;
    }
    if let Some(v) = &params.sname_eq {
        filters.push(AccountFilter::Sname(StringPredicate::Equal(v.clone())));
        projection.sname = true;
    }
    if let Some(v) = &params.sname_starts {
        filters.push(AccountFilter::Sname(StringPredicate::Starts(v.clone())));
        projection.sname = true;
    }
    if let Some(v) = &params.sname_null {
        filters.push(AccountFilter::Sname(StringPredicate::null(v)));
        projection.sname = true;
    }
    if let Some(v) = &params.phone_code {
        filters.push(AccountFilter::Phone(StringPredicate::Code(v.clone())));
        projection.phone = true;
    }
    if let Some(v) = &params.phone_null {
        filters.push(AccountFilter::Phone(StringPredicate::null(v)));
        projection.phone = true;
    }
    if let Some(v) = &params.country_eq {
        filters.push(AccountFilter::Country(StringPredicate::Equal(v.clone())));
        projection.country = true;
    }
    if let Some(v) = &params.country_null {
        filters.push(AccountFilter::Country(StringPredicate::null(v)));
        projection.country = true;
    }
    if let Some(v) = &params.city_eq {
        filters.push(AccountFilter::City(StringPredicate::Equal(v.clone())));
        projection.city = true;
    }
    if let Some(v) = &params.city_any {
        filters.push(AccountFilter::City(StringPredicate::any(v)));
        projection.city = true;
    }
    if let Some(v) = &params.city_null {
        filters.push(AccountFilter::City(StringPredicate::null(v)));
        projection.city = true;
    }
    if let Some(v) = &params.birth_lt {
        filters.push(AccountFilter::Birth(TimePredicate::before(v)?));
        projection.birth = true;
    }
    if let Some(v) = &params.birth_gt {
        filters.push(AccountFilter::Birth(TimePredicate::after(v)?));
        projection.birth = true;
    }
    if let Some(v) = &params.birth_year {
        filters.push(AccountFilter::Birth(TimePredicate::year(v)?));
        projection.birth = true;
    }
    if let Some(v) = &params.interests_contains {
        filters.push(AccountFilter::interests_contains(v));
        projection.interests = true;
    }
    if let Some(v) = &params.interests_any {
        filters.push(AccountFilter::interests_any(v));
        projection.interests = true;
    }
    if let Some(v) = &params.likes_contains {
        filters.push(AccountFilter::likes_contains(v));
        projection.likes = true;
    }
    if let Some(v) = &params.premium_now {
        filters.push(AccountFilter::premium_now(v)?);
    }
    if let Some(v) = &params.premium_null {
        filters.push(AccountFilter::premium_null(v));
    }

    Ok((filters, projection))
}

/// One projected account on the wire
#[derive(Debug, Serialize)]
pub(crate) struct AccountView {
    id: i64,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sex: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    interests: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    likes: Vec<String>,
}

fn when(include: bool, value: &str) -> Option<String> {
    include.then(|| value.to_string())
}

pub(crate) fn project(account: &Account, p: Projection) -> AccountView {
    AccountView {
        id: account.id,
        email: account.email.clone(),
        sex: p.sex.then(|| account.sex.as_str()),
        status: when(p.status, &account.status),
        fname: when(p.fname, &account.fname),
        sname: when(p.sname, &account.sname),
        phone: when(p.phone, &account.phone),
        country: when(p.country, &account.country),
        city: when(p.city, &account.city),
        birth: p.birth.then_some(account.birth),
        interests: if p.interests {
            account.interests.clone()
        } else {
            Vec::new()
        },
        likes: if p.likes {
            account.like_set.iter().cloned().collect()
        } else {
            Vec::new()
        },
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AccountsResponse {
    accounts: Vec<AccountView>,
}

/// Filter query handler
///
/// GET /accounts/filter/
pub async fn filter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<AccountsResponse>> {
    let limit: usize = match &params.limit {
        None => return Err(ServerError::MissingLimit),
        Some(v) => v.parse().map_err(ServerError::InvalidLimit)?,
    };
    let (filters, projection) = build_filters(&params)?;

    let working = filter_accounts(&state.catalog, &filters);
    let mut accounts: Vec<AccountView> =
        working.values().map(|a| project(a, projection)).collect();
    accounts.sort_by(|a, b| b.id.cmp(&a.id));
    accounts.truncate(limit);

    Ok(Json(AccountsResponse { accounts }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_follows_referenced_fields() {
        let params = FilterParams {
            sex_eq: Some("f".to_string()),
            city_null: Some("0".to_string()),
            premium_null: Some("1".to_string()),
            ..Default::default()
        };

        let (filters, projection) = build_filters(&params).unwrap();
        assert_eq!(filters.len(), 3);
        assert!(projection.sex);
        assert!(projection.city);
        assert!(!projection.status);
        assert!(!projection.birth);
    }

    #[test]
    fn email_criteria_project_nothing_extra() {
        let params = FilterParams {
            email_domain: Some("mail.ru".to_string()),
            email_lt: Some("x".to_string()),
            ..Default::default()
        };

        let (filters, projection) = build_filters(&params).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(projection, Projection::default());
    }

    #[test]
    fn bad_arguments_reject_the_whole_request() {
        let params = FilterParams {
            birth_year: Some("199O".to_string()),
            country_eq: Some("UK".to_string()),
            ..Default::default()
        };
        assert!(build_filters(&params).is_err());

        let params = FilterParams {
            sex_eq: Some("x".to_string()),
            ..Default::default()
        };
        assert!(build_filters(&params).is_err());
    }

    #[test]
    fn projected_view_omits_unreferenced_fields() {
        use roster_db_core::{Catalog, Sex};

        let account = roster_db_core::Account {
            id: 5,
            email: "a@b.c".to_string(),
            fname: "Ann".to_string(),
            sname: String::new(),
            phone: String::new(),
            sex: Sex::Female,
            birth: 77,
            country: String::new(),
            city: String::new(),
            joined: 0,
            status: "free".to_string(),
            interests: vec!["tea".to_string()],
            likes: Vec::new(),
            premium: None,
            interest_set: Default::default(),
            like_set: Default::default(),
        };
        let catalog = Catalog::from_accounts(vec![account]);
        let loaded = catalog.account(5).unwrap();

        let view = project(
            loaded,
            Projection {
                sex: true,
                birth: true,
                ..Default::default()
            },
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 5, "email": "a@b.c", "sex": "f", "birth": 77})
        );
    }
}
