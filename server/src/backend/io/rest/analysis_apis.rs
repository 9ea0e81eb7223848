//! # REST API for Service Analysis
//!
//! `GET /api/analysis` reports repairs, income, spare part cost and profit of
//! paid records. The window is either `startDate`/`endDate` (both
//! `YYYY-MM-DD`, inclusive) or `period` = `daily` | `weekly` | `monthly` |
//! `all` (the default). Explicit dates take precedence over `period`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::backend::domain::commands::reports::{AnalysisPeriod, AnalysisScope};
use crate::backend::io::rest::auth::AdminUser;
use crate::backend::io::rest::error::ApiError;
use crate::backend::AppState;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Query parameters for the analysis API
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisParams {
    pub period: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Create a router for the analysis API
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_service_analysis))
}

pub async fn get_service_analysis(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<AnalysisParams>,
) -> impl IntoResponse {
    info!("GET /api/analysis - query: {:?}", params);

    let scope = match analysis_scope(&params) {
        Ok(scope) => scope,
        Err(e) => return e.into_response(),
    };

    match state.report_service.service_analysis(scope).await {
        Ok(analysis) => (StatusCode::OK, Json(analysis)).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Translate query parameters into an analysis scope
pub fn analysis_scope(params: &AnalysisParams) -> Result<AnalysisScope, ApiError> {
    match (params.start_date.as_deref(), params.end_date.as_deref()) {
        (Some(start), Some(end)) => Ok(AnalysisScope::Dates {
            start: parse_date("startDate", start)?,
            end: parse_date("endDate", end)?,
        }),
        (Some(_), None) | (None, Some(_)) => Err(ApiError::bad_request(
            "Both startDate and endDate are required for a date range",
        )),
        (None, None) => {
            let period = match params.period.as_deref() {
                Some(period) => period.parse::<AnalysisPeriod>().map_err(ApiError::bad_request)?,
                None => AnalysisPeriod::default(),
            };
            Ok(AnalysisScope::Period(period))
        }
    }
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::bad_request(format!("{} must be a date in YYYY-MM-DD format", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(period: Option<&str>, start: Option<&str>, end: Option<&str>) -> AnalysisParams {
        AnalysisParams {
            period: period.map(str::to_string),
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    #[test]
    fn test_default_scope_is_all() {
        assert_eq!(
            analysis_scope(&AnalysisParams::default()).unwrap(),
            AnalysisScope::Period(AnalysisPeriod::All)
        );
    }

    #[test]
    fn test_named_periods() {
        assert_eq!(
            analysis_scope(&params(Some("weekly"), None, None)).unwrap(),
            AnalysisScope::Period(AnalysisPeriod::Weekly)
        );
        let error = analysis_scope(&params(Some("fortnightly"), None, None)).unwrap_err();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_explicit_dates_win_over_period() {
        let scope = analysis_scope(&params(Some("daily"), Some("2024-01-01"), Some("2024-01-31"))).unwrap();
        assert_eq!(
            scope,
            AnalysisScope::Dates {
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            }
        );
    }

    #[test]
    fn test_incomplete_or_malformed_dates() {
        assert!(analysis_scope(&params(None, Some("2024-01-01"), None)).is_err());
        assert!(analysis_scope(&params(None, None, Some("2024-01-31"))).is_err());

        let error = analysis_scope(&params(None, Some("01/01/2024"), Some("2024-01-31"))).unwrap_err();
        assert_eq!(error.message(), "startDate must be a date in YYYY-MM-DD format");
    }
}
