//! News, jobs and financial report endpoints.

use axum::extract::State;

use super::{success, ApiQuery, ApiResult};
use crate::models::{FinancialReport, Job, NewsItem, ReportListing, ReportQuery};
use crate::AppState;

/// GET /api/news - Published news, newest first.
pub async fn list_news(State(state): State<AppState>) -> ApiResult<Vec<NewsItem>> {
    success(state.repo.fetch_news().await?)
}

/// GET /api/jobs - Open job postings, newest first.
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Vec<Job>> {
    success(state.repo.fetch_jobs().await?)
}

/// GET /api/reports - Financial reports, optionally for one year.
pub async fn list_reports(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ReportQuery>,
) -> ApiResult<ReportListing> {
    let reports = state.repo.fetch_financial_reports().await?;
    success(report_listing(reports, query.year.as_deref()))
}

/// Distinct years in listing order, then the reports for `year` ("All" or
/// absent keeps every report).
pub fn report_listing(reports: Vec<FinancialReport>, year: Option<&str>) -> ReportListing {
    let mut years: Vec<String> = Vec::new();
    for report in &reports {
        if !years.contains(&report.year) {
            years.push(report.year.clone());
        }
    }

    let reports = match year.map(str::trim) {
        None | Some("") => reports,
        Some(y) if y.eq_ignore_ascii_case("all") => reports,
        Some(y) => reports.into_iter().filter(|r| r.year == y).collect(),
    };

    ReportListing { years, reports }
}
