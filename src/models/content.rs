//! Executive council, news, job board and financial report models.

use serde::{Deserialize, Serialize};

/// A member of the executive council.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Executive {
    pub id: String,
    pub name: String,
    pub position: String,
    pub bio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    pub is_president: bool,
    pub order: i64,
    pub status: String,
}

/// A news or announcement post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub author: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub featured: bool,
}

/// A job board listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
    pub salary: String,
    pub posted_by: String,
    pub posted_date: String,
    pub apply_link: String,
    pub status: String,
}

/// A downloadable financial report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub id: String,
    pub year: String,
    pub title: String,
    pub description: String,
    pub pdf_url: String,
}

/// Reports plus the distinct years they cover, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListing {
    pub years: Vec<String>,
    pub reports: Vec<FinancialReport>,
}

/// Query parameters for the report listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub year: Option<String>,
}
