//! Dashboard and diagnostics models.

use serde::Serialize;

use crate::config::SheetKind;

/// Summary numbers for the home page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeStats {
    pub member_count: usize,
    pub support_count: usize,
    pub jobs_count: usize,
    pub executive_count: usize,
    pub total_votes: usize,
    pub total_pledges: f64,
}

/// Outcome of probing one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub sheet: SheetKind,
    pub success: bool,
    pub message: String,
}
