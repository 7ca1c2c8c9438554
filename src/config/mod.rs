//! Configuration module for the alumni backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! The resulting [`Config`] is passed explicitly to the components that need it.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Default Google Sheets API v4 endpoint.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// The spreadsheets the service reads from. Each one is a separate spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetKind {
    Auth,
    Members,
    Executives,
    News,
    Jobs,
    SupportRequests,
    Votes,
    Reports,
}

impl SheetKind {
    pub const ALL: [SheetKind; 8] = [
        SheetKind::Auth,
        SheetKind::Members,
        SheetKind::Executives,
        SheetKind::News,
        SheetKind::Jobs,
        SheetKind::SupportRequests,
        SheetKind::Votes,
        SheetKind::Reports,
    ];

    /// Environment variable prefix segment, e.g. `SUPPORT_REQUESTS`.
    pub fn env_key(&self) -> &'static str {
        match self {
            SheetKind::Auth => "AUTH",
            SheetKind::Members => "MEMBERS",
            SheetKind::Executives => "EXECUTIVES",
            SheetKind::News => "NEWS",
            SheetKind::Jobs => "JOBS",
            SheetKind::SupportRequests => "SUPPORT_REQUESTS",
            SheetKind::Votes => "VOTES",
            SheetKind::Reports => "REPORTS",
        }
    }

    fn default_range(&self) -> &'static str {
        match self {
            SheetKind::Auth => "Sheet1!A:D",
            SheetKind::Members => "Sheet1!A:G",
            SheetKind::Executives => "Sheet1!A:K",
            SheetKind::News => "Sheet1!A:I",
            SheetKind::Jobs => "Sheet1!A:K",
            SheetKind::SupportRequests => "Sheet1!A:G",
            SheetKind::Votes => "Sheet1!A:F",
            SheetKind::Reports => "Sheet1!A:D",
        }
    }

    /// The financial reports sheet is optional; everything else is required
    /// for the site to work against live data.
    pub fn is_required(&self) -> bool {
        !matches!(self, SheetKind::Reports)
    }
}

/// Location of one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetConfig {
    pub spreadsheet_id: String,
    pub range: String,
}

impl SheetConfig {
    pub fn new(spreadsheet_id: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.spreadsheet_id.trim().is_empty()
    }
}

/// How entity ids are derived from rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategyKind {
    /// 1-based position among the data rows (header excluded).
    #[default]
    RowPosition,
    /// A dedicated id column, falling back to row position when empty.
    IdColumn,
}

impl IdStrategyKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "position" | "row" | "row_position" => Some(IdStrategyKind::RowPosition),
            "column" | "id_column" => Some(IdStrategyKind::IdColumn),
            _ => None,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the spreadsheet values API
    pub sheets_base_url: String,
    /// API key appended to every read (and append) request
    pub api_key: Option<String>,
    /// Shared password for all members
    pub shared_password: String,
    /// File holding the persisted login session
    pub session_path: PathBuf,
    /// Per-request timeout for the spreadsheet transport
    pub request_timeout: Duration,
    /// When set, votes are posted to this opaque proxy instead of the append endpoint
    pub vote_proxy_url: Option<String>,
    pub id_strategy: IdStrategyKind,
    pub auth_sheet: SheetConfig,
    pub members_sheet: SheetConfig,
    pub executives_sheet: SheetConfig,
    pub news_sheet: SheetConfig,
    pub jobs_sheet: SheetConfig,
    pub support_sheet: SheetConfig,
    pub votes_sheet: SheetConfig,
    pub reports_sheet: SheetConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = var("ALUMNI_BIND_ADDR", "127.0.0.1:8080")
            .parse()
            .expect("Invalid ALUMNI_BIND_ADDR format");

        let request_timeout = lookup("ALUMNI_SHEETS_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15));

        let id_strategy = match lookup("ALUMNI_ID_STRATEGY") {
            Some(raw) => IdStrategyKind::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown ALUMNI_ID_STRATEGY {:?}, using row position", raw);
                IdStrategyKind::RowPosition
            }),
            None => IdStrategyKind::RowPosition,
        };

        let sheet = |kind: SheetKind| {
            let prefix = format!("ALUMNI_{}", kind.env_key());
            SheetConfig {
                spreadsheet_id: var(&format!("{prefix}_SPREADSHEET_ID"), ""),
                range: var(&format!("{prefix}_RANGE"), kind.default_range()),
            }
        };

        Self {
            bind_addr,
            log_level: var("ALUMNI_LOG_LEVEL", "info"),
            sheets_base_url: var("ALUMNI_SHEETS_BASE_URL", DEFAULT_SHEETS_BASE_URL),
            api_key: lookup("ALUMNI_SHEETS_API_KEY").filter(|k| !k.trim().is_empty()),
            shared_password: var("ALUMNI_SHARED_PASSWORD", ""),
            session_path: var("ALUMNI_SESSION_PATH", "./data/session.json").into(),
            request_timeout,
            vote_proxy_url: lookup("ALUMNI_VOTE_PROXY_URL").filter(|u| !u.trim().is_empty()),
            id_strategy,
            auth_sheet: sheet(SheetKind::Auth),
            members_sheet: sheet(SheetKind::Members),
            executives_sheet: sheet(SheetKind::Executives),
            news_sheet: sheet(SheetKind::News),
            jobs_sheet: sheet(SheetKind::Jobs),
            support_sheet: sheet(SheetKind::SupportRequests),
            votes_sheet: sheet(SheetKind::Votes),
            reports_sheet: sheet(SheetKind::Reports),
        }
    }

    pub fn sheet(&self, kind: SheetKind) -> &SheetConfig {
        match kind {
            SheetKind::Auth => &self.auth_sheet,
            SheetKind::Members => &self.members_sheet,
            SheetKind::Executives => &self.executives_sheet,
            SheetKind::News => &self.news_sheet,
            SheetKind::Jobs => &self.jobs_sheet,
            SheetKind::SupportRequests => &self.support_sheet,
            SheetKind::Votes => &self.votes_sheet,
            SheetKind::Reports => &self.reports_sheet,
        }
    }

    /// True when the API key and every required spreadsheet id are set.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
            && SheetKind::ALL
                .iter()
                .filter(|kind| kind.is_required())
                .all(|kind| self.sheet(*kind).is_configured())
    }
}
