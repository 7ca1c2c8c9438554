//! Repository functions, one per entity.
//!
//! Each call reads the sheet afresh, maps it, filters it and applies the
//! entity's default sort. There is no cache and no shared mutable state, so
//! calls can run concurrently and repeatedly. Transport failures are returned
//! to the caller, never swallowed into an empty list.

use std::cmp::Reverse;
use std::sync::Arc;

use super::dates::timestamp_millis;
use super::ids::strategy_for;
use super::mapper::{normalize_email, RowMapper};
use crate::config::{Config, SheetKind};
use crate::errors::AppError;
use crate::models::{
    AuthorizedUser, ConnectionStatus, Executive, FinancialReport, Job, Member, NewsItem,
    SupportRequest, SupportRequestWithVotes, Vote,
};
use crate::sheets::{RawRows, SheetReader};
use crate::votes::aggregate;

/// Spreadsheet-backed repository for all read operations.
#[derive(Clone)]
pub struct Repository {
    reader: Arc<dyn SheetReader>,
    config: Arc<Config>,
    mapper: RowMapper,
}

impl Repository {
    pub fn new(reader: Arc<dyn SheetReader>, config: Arc<Config>) -> Self {
        let mapper = RowMapper::new(strategy_for(config.id_strategy));
        Self {
            reader,
            config,
            mapper,
        }
    }

    /// Replace the row mapper, e.g. to pin its fallback date.
    pub fn with_mapper(mut self, mapper: RowMapper) -> Self {
        self.mapper = mapper;
        self
    }

    async fn rows(&self, kind: SheetKind) -> Result<RawRows, AppError> {
        let sheet = self.config.sheet(kind);
        self.reader.read_rows(sheet).await.inspect_err(|e| {
            tracing::error!("Failed to read {:?} sheet: {}", kind, e);
        })
    }

    // ==================== USERS ====================

    /// Active authorized users.
    pub async fn fetch_authorized_users(&self) -> Result<Vec<AuthorizedUser>, AppError> {
        let rows = self.rows(SheetKind::Auth).await?;
        Ok(self
            .mapper
            .authorized_users(&rows)
            .into_iter()
            .filter(|user| user.status.eq_ignore_ascii_case("active"))
            .collect())
    }

    /// Find an active authorized user by email.
    pub async fn verify_user(&self, email: &str) -> Result<Option<AuthorizedUser>, AppError> {
        let email = normalize_email(email);
        Ok(self
            .fetch_authorized_users()
            .await?
            .into_iter()
            .find(|user| user.email == email))
    }

    pub async fn fetch_members(&self) -> Result<Vec<Member>, AppError> {
        let rows = self.rows(SheetKind::Members).await?;
        Ok(self.mapper.members(&rows))
    }

    // ==================== CONTENT ====================

    /// Active executives, president first, then by `order`.
    pub async fn fetch_executives(&self) -> Result<Vec<Executive>, AppError> {
        let rows = self.rows(SheetKind::Executives).await?;
        let active = self
            .mapper
            .executives(&rows)
            .into_iter()
            .filter(|exec| exec.status.eq_ignore_ascii_case("active"))
            .collect();
        Ok(order_executives(active))
    }

    /// News, newest first.
    pub async fn fetch_news(&self) -> Result<Vec<NewsItem>, AppError> {
        let rows = self.rows(SheetKind::News).await?;
        let mut news = self.mapper.news(&rows);
        sort_newest_first(&mut news, |item| item.date.as_str());
        Ok(news)
    }

    /// Approved or active jobs, newest first.
    pub async fn fetch_jobs(&self) -> Result<Vec<Job>, AppError> {
        let rows = self.rows(SheetKind::Jobs).await?;
        let mut jobs: Vec<Job> = self
            .mapper
            .jobs(&rows)
            .into_iter()
            .filter(|job| {
                job.status.eq_ignore_ascii_case("approved") || job.status.eq_ignore_ascii_case("active")
            })
            .collect();
        sort_newest_first(&mut jobs, |job| job.posted_date.as_str());
        Ok(jobs)
    }

    /// Financial reports, newest year first. The reports sheet is optional.
    pub async fn fetch_financial_reports(&self) -> Result<Vec<FinancialReport>, AppError> {
        if !self.config.sheet(SheetKind::Reports).is_configured() {
            tracing::debug!("Reports sheet not configured, returning no reports");
            return Ok(Vec::new());
        }

        let rows = self.rows(SheetKind::Reports).await?;
        let mut reports = self.mapper.financial_reports(&rows);
        reports.sort_by_key(|report| Reverse(report.year.trim().parse::<i64>().unwrap_or(i64::MIN)));
        Ok(reports)
    }

    // ==================== SUPPORT ====================

    /// Approved support requests, in sheet order.
    pub async fn fetch_support_requests(&self) -> Result<Vec<SupportRequest>, AppError> {
        let rows = self.rows(SheetKind::SupportRequests).await?;
        Ok(self
            .mapper
            .support_requests(&rows)
            .into_iter()
            .filter(|request| request.status == "approved")
            .collect())
    }

    pub async fn fetch_votes(&self) -> Result<Vec<Vote>, AppError> {
        let rows = self.rows(SheetKind::Votes).await?;
        Ok(self.mapper.votes(&rows))
    }

    /// Approved requests joined with their votes. Both sheets are read
    /// concurrently and the join waits for both.
    pub async fn fetch_support_requests_with_votes(
        &self,
    ) -> Result<Vec<SupportRequestWithVotes>, AppError> {
        let (requests, votes) =
            tokio::try_join!(self.fetch_support_requests(), self.fetch_votes())?;
        Ok(aggregate::join_votes(requests, &votes))
    }

    /// Ids of every request the user has voted for.
    pub async fn voted_request_ids(&self, user_email: &str) -> Result<Vec<String>, AppError> {
        let email = normalize_email(user_email);
        Ok(self
            .fetch_votes()
            .await?
            .into_iter()
            .filter(|vote| vote.user_email == email)
            .map(|vote| vote.support_request_id)
            .collect())
    }

    // ==================== DIAGNOSTICS ====================

    /// Check that one sheet can be read.
    pub async fn test_connection(&self, kind: SheetKind) -> ConnectionStatus {
        let sheet = self.config.sheet(kind);
        if !sheet.is_configured() {
            return ConnectionStatus {
                sheet: kind,
                success: false,
                message: "Sheet not configured".to_string(),
            };
        }

        match self.reader.read_rows(sheet).await {
            Ok(_) => ConnectionStatus {
                sheet: kind,
                success: true,
                message: "Connection successful".to_string(),
            },
            Err(e) => ConnectionStatus {
                sheet: kind,
                success: false,
                message: e.message(),
            },
        }
    }

    pub async fn test_all_connections(&self) -> Vec<ConnectionStatus> {
        let mut results = Vec::with_capacity(SheetKind::ALL.len());
        for kind in SheetKind::ALL {
            results.push(self.test_connection(kind).await);
        }
        results
    }
}

/// Sort by `order` ascending (ties keep sheet order), then move the first
/// president to the front.
pub fn order_executives(mut executives: Vec<Executive>) -> Vec<Executive> {
    executives.sort_by_key(|exec| exec.order);
    if let Some(index) = executives.iter().position(|exec| exec.is_president) {
        let president = executives.remove(index);
        executives.insert(0, president);
    }
    executives
}

/// Stable sort by a date field, newest first. Unparseable dates sink to the end.
pub fn sort_newest_first<T, F>(items: &mut [T], date: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_key(|item| Reverse(timestamp_millis(date(item))));
}
