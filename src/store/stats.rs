//! Home page summary numbers.

use super::Repository;
use crate::errors::AppError;
use crate::models::{HomeStats, SupportRequestWithVotes};

impl Repository {
    /// Counts across the directory, job board, council and support requests.
    /// Votes and pledges only count toward approved requests.
    pub async fn home_stats(&self) -> Result<HomeStats, AppError> {
        let (members, jobs, executives, joined) = tokio::try_join!(
            self.fetch_members(),
            self.fetch_jobs(),
            self.fetch_executives(),
            self.fetch_support_requests_with_votes(),
        )?;

        let stats = summarize(members.len(), jobs.len(), executives.len(), &joined);
        tracing::debug!("Home stats: {:?}", stats);
        Ok(stats)
    }
}

pub fn summarize(
    member_count: usize,
    jobs_count: usize,
    executive_count: usize,
    support: &[SupportRequestWithVotes],
) -> HomeStats {
    HomeStats {
        member_count,
        support_count: support.len(),
        jobs_count,
        executive_count,
        total_votes: support.iter().map(|r| r.votes).sum(),
        total_pledges: support.iter().map(|r| r.total_pledged).sum(),
    }
}
