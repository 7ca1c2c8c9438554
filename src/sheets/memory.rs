//! In-memory sheets for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{vote_to_row, RawRows, SheetReader, VoteWriter};
use crate::config::SheetConfig;
use crate::errors::AppError;
use crate::models::{Vote, WriteAck};

/// Sheets keyed by spreadsheet id. Votes are appended to `votes_id`.
pub struct MemorySheets {
    sheets: Mutex<HashMap<String, RawRows>>,
    votes_id: String,
    ack: WriteAck,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl MemorySheets {
    pub fn new(votes_id: &str) -> Self {
        Self {
            sheets: Mutex::new(HashMap::new()),
            votes_id: votes_id.to_string(),
            ack: WriteAck::Confirmed,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn with_ack(mut self, ack: WriteAck) -> Self {
        self.ack = ack;
        self
    }

    pub fn set(&self, spreadsheet_id: &str, rows: &[&[&str]]) {
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        self.sheets
            .lock()
            .unwrap()
            .insert(spreadsheet_id.to_string(), rows);
    }

    pub fn rows(&self, spreadsheet_id: &str) -> RawRows {
        self.sheets
            .lock()
            .unwrap()
            .get(spreadsheet_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SheetReader for MemorySheets {
    async fn read_rows(&self, sheet: &SheetConfig) -> Result<RawRows, AppError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Transport("network unreachable".to_string()));
        }
        Ok(self.rows(&sheet.spreadsheet_id))
    }
}

#[async_trait]
impl VoteWriter for MemorySheets {
    async fn append_vote(&self, vote: &Vote) -> Result<WriteAck, AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Transport("write rejected".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);

        let mut sheets = self.sheets.lock().unwrap();
        let rows = sheets.entry(self.votes_id.clone()).or_insert_with(|| {
            vec![[
                "SupportRequestID",
                "UserEmail",
                "UserName",
                "Comment",
                "PledgeAmount",
                "VoteTimestamp",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect()]
        });
        rows.push(vote_to_row(vote));
        Ok(self.ack)
    }
}
