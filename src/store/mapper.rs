//! Row mapper: raw sheet rows to typed records.
//!
//! The first row of every sheet is a header and is discarded. Columns are
//! positional. Short rows are padded with defaults, and rows that fail an
//! entity's minimal validity check are dropped without an error, because sheet
//! rows are hand-entered and sparse rows are normal.

use std::sync::Arc;

use super::dates;
use super::ids::{IdStrategy, RowKey};
use crate::models::{
    AuthorizedUser, Executive, FinancialReport, Job, Member, NewsItem, SupportRequest, Vote,
};
use crate::sheets::RawRows;

/// Default `order` for executives without one, so they sort last.
pub const DEFAULT_EXECUTIVE_ORDER: i64 = 999;

/// One data row with positional, never-failing accessors.
struct Row<'a> {
    cells: &'a [String],
    offset: usize,
}

impl<'a> Row<'a> {
    fn raw(&self, index: usize) -> &'a str {
        self.cells
            .get(index + self.offset)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn text(&self, index: usize) -> String {
        self.raw(index).trim().to_string()
    }

    fn text_or(&self, index: usize, default: &str) -> String {
        match self.raw(index).trim() {
            "" => default.to_string(),
            value => value.to_string(),
        }
    }

    fn optional(&self, index: usize) -> Option<String> {
        match self.raw(index).trim() {
            "" => None,
            value => Some(value.to_string()),
        }
    }

    fn email(&self, index: usize) -> String {
        normalize_email(self.raw(index))
    }

    fn flag(&self, index: usize) -> bool {
        self.raw(index).trim().eq_ignore_ascii_case("TRUE")
    }
}

/// The header row and the data rows of a sheet.
struct Table<'a> {
    header: &'a [String],
    rows: &'a [Vec<String>],
}

impl<'a> Table<'a> {
    fn new(raw: &'a RawRows) -> Self {
        match raw.split_first() {
            Some((header, rows)) => Self { header, rows },
            None => Self {
                header: &[],
                rows: &[],
            },
        }
    }

    /// Index of a header cell by name, case-insensitive.
    fn column(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Data rows with their 1-based position.
    fn rows(&self) -> impl Iterator<Item = (usize, &'a [String])> + 'a {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, cells)| (i + 1, cells.as_slice()))
    }
}

/// Trimmed, lowercased email.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parse a free-text pledge such as `"₦50,000"` or `"N 2,500.50"`.
/// Anything that is not a finite, non-negative number becomes 0.
pub fn parse_pledge(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '₦' | '$'))
        .collect::<String>()
        .to_ascii_lowercase();
    let digits = cleaned
        .strip_prefix("ngn")
        .or_else(|| cleaned.strip_prefix('n'))
        .unwrap_or(&cleaned);

    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => 0.0,
    }
}

/// Split a comma-separated cell into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Maps every sheet layout. Holds the id strategy and the date used when a
/// row has no date of its own.
#[derive(Clone)]
pub struct RowMapper {
    ids: Arc<dyn IdStrategy>,
    today: String,
}

impl RowMapper {
    pub fn new(ids: Arc<dyn IdStrategy>) -> Self {
        Self {
            ids,
            today: dates::today(),
        }
    }

    /// Fix the fallback date, for reproducible output.
    pub fn with_today(mut self, today: impl Into<String>) -> Self {
        self.today = today.into();
        self
    }

    fn id(&self, table: &Table<'_>, position: usize, cells: &[String]) -> String {
        let id_cell = table
            .column("id")
            .and_then(|i| cells.get(i))
            .map(String::as_str);
        self.ids.assign(RowKey { position, id_cell })
    }

    /// Email | Name | Status | Class
    pub fn authorized_users(&self, raw: &RawRows) -> Vec<AuthorizedUser> {
        let table = Table::new(raw);
        table
            .rows()
            .map(|(position, cells)| {
                let row = Row { cells, offset: 0 };
                AuthorizedUser {
                    id: self.id(&table, position, cells),
                    email: row.email(0),
                    name: row.text(1),
                    status: row.text_or(2, "Active"),
                    class: row.text(3),
                }
            })
            .filter(|user| !user.email.is_empty())
            .collect()
    }

    /// Name | Email | Phone | Work | Birthday | Class | City
    pub fn members(&self, raw: &RawRows) -> Vec<Member> {
        let table = Table::new(raw);
        table
            .rows()
            .map(|(position, cells)| {
                let row = Row { cells, offset: 0 };
                Member {
                    id: self.id(&table, position, cells),
                    name: row.text(0),
                    email: row.text(1),
                    phone: row.text(2),
                    work: row.text(3),
                    birthday: row.text(4),
                    class: row.text(5),
                    city: row.text(6),
                }
            })
            .filter(|member| !member.name.is_empty() && !member.email.is_empty())
            .collect()
    }

    /// Name | Position | Bio | ImageURL | Email | Phone | LinkedIn | Twitter | IsPresident | Order | Status
    pub fn executives(&self, raw: &RawRows) -> Vec<Executive> {
        let table = Table::new(raw);
        table
            .rows()
            .map(|(position, cells)| {
                let row = Row { cells, offset: 0 };
                Executive {
                    id: self.id(&table, position, cells),
                    name: row.text(0),
                    position: row.text(1),
                    bio: row.text(2),
                    image_url: row.optional(3),
                    email: row.text(4),
                    phone: row.text(5),
                    linkedin: row.optional(6),
                    twitter: row.optional(7),
                    is_president: row.flag(8),
                    order: row
                        .raw(9)
                        .trim()
                        .parse()
                        .unwrap_or(DEFAULT_EXECUTIVE_ORDER),
                    status: row.text_or(10, "Active"),
                }
            })
            .filter(|exec| !exec.name.is_empty())
            .collect()
    }

    /// ID | Title | Excerpt | Content | Category | Author | Date | ImageURL | IsFeatured
    ///
    /// News carries its own ID column, used whenever it is filled in.
    pub fn news(&self, raw: &RawRows) -> Vec<NewsItem> {
        let table = Table::new(raw);
        table
            .rows()
            .map(|(position, cells)| {
                let row = Row { cells, offset: 0 };
                let id = match row.optional(0) {
                    Some(id) => id,
                    None => self.ids.assign(RowKey {
                        position,
                        id_cell: None,
                    }),
                };
                NewsItem {
                    id,
                    title: row.text(1),
                    excerpt: row.text(2),
                    content: row.text(3),
                    category: row.text_or(4, "Announcement"),
                    author: row.text_or(5, "Admin"),
                    date: row.text_or(6, &self.today),
                    image_url: row.optional(7),
                    featured: row.flag(8),
                }
            })
            .filter(|item| !item.title.is_empty())
            .collect()
    }

    /// [Timestamp |] Title | Company | Description | Requirements | Type | Location | Salary | ApplyURL | PostedBy | Status
    ///
    /// Form-fed job sheets carry a leading Timestamp column, which then serves
    /// as the posting date.
    pub fn jobs(&self, raw: &RawRows) -> Vec<Job> {
        let table = Table::new(raw);
        let timestamped = table
            .header
            .first()
            .is_some_and(|h| h.trim().eq_ignore_ascii_case("timestamp"));
        let offset = usize::from(timestamped);

        table
            .rows()
            .map(|(position, cells)| {
                let row = Row { cells, offset };
                let posted_date = if timestamped {
                    Row { cells, offset: 0 }.text_or(0, &self.today)
                } else {
                    self.today.clone()
                };
                Job {
                    id: self.id(&table, position, cells),
                    title: row.text(0),
                    company: row.text(1),
                    description: row.text(2),
                    requirements: split_list(row.raw(3)),
                    job_type: row.text_or(4, "Full-time"),
                    location: row.text(5),
                    salary: row.text(6),
                    apply_link: row.text_or(7, "#"),
                    posted_by: row.text(8),
                    posted_date,
                    status: row.text_or(9, "Active"),
                }
            })
            .filter(|job| !job.title.is_empty())
            .collect()
    }

    /// Title | Description | Category | Amount | RequestedBy | RequestedByEmail | [Status]
    ///
    /// The id always comes from the id strategy. A `Date` column is honoured
    /// wherever it appears in the header.
    pub fn support_requests(&self, raw: &RawRows) -> Vec<SupportRequest> {
        let table = Table::new(raw);
        let date_column = table.column("date");

        table
            .rows()
            .map(|(position, cells)| {
                let row = Row { cells, offset: 0 };
                let date = date_column
                    .map(|i| row.text_or(i, &self.today))
                    .unwrap_or_else(|| self.today.clone());
                SupportRequest {
                    id: self.id(&table, position, cells),
                    title: row.text(0),
                    description: row.text(1),
                    category: row.text_or(2, "Other"),
                    amount: row.text_or(3, "₦0"),
                    requested_by: row.text_or(4, "Anonymous"),
                    requested_by_email: row.text(5),
                    date,
                    status: row.text_or(6, "approved").to_lowercase(),
                }
            })
            .filter(|request| !request.title.is_empty())
            .collect()
    }

    /// SupportRequestID | UserEmail | UserName | Comment | PledgeAmount | VoteTimestamp
    pub fn votes(&self, raw: &RawRows) -> Vec<Vote> {
        Table::new(raw)
            .rows()
            .map(|(_, cells)| {
                let row = Row { cells, offset: 0 };
                Vote {
                    support_request_id: row.text(0),
                    user_email: row.email(1),
                    user_name: row.text(2),
                    comment: row.text(3),
                    pledge_amount: parse_pledge(row.raw(4)),
                    timestamp: row.text(5),
                }
            })
            .filter(|vote| !vote.support_request_id.is_empty() && !vote.user_email.is_empty())
            .collect()
    }

    /// Year | Title | Description | PdfURL
    pub fn financial_reports(&self, raw: &RawRows) -> Vec<FinancialReport> {
        let table = Table::new(raw);
        table
            .rows()
            .map(|(position, cells)| {
                let row = Row { cells, offset: 0 };
                FinancialReport {
                    id: self.id(&table, position, cells),
                    year: row.text(0),
                    title: row.text(1),
                    description: row.text(2),
                    pdf_url: row.text_or(3, "#"),
                }
            })
            .filter(|report| !report.title.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ids::{IdColumn, RowPosition};

    fn rows(data: &[&[&str]]) -> RawRows {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn mapper() -> RowMapper {
        RowMapper::new(Arc::new(RowPosition)).with_today("2024-06-01")
    }

    const VOTE_HEADER: &[&str] = &[
        "SupportRequestID",
        "UserEmail",
        "UserName",
        "Comment",
        "PledgeAmount",
        "VoteTimestamp",
    ];

    #[test]
    fn test_empty_and_header_only_sheets() {
        assert!(mapper().members(&Vec::new()).is_empty());
        assert!(mapper()
            .members(&rows(&[&["Name", "Email"]]))
            .is_empty());
    }

    #[test]
    fn test_short_vote_row_maps_with_defaults() {
        let raw = rows(&[VOTE_HEADER, &["3", " User@Email.com ", "Ada"]]);

        let votes = mapper().votes(&raw);
        assert_eq!(votes.len(), 1);
        let vote = &votes[0];
        assert_eq!(vote.support_request_id, "3");
        assert_eq!(vote.user_email, "user@email.com");
        assert_eq!(vote.user_name, "Ada");
        assert_eq!(vote.comment, "");
        assert_eq!(vote.pledge_amount, 0.0);
        assert_eq!(vote.timestamp, "");
    }

    #[test]
    fn test_bad_row_does_not_abort_the_rest() {
        let raw = rows(&[
            VOTE_HEADER,
            &["1", "a@x.com", "A", "yes", "50,000", "2024-01-01"],
            &[],
            &["", "orphan@x.com"],
            &["2", "b@x.com", "B", "", "lots", "not a date"],
        ]);

        let votes = mapper().votes(&raw);
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].pledge_amount, 50000.0);
        assert_eq!(votes[1].pledge_amount, 0.0);
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let raw = rows(&[
            &["Title", "Description", "Category", "Amount", "RequestedBy", "RequestedByEmail", "Status"],
            &["School fees", "Help", "Education", "₦200,000", "Bola", "bola@x.com", "Approved"],
            &["Surgery", "", "", "", "", "", ""],
        ]);

        let m = mapper();
        assert_eq!(m.support_requests(&raw), m.support_requests(&raw));
    }

    #[test]
    fn test_support_request_ids_and_defaults() {
        let raw = rows(&[
            &["Title", "Description", "Category", "Amount", "RequestedBy", "RequestedByEmail", "Status"],
            &["", "blank title is dropped"],
            &["Surgery", "Urgent"],
            &["School fees", "Help", "Education", "₦200,000", "Bola", "bola@x.com", " Approved "],
        ]);

        let requests = mapper().support_requests(&raw);
        assert_eq!(requests.len(), 2);

        // Ids are positions among data rows, counted before filtering.
        assert_eq!(requests[0].id, "2");
        assert_eq!(requests[0].category, "Other");
        assert_eq!(requests[0].amount, "₦0");
        assert_eq!(requests[0].requested_by, "Anonymous");
        assert_eq!(requests[0].status, "approved");
        assert_eq!(requests[0].date, "2024-06-01");

        assert_eq!(requests[1].id, "3");
        assert_eq!(requests[1].status, "approved");
    }

    #[test]
    fn test_support_request_id_column_strategy() {
        let raw = rows(&[
            &["Title", "Description", "Category", "Amount", "RequestedBy", "RequestedByEmail", "Status", "ID", "Date"],
            &["Surgery", "", "", "", "", "", "approved", "REQ-17", "2024-03-02"],
            &["Rent", "", "", "", "", "", "approved"],
        ]);

        let by_column = RowMapper::new(Arc::new(IdColumn)).with_today("2024-06-01");
        let requests = by_column.support_requests(&raw);
        assert_eq!(requests[0].id, "REQ-17");
        assert_eq!(requests[0].date, "2024-03-02");
        assert_eq!(requests[1].id, "2");
        assert_eq!(requests[1].date, "2024-06-01");

        let by_position = mapper().support_requests(&raw);
        assert_eq!(by_position[0].id, "1");
    }

    #[test]
    fn test_executive_flags_and_order() {
        let raw = rows(&[
            &["Name", "Position", "Bio", "ImageURL", "Email", "Phone", "LinkedIn", "Twitter", "IsPresident", "Order", "Status"],
            &["Chidi", "President", "", "", "c@x.com", "", "https://linkedin.com/in/c", "", "true", "", ""],
            &["Ngozi", "Treasurer", "", "https://img/n.png", "", "", "", "", "FALSE", "2", "Inactive"],
            &["", "Ghost"],
        ]);

        let execs = mapper().executives(&raw);
        assert_eq!(execs.len(), 2);
        assert!(execs[0].is_president);
        assert_eq!(execs[0].order, DEFAULT_EXECUTIVE_ORDER);
        assert_eq!(execs[0].status, "Active");
        assert_eq!(execs[0].linkedin.as_deref(), Some("https://linkedin.com/in/c"));
        assert_eq!(execs[0].twitter, None);
        assert!(!execs[1].is_president);
        assert_eq!(execs[1].order, 2);
        assert_eq!(execs[1].image_url.as_deref(), Some("https://img/n.png"));
    }

    #[test]
    fn test_news_keeps_own_id_column() {
        let raw = rows(&[
            &["ID", "Title", "Excerpt", "Content", "Category", "Author", "Date", "ImageURL", "IsFeatured"],
            &["N-1", "Reunion", "", "", "", "", "2024-01-15", "", "TRUE"],
            &["", "Gala"],
        ]);

        let news = mapper().news(&raw);
        assert_eq!(news[0].id, "N-1");
        assert!(news[0].featured);
        assert_eq!(news[1].id, "2");
        assert_eq!(news[1].category, "Announcement");
        assert_eq!(news[1].author, "Admin");
        assert_eq!(news[1].date, "2024-06-01");
    }

    #[test]
    fn test_jobs_plain_and_timestamped_layouts() {
        let plain = rows(&[
            &["Title", "Company", "Description", "Requirements", "Type", "Location", "Salary", "ApplyURL", "PostedBy", "Status"],
            &["Engineer", "Acme", "Build", "Rust, , SQL ,", "", "Lagos", "", "", "Ada", "approved"],
        ]);
        let jobs = mapper().jobs(&plain);
        assert_eq!(jobs[0].requirements, vec!["Rust", "SQL"]);
        assert_eq!(jobs[0].job_type, "Full-time");
        assert_eq!(jobs[0].apply_link, "#");
        assert_eq!(jobs[0].posted_date, "2024-06-01");

        let stamped = rows(&[
            &["Timestamp", "Title", "Company", "Description", "Requirements", "Type", "Location", "Salary", "ApplyURL", "PostedBy", "Status"],
            &["3/4/2024 10:15:00", "Analyst", "Beta", "", "Excel", "Contract", "Abuja", "", "https://apply", "Bayo", "Active"],
        ]);
        let jobs = mapper().jobs(&stamped);
        assert_eq!(jobs[0].title, "Analyst");
        assert_eq!(jobs[0].posted_date, "3/4/2024 10:15:00");
        assert_eq!(jobs[0].job_type, "Contract");
        assert_eq!(jobs[0].apply_link, "https://apply");
        assert_eq!(jobs[0].status, "Active");
    }

    #[test]
    fn test_authorized_users_normalized() {
        let raw = rows(&[
            &["Email", "Name", "Status", "Class"],
            &["  Ada@Example.COM ", "Ada", "", "Science"],
            &["", "No email"],
        ]);

        let users = mapper().authorized_users(&raw);
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "ada@example.com");
        assert_eq!(users[0].status, "Active");
    }

    #[test]
    fn test_members_require_name_and_email() {
        let raw = rows(&[
            &["Name", "Email", "Phone", "Work", "Birthday", "Class", "City"],
            &["Ada", "ada@x.com"],
            &["Bola", ""],
            &["", "c@x.com"],
        ]);

        let members = mapper().members(&raw);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].city, "");
    }

    #[test]
    fn test_parse_pledge() {
        assert_eq!(parse_pledge("50,000"), 50000.0);
        assert_eq!(parse_pledge("₦1,250.50"), 1250.5);
        assert_eq!(parse_pledge(" N 2,000 "), 2000.0);
        assert_eq!(parse_pledge("NGN5000"), 5000.0);
        assert_eq!(parse_pledge("$10"), 10.0);
        assert_eq!(parse_pledge(""), 0.0);
        assert_eq!(parse_pledge("a lot"), 0.0);
        assert_eq!(parse_pledge("-300"), 0.0);
        assert_eq!(parse_pledge("NaN"), 0.0);
        assert_eq!(parse_pledge("inf"), 0.0);
    }
}
