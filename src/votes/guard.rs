//! Duplicate-vote guard.
//!
//! The Votes sheet has no uniqueness constraint, so at most one vote per
//! (request, user) holds only because this check runs before every write.
//! Request ids reach us as numbers from callers and as strings from the sheet;
//! both are compared as trimmed strings.

use std::fmt::Display;

use crate::models::Vote;
use crate::store::mapper::normalize_email;

/// A normalized (request id, user email) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteKey {
    pub request_id: String,
    pub user_email: String,
}

impl VoteKey {
    pub fn new(request_id: impl Display, user_email: &str) -> Self {
        Self {
            request_id: normalize_request_id(request_id),
            user_email: normalize_email(user_email),
        }
    }

    pub fn of(vote: &Vote) -> Self {
        Self::new(&vote.support_request_id, &vote.user_email)
    }

    pub fn matches(&self, vote: &Vote) -> bool {
        vote.matches(&self.request_id, &self.user_email)
    }
}

pub fn normalize_request_id(request_id: impl Display) -> String {
    request_id.to_string().trim().to_string()
}

/// Whether `votes` already holds a vote for this pair.
pub fn has_voted(votes: &[Vote], request_id: impl Display, user_email: &str) -> bool {
    let key = VoteKey::new(request_id, user_email);
    votes.iter().any(|vote| key.matches(vote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RequestId;

    fn stored_vote() -> Vote {
        Vote {
            support_request_id: "3".to_string(),
            user_email: "user@email.com".to_string(),
            user_name: "User".to_string(),
            comment: "Yes".to_string(),
            pledge_amount: 0.0,
            timestamp: String::new(),
        }
    }

    #[test]
    fn test_string_and_number_ids_agree() {
        let votes = vec![stored_vote()];

        assert!(has_voted(&votes, "3", " User@Email.com "));
        assert!(has_voted(&votes, 3, "user@email.com"));
        assert!(has_voted(&votes, RequestId::Number(3), "USER@EMAIL.COM"));
        assert!(has_voted(&votes, RequestId::Text(" 3 ".into()), "user@email.com"));
    }

    #[test]
    fn test_other_pairs_are_not_voted() {
        let votes = vec![stored_vote()];

        assert!(!has_voted(&votes, 4, "user@email.com"));
        assert!(!has_voted(&votes, "3", "someone@email.com"));
        assert!(!has_voted(&[], "3", "user@email.com"));
    }
}
