//! Join of the Votes sheet onto support requests.
//!
//! Votes are grouped by request id in one pass, then each request looks up its
//! group, so the join is linear in requests plus votes.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::models::{SupportRequest, SupportRequestWithVotes, Vote, VoteComment};
use crate::store::dates::timestamp_millis;

/// Attach vote count, pledge total and comments (newest first) to each request.
/// Votes for unknown requests are ignored.
pub fn join_votes(requests: Vec<SupportRequest>, votes: &[Vote]) -> Vec<SupportRequestWithVotes> {
    let mut groups: HashMap<&str, Vec<&Vote>> = HashMap::with_capacity(requests.len());
    for vote in votes {
        groups
            .entry(vote.support_request_id.as_str())
            .or_default()
            .push(vote);
    }

    requests
        .into_iter()
        .map(|request| {
            let group = groups
                .get(request.id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let mut comments: Vec<VoteComment> =
                group.iter().map(|vote| VoteComment::from(*vote)).collect();
            comments.sort_by_key(|c| Reverse(timestamp_millis(&c.timestamp)));

            SupportRequestWithVotes {
                votes: group.len(),
                total_pledged: group.iter().map(|vote| vote.pledge_amount).sum(),
                comments,
                request,
            }
        })
        .collect()
}

/// Keep one category ("All" or empty keeps everything).
pub fn filter_category(
    items: Vec<SupportRequestWithVotes>,
    category: &str,
) -> Vec<SupportRequestWithVotes> {
    let category = category.trim();
    if category.is_empty() || category.eq_ignore_ascii_case("all") {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.request.category.eq_ignore_ascii_case(category))
        .collect()
}

/// Most-voted first; ties keep their order.
pub fn rank_by_votes(items: &mut [SupportRequestWithVotes]) {
    items.sort_by_key(|item| Reverse(item.votes));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str, category: &str) -> SupportRequest {
        SupportRequest {
            id: id.to_string(),
            title: format!("Request {}", id),
            description: String::new(),
            category: category.to_string(),
            amount: "₦0".to_string(),
            requested_by: "Anonymous".to_string(),
            requested_by_email: String::new(),
            date: "2024-01-01".to_string(),
            status: "approved".to_string(),
        }
    }

    fn vote(request_id: &str, email: &str, pledge: f64, timestamp: &str) -> Vote {
        Vote {
            support_request_id: request_id.to_string(),
            user_email: email.to_string(),
            user_name: email.split('@').next().unwrap_or_default().to_string(),
            comment: "Supporting".to_string(),
            pledge_amount: pledge,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_join_counts_and_sums() {
        let votes = vec![
            vote("1", "a@x.com", 50000.0, "2024-01-02T10:00:00Z"),
            vote("1", "b@x.com", 0.0, "2024-01-03T10:00:00Z"),
            vote("2", "a@x.com", 1000.0, "2024-01-01T10:00:00Z"),
            vote("99", "c@x.com", 7.0, "2024-01-01T10:00:00Z"),
        ];

        let joined = join_votes(vec![request("1", "Medical"), request("2", "Education")], &votes);

        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].votes, 2);
        assert_eq!(joined[0].total_pledged, 50000.0);
        assert_eq!(joined[0].comments.len(), 2);
        assert_eq!(joined[1].votes, 1);
        assert_eq!(joined[1].total_pledged, 1000.0);
    }

    #[test]
    fn test_request_without_votes() {
        let joined = join_votes(vec![request("7", "Other")], &[]);

        assert_eq!(joined[0].votes, 0);
        assert_eq!(joined[0].total_pledged, 0.0);
        assert!(joined[0].comments.is_empty());
    }

    #[test]
    fn test_comments_newest_first_with_bad_timestamps_last() {
        let votes = vec![
            vote("1", "old@x.com", 0.0, "2024-01-01T00:00:00Z"),
            vote("1", "bad@x.com", 0.0, "yesterday-ish"),
            vote("1", "new@x.com", 0.0, "2024-02-01T00:00:00Z"),
            vote("1", "mid@x.com", 0.0, "1/15/2024 12:00:00"),
        ];

        let joined = join_votes(vec![request("1", "Other")], &votes);
        let names: Vec<&str> = joined[0]
            .comments
            .iter()
            .map(|c| c.user_name.as_str())
            .collect();
        assert_eq!(names, vec!["new", "mid", "old", "bad"]);
    }

    #[test]
    fn test_join_at_scale_matches_definition() {
        let requests: Vec<SupportRequest> =
            (1..=2_000).map(|i| request(&i.to_string(), "Other")).collect();
        let votes: Vec<Vote> = (0..40_000)
            .map(|i| {
                let id = (i % 2_000 + 1).to_string();
                vote(&id, &format!("u{}@x.com", i), (i % 7) as f64, "")
            })
            .collect();

        let joined = join_votes(requests, &votes);
        assert_eq!(joined.len(), 2_000);
        for item in joined.iter().step_by(97) {
            let matching: Vec<&Vote> = votes
                .iter()
                .filter(|v| v.support_request_id == item.request.id)
                .collect();
            assert_eq!(item.votes, matching.len());
            assert_eq!(
                item.total_pledged,
                matching.iter().map(|v| v.pledge_amount).sum::<f64>()
            );
        }
        assert_eq!(joined.iter().map(|r| r.votes).sum::<usize>(), votes.len());
    }

    #[test]
    fn test_filter_and_rank() {
        let votes = vec![
            vote("2", "a@x.com", 0.0, ""),
            vote("2", "b@x.com", 0.0, ""),
            vote("3", "a@x.com", 0.0, ""),
        ];
        let joined = join_votes(
            vec![
                request("1", "Medical"),
                request("2", "Education"),
                request("3", "medical"),
            ],
            &votes,
        );

        let mut medical = filter_category(joined.clone(), "Medical");
        rank_by_votes(&mut medical);
        let ids: Vec<&str> = medical.iter().map(|r| r.request.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);

        assert_eq!(filter_category(joined, "All").len(), 3);
    }
}
