use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::GuildApi;
use crate::analyzers::types::{GroupRatings, Member, MemberRatingSet};
use crate::fetch::HttpClient;
use crate::parser::parse_collection;

impl<C: HttpClient> GuildApi<C> {
    /// Fetches one member's rated collection, highest rating first.
    ///
    /// Never fails: a member whose collection cannot be fetched or decoded
    /// gets an empty set.
    #[tracing::instrument(skip(self, member), fields(member = %member))]
    pub async fn collect_ratings(&self, member: &Member) -> MemberRatingSet {
        let url = self.collection_url(member);

        match self.fetcher.fetch_with_retry(&url, parse_collection).await {
            Ok(entries) => {
                debug!(count = entries.len(), "Collected ratings");
                MemberRatingSet::new(member.clone(), entries)
            }
            Err(e) => {
                warn!(error = %e, "Ratings unavailable, using empty set");
                MemberRatingSet::empty(member.clone())
            }
        }
    }

    /// Collects every distinct member's ratings concurrently.
    ///
    /// Requests are throttled by the shared rate limiter. The result holds one
    /// set per distinct member, in the order members were given.
    #[tracing::instrument(skip_all, fields(members = members.len()))]
    pub async fn collect_all(&self, members: &[Member]) -> GroupRatings {
        let mut seen = HashSet::new();
        let distinct: Vec<&Member> = members.iter().filter(|m| seen.insert(*m)).collect();

        let sets = join_all(distinct.into_iter().map(|m| self.collect_ratings(m))).await;
        let group: GroupRatings = sets.into_iter().collect();

        let empty = group.iter().filter(|s| s.is_empty()).count();
        info!(
            members = group.len(),
            empty,
            ratings = group.total_ratings(),
            "Collected group ratings"
        );
        group
    }
}
