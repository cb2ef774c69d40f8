use tracing::{debug, info, warn};

use super::GuildApi;
use crate::analyzers::types::Member;
use crate::fetch::HttpClient;
use crate::parser::parse_guild_page;

impl<C: HttpClient> GuildApi<C> {
    /// Walks the guild's member pages in order until a page comes back empty.
    ///
    /// A page that still fails after the retry budget counts as empty, so
    /// pagination ends there with whatever was collected so far.
    #[tracing::instrument(skip(self))]
    pub async fn list_all_members(&self, guild_id: u64) -> Vec<Member> {
        let mut members = Vec::new();

        for page in 1u32.. {
            let url = self.guild_url(guild_id, page);
            let added = match self.fetcher.fetch_with_retry(&url, parse_guild_page).await {
                Ok(added) => added,
                Err(e) => {
                    warn!(page, error = %e, "Guild page unavailable, ending pagination");
                    Vec::new()
                }
            };

            if added.is_empty() {
                debug!(page, "Reached empty guild page");
                break;
            }

            debug!(page, count = added.len(), "Fetched guild page");
            members.extend(added);
        }

        info!(total = members.len(), "Guild member list fetched");
        members
    }
}

#[cfg(test)]
mod tests {
    use crate::analyzers::types::Member;
    use crate::config::RetryPolicy;
    use crate::fetch::testing::ScriptedClient;
    use crate::fetch::{Fetcher, RateLimiter};
    use crate::services::GuildApi;
    use std::sync::Arc;

    fn guild_page(names: &[&str]) -> String {
        let members: String = names
            .iter()
            .map(|n| format!(r#"<member name="{n}" date="2020-01-01" />"#))
            .collect();
        format!(r#"<guild id="7" name="Test"><members count="9" page="1">{members}</members></guild>"#)
    }

    fn api(client: Arc<ScriptedClient>, attempts: u32) -> GuildApi<Arc<ScriptedClient>> {
        let fetcher = Fetcher::new(
            client,
            Arc::new(RateLimiter::unlimited()),
            RetryPolicy::immediate(attempts),
        );
        GuildApi::new(fetcher, "https://example.test/xmlapi2").unwrap()
    }

    #[tokio::test]
    async fn test_two_members_then_empty_page() {
        let client = Arc::new(
            ScriptedClient::new()
                .route("page=1", 200, &guild_page(&["alice", "bob"]))
                .route("page=2", 200, &guild_page(&[])),
        );

        let members = api(client.clone(), 3).list_all_members(7).await;

        assert_eq!(members, vec![Member::from("alice"), Member::from("bob")]);
        assert_eq!(client.count("/guild?"), 2);
    }

    #[tokio::test]
    async fn test_pages_concatenate_in_order() {
        let client = Arc::new(
            ScriptedClient::new()
                .route("page=1", 200, &guild_page(&["a", "b"]))
                .route("page=2", 200, &guild_page(&["c"]))
                .route("page=3", 200, &guild_page(&["d", "e"]))
                .route("page=4", 200, &guild_page(&[])),
        );

        let members = api(client.clone(), 3).list_all_members(7).await;

        let names: Vec<_> = members.iter().map(Member::as_str).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        let pages: Vec<_> = client
            .calls()
            .iter()
            .map(|c| c.rsplit("page=").next().unwrap().to_string())
            .collect();
        assert_eq!(pages, vec!["1", "2", "3", "4"]);
    }

    #[tokio::test]
    async fn test_failing_page_ends_pagination_after_retries() {
        let client = Arc::new(
            ScriptedClient::new()
                .route("page=1", 200, &guild_page(&["alice"]))
                .route("page=2", 503, ""),
        );

        let members = api(client.clone(), 3).list_all_members(7).await;

        assert_eq!(members, vec![Member::from("alice")]);
        assert_eq!(client.count("page=2"), 3);
        assert_eq!(client.count("page=3"), 0);
    }

    #[tokio::test]
    async fn test_processing_page_is_retried() {
        let client = Arc::new(
            ScriptedClient::new()
                .route("page=1", 202, "")
                .route("page=1", 200, &guild_page(&["alice"]))
                .route("page=2", 200, &guild_page(&[])),
        );

        let members = api(client.clone(), 3).list_all_members(7).await;

        assert_eq!(members, vec![Member::from("alice")]);
        assert_eq!(client.count("page=1"), 2);
    }

    #[tokio::test]
    async fn test_unknown_guild_is_not_retried() {
        let client = Arc::new(ScriptedClient::new().route(
            "page=1",
            200,
            r#"<guild id="0" termsofuse="x"><error>Guild not found.</error></guild>"#,
        ));

        let members = api(client.clone(), 4).list_all_members(0).await;

        assert!(members.is_empty());
        assert_eq!(client.count("page=1"), 1);
    }
}
