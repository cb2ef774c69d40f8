//! Guild-level operations against the XML API.
//!
//! [`GuildApi`] knows the two endpoints the pipeline needs and runs every
//! request through one shared [`Fetcher`], so all calls obey the same rate
//! limit and retry policy.

mod members;
mod ratings;

use reqwest::Url;

use crate::analyzers::types::Member;
use crate::error::FetchError;
use crate::fetch::{Fetcher, HttpClient};

pub struct GuildApi<C> {
    fetcher: Fetcher<C>,
    base_url: Url,
}

impl<C: HttpClient> GuildApi<C> {
    /// # Errors
    ///
    /// [`FetchError::InvalidUrl`] if `base_url` is not an absolute http(s) URL.
    pub fn new(fetcher: Fetcher<C>, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { fetcher, base_url })
    }

    /// `{base}/collection?username={member}&rated=1&stats=1`
    pub fn collection_url(&self, member: &Member) -> String {
        self.endpoint(
            "collection",
            &[("username", member.as_str()), ("rated", "1"), ("stats", "1")],
        )
    }

    /// `{base}/guild?id={guild_id}&members=1&page={page}`
    pub fn guild_url(&self, guild_id: u64, page: u32) -> String {
        let (id, page) = (guild_id.to_string(), page.to_string());
        self.endpoint(
            "guild",
            &[("id", id.as_str()), ("members", "1"), ("page", page.as_str())],
        )
    }

    fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> String {
        let mut url = self.base_url.clone();
        let path = format!("{}/{}", self.base_url.path().trim_end_matches('/'), name);
        url.set_path(&path);
        url.query_pairs_mut().clear().extend_pairs(params);
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use crate::fetch::RateLimiter;
    use crate::fetch::testing::ScriptedClient;
    use std::sync::Arc;

    fn api(base: &str) -> Result<GuildApi<ScriptedClient>, FetchError> {
        let fetcher = Fetcher::new(
            ScriptedClient::new(),
            Arc::new(RateLimiter::unlimited()),
            RetryPolicy::immediate(1),
        );
        GuildApi::new(fetcher, base)
    }

    #[test]
    fn test_endpoint_urls() {
        let api = api("https://www.boardgamegeek.com/xmlapi2").unwrap();

        assert_eq!(
            api.collection_url(&Member::from("alice")),
            "https://www.boardgamegeek.com/xmlapi2/collection?username=alice&rated=1&stats=1"
        );
        assert_eq!(
            api.guild_url(2708, 3),
            "https://www.boardgamegeek.com/xmlapi2/guild?id=2708&members=1&page=3"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_and_encoding() {
        let api = api("http://localhost:8080/api/").unwrap();

        assert_eq!(
            api.collection_url(&Member::from("jo smith&co")),
            "http://localhost:8080/api/collection?username=jo+smith%26co&rated=1&stats=1"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(api("nope"), Err(FetchError::InvalidUrl(_))));
        assert!(matches!(api("ftp://example.test"), Err(FetchError::InvalidUrl(_))));
    }
}
