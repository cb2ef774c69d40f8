//! End-to-end run: members → ratings → per-item aggregate → report.

use tracing::info;

use crate::analyzers::aggregate::aggregate;
use crate::fetch::HttpClient;
use crate::services::GuildApi;
use crate::stats::{ReportRow, report};

/// Builds the ratings report for every member of `guild_id`.
///
/// Members whose data cannot be fetched simply contribute nothing, so this
/// always yields a (possibly partial or empty) report.
#[tracing::instrument(skip(api))]
pub async fn rate_guild<C: HttpClient>(api: &GuildApi<C>, guild_id: u64) -> Vec<ReportRow> {
    let members = api.list_all_members(guild_id).await;
    let group = api.collect_all(&members).await;

    let items = aggregate(&group);
    info!(items = items.len(), "Aggregated ratings per item");

    report(&items)
}
