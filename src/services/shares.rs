//! Share aggregation
//!
//! Fans out to every enabled endpoint at once, then flattens, normalizes,
//! filters and merges the records into one listing. A failing endpoint
//! fails the whole call; a record that cannot be read is only skipped.

use anyhow::Result;
use futures::future::try_join_all;

use crate::api::{ShareEndpoint, ShareSource};
use crate::logic::merge::{filter_by_share_types, merge_by_source};
use crate::logic::normalize::normalize_record;
use crate::logic::views::{ShareView, SharesQuery};
use crate::model::node::{Contents, Context, RootFolder, SkippedRecord};

/// Endpoints a query fans out to, in result order
pub fn endpoints_for(query: &SharesQuery) -> Vec<ShareEndpoint> {
    let mut endpoints = Vec::new();
    if query.received {
        endpoints.push(ShareEndpoint::SharedWithMe);
        endpoints.push(ShareEndpoint::Remote);
    }
    if query.sent {
        endpoints.push(ShareEndpoint::SharedWithOthers);
    }
    if query.pending {
        endpoints.push(ShareEndpoint::Pending);
        endpoints.push(ShareEndpoint::RemotePending);
    }
    if query.deleted {
        endpoints.push(ShareEndpoint::Deleted);
    }
    endpoints
}

/// Build one merged share listing
pub async fn get_contents<S>(source: &S, ctx: &Context, query: &SharesQuery) -> Result<Contents>
where
    S: ShareSource + ?Sized,
{
    let endpoints = endpoints_for(query);
    tracing::debug!(?endpoints, share_types = ?query.share_types, "aggregating shares");

    let responses = try_join_all(endpoints.iter().map(|&endpoint| async move {
        let records = source.fetch_shares(endpoint).await?;
        tracing::debug!(endpoint = endpoint.label(), count = records.len(), "fetched shares");
        Ok::<_, anyhow::Error>((endpoint, records))
    }))
    .await?;

    let records = responses
        .into_iter()
        .flat_map(|(endpoint, records)| records.into_iter().map(move |r| (endpoint, r)));

    let mut nodes = Vec::new();
    let mut skipped = Vec::new();
    for (index, (endpoint, record)) in records.enumerate() {
        match normalize_record(&record, endpoint, ctx) {
            Ok(node) => nodes.push(node),
            Err(error) => {
                tracing::warn!(
                    %error,
                    endpoint = endpoint.label(),
                    index,
                    "Error while parsing OCS entry"
                );
                skipped.push(SkippedRecord {
                    index,
                    endpoint,
                    reason: error.to_string(),
                });
            }
        }
    }

    let nodes = merge_by_source(filter_by_share_types(nodes, &query.share_types));
    tracing::info!(
        nodes = nodes.len(),
        skipped = skipped.len(),
        "share listing ready"
    );

    Ok(Contents {
        folder: RootFolder::for_context(ctx),
        nodes,
        skipped,
    })
}

/// Build the listing of a named view
pub async fn get_view_contents<S>(source: &S, ctx: &Context, view: ShareView) -> Result<Contents>
where
    S: ShareSource + ?Sized,
{
    let mut contents = get_contents(source, ctx, &view.query()).await?;
    contents.nodes.retain(|node| view.accepts(node));
    Ok(contents)
}
