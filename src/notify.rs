//! Pipeline orchestration: inspect the revision, build the card, deliver it.

use tracing::{debug, info};

use crate::NotifyConfig;
use crate::card::build_card;
use crate::context::RevisionContext;
use crate::delivery::{WebhookTransport, deliver_card};
use crate::error::Result;
use crate::git::RevisionInspector;

/// Run the whole notification pipeline once. Any stage error aborts the
/// run; nothing is delivered after a failure.
pub async fn run<I, T>(
    config: &NotifyConfig,
    context: &RevisionContext,
    inspector: &I,
    transport: &T,
) -> Result<()>
where
    I: RevisionInspector,
    T: WebhookTransport,
{
    let commit_message = inspector.commit_message().await?;
    debug!("Latest commit message: {:?}", commit_message);

    let changed_files = inspector.changed_files(&config.diff_base).await?;
    info!(
        "Notifying '{}' for {}/{} ({} changed file(s))",
        config.status.title(),
        context.repo_owner,
        context.repo_name,
        changed_files.len()
    );

    let card = build_card(
        config.status,
        context,
        &commit_message,
        Some(changed_files.as_slice()),
    );
    deliver_card(transport, &config.webhook_url, &card).await
}
