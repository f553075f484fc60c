//! Release assembly workflow
//!
//! Ties the pieces together: look up the previous release, sequence the
//! next tag, collect the new change set, and compose the changelog body.
//! Decoupled from CLI parsing so the workflow can be driven
//! programmatically and tested against a mock host.

use chrono::NaiveDate;

use crate::collector::ChangeSetCollector;
use crate::domain::{next_release_tag, release_title, ReleaseNoteCollection, StoryExtractor};
use crate::error::{ReleasePilotError, Result};
use crate::hosting::SourceHost;

/// How the new change set is diffed against the previous release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Diff story references against the previous release body
    ReleaseDiff,
    /// Walk commits down to the previous release's head commit
    ShaDiff,
}

/// The three durable artifacts of a release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledRelease {
    pub tag: String,
    pub title: String,
    pub body: String,
}

/// Assemble the next release: tag, title and changelog body
///
/// A repository without a previous release starts from scratch: empty
/// known-released set, fresh date tag, and (in SHA mode) no boundary
/// commit, so the whole fetched commit page counts as new.
pub async fn assemble_release<H: SourceHost>(
    host: &H,
    stories: &StoryExtractor,
    mode: DiffMode,
    today: NaiveDate,
) -> Result<AssembledRelease> {
    let previous = host.latest_release().await?;
    let tag = next_release_tag(previous.as_ref().map(|r| r.tag_name.as_str()), today);

    let collector = ChangeSetCollector::new(host, stories);
    let items = match mode {
        DiffMode::ReleaseDiff => {
            let previous_body = previous.as_ref().map(|r| r.body.as_str()).unwrap_or("");
            collector.collect_since_release(previous_body).await?
        }
        DiffMode::ShaDiff => match &previous {
            Some(release) => {
                let boundary = boundary_sha(host, &release.tag_name).await?;
                collector.collect_since_sha(&boundary).await?
            }
            None => collector.collect_since_sha("").await?,
        },
    };

    let collection = items
        .iter()
        .fold(ReleaseNoteCollection::new(), |acc, item| {
            acc.record(item, stories)
        });

    Ok(AssembledRelease {
        title: release_title(&tag),
        body: collection.render(),
        tag,
    })
}

/// Resolve a release tag name to its head commit SHA
///
/// The latest release pointing at a tag the repository no longer lists is
/// unrecoverable in SHA mode.
async fn boundary_sha<H: SourceHost>(host: &H, tag_name: &str) -> Result<String> {
    host.tags()
        .await?
        .into_iter()
        .find(|t| t.name == tag_name)
        .map(|t| t.commit_sha)
        .ok_or_else(|| {
            ReleasePilotError::tag(format!(
                "release tag '{}' not found among repository tags",
                tag_name
            ))
        })
}
