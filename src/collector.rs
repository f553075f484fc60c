use std::collections::HashSet;

use futures::future::join_all;

use crate::domain::{ChangeItem, StoryExtractor};
use crate::error::Result;
use crate::hosting::{PullRequestInfo, SourceHost};

/// Walks upstream history and collects the changes that are new since the
/// last published release
///
/// Two equivalent modes: diff against the previous release body
/// ([ChangeSetCollector::collect_since_release]) or against the previous
/// release's head commit SHA ([ChangeSetCollector::collect_since_sha]).
/// Both return items in reverse-chronological order.
pub struct ChangeSetCollector<'a, H: SourceHost> {
    host: &'a H,
    stories: &'a StoryExtractor,
}

impl<'a, H: SourceHost> ChangeSetCollector<'a, H> {
    pub fn new(host: &'a H, stories: &'a StoryExtractor) -> Self {
        ChangeSetCollector { host, stories }
    }

    /// Collect merged pull requests newer than the previous release
    ///
    /// The previous release body yields the known-released story set. The
    /// walk runs newest-first and stops at the first pull request whose
    /// story is already known: everything older has been released too.
    pub async fn collect_since_release(&self, previous_body: &str) -> Result<Vec<ChangeItem>> {
        let known = self.stories.known_story_numbers(previous_body);
        let mut pulls = self.host.closed_pull_requests().await?;
        pulls.sort_by(|a, b| b.merged_at.cmp(&a.merged_at));

        Ok(self.take_until_known(pulls, &known))
    }

    /// Collect changes for every commit newer than the boundary SHA
    ///
    /// The boundary commit and everything older are excluded. Each fresh
    /// commit resolves to its associated pull request when one exists; the
    /// lookups are issued concurrently and joined, which keeps the commit
    /// order intact. Commits without a pull request fall back to their
    /// message text.
    pub async fn collect_since_sha(&self, boundary_sha: &str) -> Result<Vec<ChangeItem>> {
        let commits = self.host.commits().await?;
        let fresh: Vec<_> = commits
            .into_iter()
            .take_while(|c| c.sha != boundary_sha)
            .collect();

        let lookups = fresh.iter().map(|c| self.host.pulls_for_commit(&c.sha));
        let resolved = join_all(lookups).await;

        let mut items = Vec::with_capacity(fresh.len());
        for (commit, pulls) in fresh.iter().zip(resolved) {
            let item = match pulls?.into_iter().next() {
                Some(pull) => ChangeItem {
                    title: pull.title,
                    body: pull.body,
                    branch_name: pull.branch_name,
                    merged_at: None,
                },
                None => ChangeItem::from_commit_message(&commit.message),
            };
            items.push(item);
        }

        Ok(items)
    }

    /// Newest-first walk with the known-released stop condition
    ///
    /// Pull requests closed without merging are skipped without ending the
    /// walk; a story-less pull request can never match the known set and
    /// is always new.
    fn take_until_known(
        &self,
        pulls: Vec<PullRequestInfo>,
        known: &HashSet<String>,
    ) -> Vec<ChangeItem> {
        let mut items = Vec::new();

        for pull in pulls {
            if pull.merged_at.is_none() {
                continue;
            }

            if let Some(number) = self.stories.extract(&pull.title, &pull.body) {
                if known.contains(&number) {
                    break;
                }
            }

            items.push(ChangeItem {
                title: pull.title,
                body: pull.body,
                branch_name: pull.branch_name,
                merged_at: pull.merged_at,
            });
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosting::{CommitPull, MockHost};
    use chrono::{TimeZone, Utc};

    const BASE: &str = "https://app.clubhouse.io/rotabull/story/";

    fn extractor() -> StoryExtractor {
        StoryExtractor::new(BASE).unwrap()
    }

    fn pull(title: &str, branch: &str, merged_hour: Option<u32>) -> PullRequestInfo {
        PullRequestInfo {
            title: title.to_string(),
            body: String::new(),
            branch_name: branch.to_string(),
            merged_at: merged_hour
                .map(|h| Utc.with_ymd_and_hms(2020, 9, 10, h, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_stop_at_first_known_story() {
        let stories = extractor();
        let mut host = MockHost::new();
        host.add_pull_request(pull("[ch3681] Fix attachments", "bug/ch3681", Some(12)));
        host.add_pull_request(pull("[ch3644] Quickbooks worker", "bugfix/qbo", Some(11)));
        host.add_pull_request(pull("[ch3481] Price popover", "bug/ch3481", Some(10)));
        host.add_pull_request(pull("[ch3617] Appcues", "chore/appcues", Some(9)));

        let previous_body = "* Appcues installation improvements [ch3617]\r\n\
                             * Price suggestion popover on repair form [ch3481]\r\n";

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector.collect_since_release(previous_body).await.unwrap();

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["[ch3681] Fix attachments", "[ch3644] Quickbooks worker"]
        );
    }

    #[tokio::test]
    async fn test_unmerged_pulls_are_skipped_not_terminal() {
        let stories = extractor();
        let mut host = MockHost::new();
        host.add_pull_request(pull("Closed without merge", "demo/context-2", None));
        host.add_pull_request(pull("[ch3681] Fix attachments", "bug/ch3681", Some(12)));
        host.add_pull_request(pull("[ch3481] Released already", "bug/ch3481", Some(10)));

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector
            .collect_since_release("old release [ch3481]")
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "[ch3681] Fix attachments");
    }

    #[tokio::test]
    async fn test_sorts_descending_by_merge_time_before_walking() {
        let stories = extractor();
        let mut host = MockHost::new();
        // API order is not merge order
        host.add_pull_request(pull("[ch2] middle", "feature/b", Some(11)));
        host.add_pull_request(pull("[ch3] newest", "feature/c", Some(12)));
        host.add_pull_request(pull("[ch1] oldest", "feature/a", Some(10)));

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector.collect_since_release("").await.unwrap();

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["[ch3] newest", "[ch2] middle", "[ch1] oldest"]);
    }

    #[tokio::test]
    async fn test_story_less_pull_is_always_new() {
        let stories = extractor();
        let mut host = MockHost::new();
        host.add_pull_request(pull("Broken financial emails", "bugfix/emails", Some(12)));

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector
            .collect_since_release("previous [ch3481]")
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_known_set_includes_all_merged() {
        let stories = extractor();
        let mut host = MockHost::new();
        host.add_pull_request(pull("[ch1] a", "feature/a", Some(10)));
        host.add_pull_request(pull("[ch2] b", "bug/b", Some(11)));
        host.add_pull_request(pull("closed without merge", "demo/x", None));

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector.collect_since_release("").await.unwrap();

        // Both merged items survive; the unmerged one is dropped even
        // though nothing terminated the walk before it.
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.merged_at.is_some()));
    }

    #[tokio::test]
    async fn test_sha_mode_stops_at_boundary() {
        let stories = extractor();
        let mut host = MockHost::new();
        host.add_commit("c3", "third");
        host.add_commit("c2", "second");
        host.add_commit("c1", "boundary commit");

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector.collect_since_sha("c1").await.unwrap();

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second"]);
    }

    #[tokio::test]
    async fn test_sha_mode_prefers_associated_pull() {
        let stories = extractor();
        let mut host = MockHost::new();
        host.add_commit("c2", "Merge pull request #1229");
        host.add_commit("c1", "boundary");
        host.add_commit_pull(
            "c2",
            CommitPull {
                title: "[ch3681] Fix attachments".to_string(),
                body: String::new(),
                branch_name: "bug/ch3681".to_string(),
            },
        );

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector.collect_since_sha("c1").await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "[ch3681] Fix attachments");
        assert_eq!(items[0].branch_name, "bug/ch3681");
    }

    #[tokio::test]
    async fn test_sha_mode_falls_back_to_commit_message() {
        let stories = extractor();
        let mut host = MockHost::new();
        host.add_commit(
            "c2",
            "Hotfix config typo\n\nhttps://app.clubhouse.io/rotabull/story/3598",
        );
        host.add_commit("c1", "boundary");

        let collector = ChangeSetCollector::new(&host, &stories);
        let items = collector.collect_since_sha("c1").await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Hotfix config typo");
        assert_eq!(
            stories.extract(&items[0].title, &items[0].body),
            Some("3598".to_string())
        );
    }
}
