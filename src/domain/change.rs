use chrono::{DateTime, Utc};

/// One merged pull request or, when no pull request exists, one commit
///
/// Materialized transiently per run from the upstream history and never
/// persisted. Items without a merge timestamp are excluded by the
/// collector before they reach composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeItem {
    pub title: String,
    pub body: String,
    pub branch_name: String,
    pub merged_at: Option<DateTime<Utc>>,
}

impl ChangeItem {
    /// Build a change item from a commit message when no pull request is
    /// associated with the commit
    ///
    /// The first message line doubles as the title and as the text the
    /// branch-prefix classifier sees; the remaining lines become the body
    /// so a story permalink further down is still found.
    pub fn from_commit_message(message: &str) -> Self {
        let mut lines = message.splitn(2, '\n');
        let title = lines.next().unwrap_or("").trim_end_matches('\r').to_string();
        let body = lines.next().unwrap_or("").to_string();

        ChangeItem {
            branch_name: title.clone(),
            title,
            body,
            merged_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_commit_message_splits_title_and_body() {
        let item = ChangeItem::from_commit_message(
            "Fix locatory import\n\nSee https://app.clubhouse.io/rotabull/story/3412",
        );
        assert_eq!(item.title, "Fix locatory import");
        assert!(item.body.contains("story/3412"));
        assert_eq!(item.merged_at, None);
    }

    #[test]
    fn test_from_commit_message_single_line() {
        let item = ChangeItem::from_commit_message("Update README");
        assert_eq!(item.title, "Update README");
        assert_eq!(item.body, "");
    }

    #[test]
    fn test_from_commit_message_strips_carriage_return() {
        let item = ChangeItem::from_commit_message("Update README\r\nmore");
        assert_eq!(item.title, "Update README");
        assert_eq!(item.body, "more");
    }
}
