use crate::domain::category::Category;
use crate::domain::change::ChangeItem;
use crate::domain::story::StoryExtractor;

/// Changelogs use CRLF terminators regardless of platform; downstream
/// consumers parse the rendered Markdown byte-for-byte.
const LINE_BREAK: &str = "\r\n";
const HEADER: &str = "## What's Changed";
const NO_STORY_LABEL: &str = "NoStoryID";

/// Accumulated release-note lines, keyed by category
///
/// All three categories are always present and start empty. Entries keep
/// their insertion order (reverse-chronological by merge time, the order
/// the collector hands items over) and are never re-sorted.
///
/// The collection is built as a fold: [ReleaseNoteCollection::record]
/// consumes the collection and returns the extended one, so accumulation
/// is a single serialized pass even when the items were fetched
/// concurrently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseNoteCollection {
    features: Vec<String>,
    bugfixes: Vec<String>,
    chores: Vec<String>,
}

impl ReleaseNoteCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one change and append its rendered line
    ///
    /// The line carries the tag-stripped title plus either a story link
    /// (`[ch3681](<base>3681)`) or the `[NoStoryID](<base>null)`
    /// placeholder. The literal `null` URL suffix is a preserved quirk of
    /// the changelog contract, not an accident.
    pub fn record(mut self, item: &ChangeItem, stories: &StoryExtractor) -> Self {
        let title = stories.strip_tags(&item.title);
        let line = match stories.extract(&item.title, &item.body) {
            Some(number) => format!("{} [ch{}]({})", title, number, stories.story_url(&number)),
            None => format!(
                "{} [{}]({}null)",
                title,
                NO_STORY_LABEL,
                stories.tracker_base_url()
            ),
        };

        self.entries_for(Category::from_branch(&item.branch_name))
            .push(line);
        self
    }

    /// Entries recorded for a category, in insertion order
    pub fn entries(&self, category: Category) -> &[String] {
        match category {
            Category::Feature => &self.features,
            Category::Bugfix => &self.bugfixes,
            Category::Chore => &self.chores,
        }
    }

    /// Total entry count across all categories
    pub fn total(&self) -> usize {
        self.features.len() + self.bugfixes.len() + self.chores.len()
    }

    /// Render the changelog body
    ///
    /// Categories appear in the fixed order Feature, Bugfix, Chore; empty
    /// categories are skipped entirely. An empty collection renders to the
    /// empty string, with no header.
    pub fn render(&self) -> String {
        if self.total() == 0 {
            return String::new();
        }

        let mut body = String::from(HEADER);
        body.push_str(LINE_BREAK);

        for category in Category::all() {
            let entries = self.entries(category);
            if entries.is_empty() {
                continue;
            }

            body.push_str(LINE_BREAK);
            body.push_str(category.heading());
            body.push_str(LINE_BREAK);

            for entry in entries {
                body.push_str(LINE_BREAK);
                body.push_str("* ");
                body.push_str(entry);
                body.push_str(LINE_BREAK);
            }
        }

        body
    }

    fn entries_for(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Feature => &mut self.features,
            Category::Bugfix => &mut self.bugfixes,
            Category::Chore => &mut self.chores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://app.clubhouse.io/rotabull/story/";

    fn extractor() -> StoryExtractor {
        StoryExtractor::new(BASE).unwrap()
    }

    fn item(title: &str, body: &str, branch: &str) -> ChangeItem {
        ChangeItem {
            title: title.to_string(),
            body: body.to_string(),
            branch_name: branch.to_string(),
            merged_at: None,
        }
    }

    #[test]
    fn test_empty_collection_renders_empty_string() {
        assert_eq!(ReleaseNoteCollection::new().render(), "");
    }

    #[test]
    fn test_record_places_line_in_branch_category() {
        let stories = extractor();
        let collection = ReleaseNoteCollection::new()
            .record(&item("[ch3681] Fix attachments", "", "bug/ch3681"), &stories);

        assert_eq!(
            collection.entries(Category::Bugfix),
            &[format!("Fix attachments [ch3681]({}3681)", BASE)]
        );
        assert!(collection.entries(Category::Feature).is_empty());
        assert!(collection.entries(Category::Chore).is_empty());
    }

    #[test]
    fn test_record_without_story_uses_placeholder() {
        let stories = extractor();
        let collection = ReleaseNoteCollection::new().record(
            &item("Broken financial emails", "no links here", "bugfix/broken-financial-emails"),
            &stories,
        );

        assert_eq!(
            collection.entries(Category::Bugfix),
            &[format!("Broken financial emails [NoStoryID]({}null)", BASE)]
        );
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let stories = extractor();
        let collection = ReleaseNoteCollection::new()
            .record(&item("[ch1] Newest", "", "feature/a"), &stories)
            .record(&item("[ch2] Older", "", "feature/b"), &stories);

        let entries = collection.entries(Category::Feature);
        assert!(entries[0].starts_with("Newest"));
        assert!(entries[1].starts_with("Older"));
    }

    #[test]
    fn test_render_exact_byte_sequence() {
        let collection = ReleaseNoteCollection {
            features: vec!["Story 1 [ch2222](www.google.com)".to_string()],
            bugfixes: vec!["Story 3 [ch1234](www.google3.com)".to_string()],
            chores: vec!["Story 2 [ch3333](www.google2.com)".to_string()],
        };

        assert_eq!(
            collection.render(),
            "## What's Changed\r\n\r\n### Features -- \u{2b50}\u{fe0f}\r\n\
             \r\n* Story 1 [ch2222](www.google.com)\r\n\
             \r\n### Bugfixes -- \u{1f41e}\r\n\
             \r\n* Story 3 [ch1234](www.google3.com)\r\n\
             \r\n### Chores -- \u{2699}\r\n\
             \r\n* Story 2 [ch3333](www.google2.com)\r\n"
        );
    }

    #[test]
    fn test_render_skips_empty_categories() {
        let stories = extractor();
        let rendered = ReleaseNoteCollection::new()
            .record(&item("[ch9] Solo chore", "", "chore/cleanup"), &stories)
            .render();

        assert!(rendered.starts_with("## What's Changed\r\n"));
        assert!(rendered.contains("### Chores"));
        assert!(!rendered.contains("### Features"));
        assert!(!rendered.contains("### Bugfixes"));
    }

    #[test]
    fn test_render_multiple_entries_per_category() {
        let collection = ReleaseNoteCollection {
            features: vec![],
            bugfixes: vec!["first [ch1](u1)".to_string(), "second [ch2](u2)".to_string()],
            chores: vec![],
        };

        assert_eq!(
            collection.render(),
            "## What's Changed\r\n\r\n### Bugfixes -- \u{1f41e}\r\n\
             \r\n* first [ch1](u1)\r\n\
             \r\n* second [ch2](u2)\r\n"
        );
    }
}
