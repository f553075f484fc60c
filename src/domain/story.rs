use std::collections::HashSet;

use regex::Regex;

use crate::error::{ReleasePilotError, Result};

/// Extracts ticket-tracker story references from change titles and bodies
///
/// A story reference is carried either as a bracketed tag (`[ch3681]`) in
/// the title or as a story permalink under the configured tracker base URL
/// in the body. The title always wins; a change with neither is a normal,
/// story-less change.
pub struct StoryExtractor {
    tracker_base_url: String,
    title_tag: Regex,
    body_permalink: Regex,
}

impl StoryExtractor {
    /// Build an extractor for the given tracker base URL
    ///
    /// The permalink pattern is derived from the base URL, so a tracker
    /// move only requires a configuration change.
    pub fn new(tracker_base_url: impl Into<String>) -> Result<Self> {
        let tracker_base_url = tracker_base_url.into();
        let title_tag = Regex::new(r"\[ch(\d+)\]")
            .map_err(|e| ReleasePilotError::config(format!("invalid story tag pattern: {}", e)))?;
        let body_permalink = Regex::new(&format!(r"{}(\d+)", regex::escape(&tracker_base_url)))
            .map_err(|e| {
                ReleasePilotError::config(format!("invalid tracker base URL pattern: {}", e))
            })?;

        Ok(StoryExtractor {
            tracker_base_url,
            title_tag,
            body_permalink,
        })
    }

    /// The configured tracker base URL
    pub fn tracker_base_url(&self) -> &str {
        &self.tracker_base_url
    }

    /// Extract a story number, title first, then body permalink
    pub fn extract(&self, title: &str, body: &str) -> Option<String> {
        self.from_title(title).or_else(|| self.from_body(body))
    }

    /// First `[ch<digits>]` tag in the title, if any
    pub fn from_title(&self, title: &str) -> Option<String> {
        self.title_tag
            .captures(title)
            .map(|caps| caps[1].to_string())
    }

    /// First story permalink in the body, if any
    pub fn from_body(&self, body: &str) -> Option<String> {
        self.body_permalink
            .captures(body)
            .map(|caps| caps[1].to_string())
    }

    /// Remove every `[ch<digits>]` tag from a title and trim whitespace
    pub fn strip_tags(&self, title: &str) -> String {
        self.title_tag.replace_all(title, "").trim().to_string()
    }

    /// Every story number tagged in a release body
    ///
    /// This is the known-released set: stories already mentioned in the
    /// previous release, used as the stop condition when walking history.
    pub fn known_story_numbers(&self, release_body: &str) -> HashSet<String> {
        self.title_tag
            .captures_iter(release_body)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Permalink for a story number
    pub fn story_url(&self, number: &str) -> String {
        format!("{}{}", self.tracker_base_url, number)
    }
}
