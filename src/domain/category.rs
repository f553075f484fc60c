/// Release-note category of a change
///
/// Every change lands in exactly one of three buckets, decided by the
/// first path segment of its source branch name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Feature,
    Bugfix,
    Chore,
}

impl Category {
    /// Classify a branch name by its prefix (the substring before the
    /// first `/`, compared case-insensitively)
    ///
    /// `bug/` and `bugfix/` map to [Category::Bugfix], `enhancement/` and
    /// `feature/` map to [Category::Feature]. Anything else, including an
    /// empty branch name, is a [Category::Chore].
    pub fn from_branch(branch_name: &str) -> Self {
        let prefix = branch_name
            .split('/')
            .next()
            .unwrap_or("")
            .to_lowercase();

        match prefix.as_str() {
            "bug" | "bugfix" => Category::Bugfix,
            "enhancement" | "feature" => Category::Feature,
            _ => Category::Chore,
        }
    }

    /// Section heading rendered above this category's entries
    ///
    /// The exact bytes (emoji included) are part of the changelog contract.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Feature => "### Features -- \u{2b50}\u{fe0f}",
            Category::Bugfix => "### Bugfixes -- \u{1f41e}",
            Category::Chore => "### Chores -- \u{2699}",
        }
    }

    /// Fixed rendering order: Feature, Bugfix, Chore
    pub fn all() -> [Category; 3] {
        [Category::Feature, Category::Bugfix, Category::Chore]
    }
}
