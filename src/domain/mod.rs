//! Domain logic - pure release-note rules independent of upstream APIs

pub mod category;
pub mod change;
pub mod notes;
pub mod story;
pub mod tag;

pub use category::Category;
pub use change::ChangeItem;
pub use notes::ReleaseNoteCollection;
pub use story::StoryExtractor;
pub use tag::{next_release_tag, release_title};
