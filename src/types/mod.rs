pub mod credential;
pub mod idea;
pub mod story;

pub use credential::Credential;
pub use idea::{DEFAULT_IDEA, Idea};
pub use story::StoryRecord;
