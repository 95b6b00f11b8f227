pub mod backend;
pub mod feed;
pub mod notify;
pub mod overlay;
pub mod session;
pub mod sparks;
pub mod store;

pub use backend::ContributorBackend;
pub use feed::{FeedController, FeedView};
pub use notify::Notifier;
pub use overlay::ConversationOverlay;
pub use session::SessionController;
pub use sparks::SparkActions;
pub use store::Store;
