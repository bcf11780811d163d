// Adapters layer: concrete collaborators for the workflows.

pub mod cache;
pub mod download;
pub mod http;
pub mod notify;

pub use cache::InMemoryThemeCache;
pub use download::{FileDeliveryChannel, FileDownloadHost};
pub use http::GhostAdminClient;
pub use notify::TracingNotifier;
