pub mod attachment;
pub mod connectivity;
pub mod description;
pub mod resolver;

pub use attachment::AttachmentUploader;
pub use connectivity::ConnectivityProbe;
pub use description::format_description;
pub use resolver::{match_by_name, normalize_name, ResourceResolver};
