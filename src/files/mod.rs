//! Filesystem-backed handlers: static serving, directory listing, upload
//! and delete. All four share one mount/path resolution rule.

pub mod deleter;
pub mod indexer;
pub mod static_files;
pub mod uploader;

mod path;

pub use deleter::Deleter;
pub use indexer::DirIndex;
pub use static_files::StaticFiles;
pub use uploader::Uploader;

pub(crate) use path::resolve;
