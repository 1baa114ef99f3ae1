//! An in-memory, hierarchical, POSIX-flavored file store.
//!
//! The store keeps its whole tree in memory behind one lock (see
//! [`FileStore`]); there is no real disk I/O, no network transport, and
//! no OS-level locking underneath it.

mod attr;
mod channel;
mod config;
mod copy_move;
mod dirstream;
mod error;
mod facade;
mod lock;
mod node;
mod options;
mod path;
mod store;

pub use attr::{AttrValue, View};
pub use channel::{FileChannel, InputStream, OnClose, OutputStream};
pub use config::StoreConfig;
pub use dirstream::{DirEntries, DirectoryStream, Filter};
pub use error::{Error, Result};
pub use facade::{
    clear, default_store, get_content, new_file_system, parse_uri, set_content, store_attribute, FileStoreId,
    URI_SCHEME,
};
pub use lock::{LockId, LockInfo, LockTable};
pub use node::FileType;
pub use options::{ChannelMode, CopyOptions, OpenOptions};
pub use store::FileStore;
