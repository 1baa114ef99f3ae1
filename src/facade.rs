//! Host-facing facade named in spec.md §6: the URI scheme this store
//! answers to, its file-store identifier and attributes, and a
//! process-wide default instance for callers that just want one shared
//! store rather than constructing their own `FileStore`.
//!
//! Grounded on the teacher's provider-constant style (`nfs-mamont`'s
//! `Procedure`/`Reply` enums expose fixed protocol identifiers the same
//! way) generalized to a single-volume in-memory provider instead of a
//! network protocol.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::attr::AttrValue;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::store::FileStore;

/// The URI scheme this provider answers to (spec.md §6).
pub const URI_SCHEME: &str = "memory";

/// Parses a `memory:<path>` style URI down to the path component.
/// Rejects any scheme other than `memory`, matched case-insensitively
/// per spec.md §6; accepts either an authority-style `memory://foo` or
/// a plain `memory:/foo`.
pub fn parse_uri(uri: &str) -> Result<PathBuf> {
    let (scheme, rest) = uri
        .split_once(':')
        .ok_or_else(|| Error::IllegalArgument(format!("illegal argument: missing URI scheme: {uri}")))?;
    if !scheme.eq_ignore_ascii_case(URI_SCHEME) {
        return Err(Error::IllegalArgument(format!("illegal argument: unsupported URI scheme: {uri}")));
    }
    let rest = rest.strip_prefix("//").unwrap_or(rest);
    Ok(if rest.is_empty() { PathBuf::from("/") } else { PathBuf::from(rest) })
}

/// A single-volume-per-process provider can never construct a second
/// file system: "An attempt to create a new file system via this scheme
/// must fail" (spec.md §6).
pub fn new_file_system(uri: &str) -> Result<FileStore> {
    let _ = parse_uri(uri)?;
    Err(Error::already_exists("/"))
}

/// Fixed identity of the single file store this provider exposes.
pub struct FileStoreId;

impl FileStoreId {
    pub const TYPE: &'static str = "memory";
    pub const NAME: &'static str = "/";
    pub const READ_ONLY: bool = false;
}

/// Reads one of the file-store-level (as opposed to per-node)
/// attributes named in spec.md §6.
pub fn store_attribute(store: &FileStore, name: &str) -> Result<AttrValue> {
    let config = store.config();
    match name {
        "totalSpace" => Ok(AttrValue::U64(config.total_space)),
        "usableSpace" => Ok(AttrValue::U64(config.usable_space)),
        "unallocatedSpace" => Ok(AttrValue::U64(config.unallocated_space)),
        other => Err(Error::UnsupportedOperation(format!("unsupported file store attribute: {other}"))),
    }
}

static DEFAULT_STORE: OnceLock<FileStore> = OnceLock::new();

/// The process-wide default store (spec.md §6 "Global store accessor").
pub fn default_store() -> &'static FileStore {
    DEFAULT_STORE.get_or_init(|| FileStore::new(StoreConfig::default()))
}

/// Reads a whole file's content off the default store.
pub fn get_content(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    default_store().get_content(&path.as_ref().to_string_lossy())
}

/// Atomically replaces a whole file's content on the default store,
/// creating it if missing.
pub fn set_content(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    default_store().set_content(&path.as_ref().to_string_lossy(), bytes)
}

/// Removes every entry from the default store, preserving the root.
pub fn clear() {
    default_store().clear()
}
