//! Directory stream --- snapshot-at-open, re-resolve-at-iterate
//! enumeration (spec.md §4.4).
//!
//! The snapshot is the set of names only, not borrowed Node references:
//! resolving those names back onto the live tree is the store's job, not
//! this type's, which keeps a [`DirectoryStream`] from needing to hold
//! the store's lock for its entire lifetime. Since invariant 5 requires
//! that removing every child mid-iteration still yields every
//! snapshotted name, the filter here is deliberately just a name
//! predicate rather than something that re-examines the live node ---
//! consulting the live tree at iterate time would make that invariant
//! unsatisfiable whenever a matching child had since been removed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// A name predicate consulted during look-ahead. An `Err` from the
/// filter is surfaced wrapped in [`Error::DirectoryIterationError`].
pub type Filter = Box<dyn Fn(&str) -> Result<bool> + Send + Sync>;

/// A directory listing snapshotted at construction time.
pub struct DirectoryStream {
    parent_path: PathBuf,
    names: Vec<String>,
    filter: Option<Filter>,
    iterator_taken: bool,
    closed: Arc<AtomicBool>,
}

impl DirectoryStream {
    /// Snapshots `names` (sorted lexicographically) under `parent_path`.
    pub fn new(parent_path: PathBuf, mut names: Vec<String>, filter: Option<Filter>) -> Self {
        names.sort();
        DirectoryStream { parent_path, names, filter, iterator_taken: false, closed: Arc::new(AtomicBool::new(false)) }
    }

    /// Returns the (single-use) iterator over this stream's snapshot.
    ///
    /// Fails with an `IllegalState` lifecycle error if called a second
    /// time, or after [`DirectoryStream::close`].
    pub fn iterator(&mut self) -> Result<DirEntries> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::IllegalState("stream closed".to_owned()));
        }
        if self.iterator_taken {
            return Err(Error::IllegalState("iterator already returned".to_owned()));
        }
        self.iterator_taken = true;
        Ok(DirEntries {
            parent_path: self.parent_path.clone(),
            names: std::mem::take(&mut self.names).into_iter(),
            filter: self.filter.take(),
            closed: Arc::clone(&self.closed),
        })
    }

    /// Idempotent. Closing mid-iteration causes any outstanding
    /// [`DirEntries`] to become exhausted after whatever it has already
    /// prepared.
    pub fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// The single-use iterator returned by [`DirectoryStream::iterator`].
///
/// Yields `parent_path.join(child_name)` for every snapshotted name
/// that passes the filter, in lexicographic order.
pub struct DirEntries {
    parent_path: PathBuf,
    names: std::vec::IntoIter<String>,
    filter: Option<Filter>,
    closed: Arc<AtomicBool>,
}

impl Iterator for DirEntries {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.closed.load(Ordering::SeqCst) {
                return None;
            }
            let name = self.names.next()?;
            match &self.filter {
                None => return Some(Ok(self.parent_path.join(&name))),
                Some(filter) => match filter(&name) {
                    Ok(true) => return Some(Ok(self.parent_path.join(&name))),
                    Ok(false) => continue,
                    Err(cause) => return Some(Err(Error::DirectoryIterationError(Box::new(cause)))),
                },
            }
        }
    }
}
