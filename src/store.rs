//! `FileStore` --- the top-level façade tying [`crate::node`],
//! [`crate::path`], [`crate::channel`], [`crate::dirstream`], and
//! [`crate::copy_move`] to a single root directory (spec.md §4's
//! `FileStore` row and §6's "File-store identifier").
//!
//! Grounded on `examples/RMamonts-nfs-mamont/examples/shadow_fs/fs/mod.rs`'s
//! shape --- one struct owning the tree, with each public method
//! resolving a path under a guard and then delegating to node-level
//! primitives --- but guarded by a `std::sync::RwLock` instead of
//! dispatching to `tokio::fs`, since this store never touches real disk
//! (spec.md §5).

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::attr::{self, AttrValue, View};
use crate::channel::{FileChannel, InputStream, OutputStream, OnClose};
use crate::config::StoreConfig;
use crate::copy_move;
use crate::dirstream::{DirectoryStream, Filter};
use crate::error::{Error, Result};
use crate::node::{DirectoryData, FileType, Node};
use crate::options::{ChannelMode, CopyOptions, OpenOptions};
use crate::path::{self, ResolvePolicy};

/// A single in-memory volume: one root directory plus the tunables in
/// [`StoreConfig`].
pub struct FileStore {
    root: Arc<RwLock<DirectoryData>>,
    config: StoreConfig,
}

impl FileStore {
    pub fn new(config: StoreConfig) -> Self {
        FileStore { root: Arc::new(RwLock::new(DirectoryData::root())), config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn follow_policy(&self, nofollow_links: bool) -> ResolvePolicy {
        ResolvePolicy::new(!nofollow_links, self.config.max_link_hops)
    }

    /// Resolves `path` to its canonical absolute, `.`-/`..`-normalized,
    /// link-resolved form (spec.md §4.1 step 5).
    pub fn to_real_path(&self, path: &str, nofollow_links: bool) -> Result<PathBuf> {
        let root = self.root.read().unwrap();
        let (_, stack) = path::resolve(&root, path, self.follow_policy(nofollow_links))?;
        Ok(PathBuf::from(path::canonical_path_string(&stack)))
    }

    pub fn exists(&self, path: &str) -> bool {
        let root = self.root.read().unwrap();
        path::resolve(&root, path, self.follow_policy(false)).is_ok()
    }

    /// Creates a new, empty directory at `path` (spec.md §3 Lifecycle).
    /// `creation_attrs` follows the `view:name=value(,...)*` grammar of
    /// §4.7; an empty string applies no attributes.
    pub fn create_directory(&self, path: &str, creation_attrs: &str) -> Result<()> {
        tracing::debug!(path, "create_directory");
        let assignments = parse_creation_attrs(creation_attrs)?;
        let mut root = self.root.write().unwrap();
        let (parent, name, parent_path) = path::resolve_parent_mut(&mut root, path, self.config.max_link_hops)?;
        if parent.attrs.read_only {
            return Err(Error::access_denied(parent_path));
        }
        if parent.children.contains_key(&name) {
            return Err(Error::already_exists(joined(&parent_path, &name)));
        }
        let mut node = Node::new_directory();
        apply_creation_attrs(&mut node, &assignments)?;
        parent.children.insert(name, node);
        Ok(())
    }

    /// Creates a symbolic link at `path` whose textual target is
    /// `target` (spec.md §3 Lifecycle, §6 "symbolic link creation").
    pub fn create_symbolic_link(&self, path: &str, target: &str, creation_attrs: &str) -> Result<()> {
        tracing::debug!(path, target, "create_symbolic_link");
        let assignments = parse_creation_attrs(creation_attrs)?;
        let mut root = self.root.write().unwrap();
        let (parent, name, parent_path) = path::resolve_parent_mut(&mut root, path, self.config.max_link_hops)?;
        if parent.attrs.read_only {
            return Err(Error::access_denied(parent_path));
        }
        if parent.children.contains_key(&name) {
            return Err(Error::already_exists(joined(&parent_path, &name)));
        }
        let mut node = Node::new_link(target.to_owned());
        apply_creation_attrs(&mut node, &assignments)?;
        parent.children.insert(name, node);
        Ok(())
    }

    /// Creates a new directory slot at `link_path` sharing the same
    /// `SharedFile` as `existing_path` --- a hard link (spec.md §4.6's
    /// "Shared File nodes" design note). Fails with `IsDirectory` if
    /// `existing_path` names a directory.
    pub fn create_link(&self, link_path: &str, existing_path: &str) -> Result<()> {
        tracing::debug!(link_path, existing_path, "create_link");
        let mut root = self.root.write().unwrap();
        let shared = {
            let policy = self.follow_policy(false);
            let (resolved, stack) = path::resolve(&root, existing_path, policy)?;
            let canonical = PathBuf::from(path::canonical_path_string(&stack));
            match resolved.node() {
                Some(Node::File(file)) => Arc::clone(file),
                Some(Node::Directory(_)) | None => return Err(Error::is_directory(canonical)),
                Some(Node::Link(_)) => return Err(Error::is_directory(canonical)),
            }
        };

        let (parent, name, parent_path) = path::resolve_parent_mut(&mut root, link_path, self.config.max_link_hops)?;
        if parent.attrs.read_only {
            return Err(Error::access_denied(parent_path));
        }
        if parent.children.contains_key(&name) {
            return Err(Error::already_exists(joined(&parent_path, &name)));
        }
        parent.children.insert(name, Node::share_file(&shared));
        Ok(())
    }

    /// Reads the textual target of the symbolic link at `path`, without
    /// following it.
    pub fn read_symbolic_link(&self, path: &str) -> Result<String> {
        let root = self.root.read().unwrap();
        let policy = ResolvePolicy::new(false, self.config.max_link_hops);
        let (resolved, stack) = path::resolve(&root, path, policy)?;
        let canonical = PathBuf::from(path::canonical_path_string(&stack));
        Ok(resolved.as_link(&canonical)?.target.clone())
    }

    /// Opens a seekable byte channel on the file at `path` (spec.md
    /// §4.2/§4.3). `creation_attrs` applies only when this call creates
    /// the file.
    pub fn open_channel(&self, path: &str, options: OpenOptions, creation_attrs: &str) -> Result<FileChannel> {
        let mode = options.validate_for_channel()?;
        self.open_with_mode(path, mode, creation_attrs)
    }

    /// Opens a read-only [`InputStream`] on the file at `path` (spec.md
    /// §4.2 "For input streams").
    pub fn open_input_stream(&self, path: &str, options: OpenOptions) -> Result<InputStream> {
        let mode = options.validate_for_input_stream()?;
        let channel = self.open_with_mode(path, mode, "")?;
        Ok(InputStream::from_channel(channel))
    }

    /// Opens a write-only [`OutputStream`] on the file at `path` (spec.md
    /// §4.2 "For output streams": `create` defaults on).
    pub fn open_output_stream(&self, path: &str, options: OpenOptions) -> Result<OutputStream> {
        let mode = options.validate_for_output_stream()?;
        let channel = self.open_with_mode(path, mode, "")?;
        OutputStream::from_channel(channel)
    }

    fn open_with_mode(&self, path: &str, mode: ChannelMode, creation_attrs: &str) -> Result<FileChannel> {
        tracing::trace!(path, "open");
        let assignments = parse_creation_attrs(creation_attrs)?;
        let mut root = self.root.write().unwrap();
        let policy = self.follow_policy(mode.nofollow_links);

        let (shared, canonical_path) = match path::resolve(&root, path, policy) {
            Ok((resolved, stack)) => {
                let canonical = PathBuf::from(path::canonical_path_string(&stack));
                match resolved.node() {
                    Some(Node::File(file)) => {
                        if mode.create_new {
                            return Err(Error::already_exists(canonical));
                        }
                        if mode.writable && file.lock().unwrap().attrs.read_only {
                            return Err(Error::access_denied(canonical));
                        }
                        (Arc::clone(file), canonical)
                    }
                    Some(Node::Directory(_)) | None => return Err(Error::is_directory(canonical)),
                    Some(Node::Link(_)) => return Err(Error::is_directory(canonical)),
                }
            }
            Err(Error::NoSuchFile(missing)) => {
                if !mode.create && !mode.create_new {
                    return Err(Error::NoSuchFile(missing));
                }
                let (parent, name, parent_path) =
                    path::resolve_parent_mut(&mut root, path, self.config.max_link_hops)?;
                if parent.attrs.read_only {
                    return Err(Error::access_denied(parent_path));
                }
                if parent.children.contains_key(&name) {
                    return Err(Error::already_exists(joined(&parent_path, &name)));
                }
                let mut node = Node::new_file();
                apply_creation_attrs(&mut node, &assignments)?;
                let shared = match &node {
                    Node::File(file) => Arc::clone(file),
                    _ => unreachable!("just constructed as Node::new_file"),
                };
                let canonical = joined(&parent_path, &name);
                parent.children.insert(name, node);
                (shared, canonical)
            }
            Err(other) => return Err(other),
        };
        drop(root);

        let on_close = self.delete_on_close_hook(mode.delete_on_close, path.to_owned());
        Ok(FileChannel::open(
            shared,
            canonical_path,
            mode.readable,
            mode.writable,
            mode.append,
            mode.truncate_existing,
            on_close,
        ))
    }

    fn delete_on_close_hook(&self, requested: bool, path: String) -> Option<OnClose> {
        if !requested {
            return None;
        }
        let root = Arc::clone(&self.root);
        let max_link_hops = self.config.max_link_hops;
        Some(Box::new(move || {
            let _ = delete_at(&root, &path, max_link_hops, false);
        }))
    }

    /// Removes the node at `path`. Fails with `NoSuchFile` if absent, or
    /// `DirectoryNotEmpty` if it is a non-empty directory.
    pub fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(path, "delete");
        delete_at(&self.root, path, self.config.max_link_hops, false)
    }

    /// Like [`FileStore::delete`], but returns `Ok(false)` instead of
    /// failing when the path does not exist.
    pub fn delete_if_exists(&self, path: &str) -> Result<bool> {
        match delete_at(&self.root, path, self.config.max_link_hops, false) {
            Ok(()) => Ok(true),
            Err(Error::NoSuchFile(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Opens a [`DirectoryStream`] snapshotting the children of `path` at
    /// call time (spec.md §4.4). `filter` is consulted during look-ahead
    /// over the snapshot, not against the live tree.
    pub fn read_directory(&self, path: &str, filter: Option<Filter>) -> Result<DirectoryStream> {
        let root = self.root.read().unwrap();
        let policy = self.follow_policy(false);
        let (resolved, stack) = path::resolve(&root, path, policy)?;
        let canonical = PathBuf::from(path::canonical_path_string(&stack));
        let dir = resolved.as_directory(&root, &canonical)?;
        let names: Vec<String> = dir.children.keys().cloned().collect();
        Ok(DirectoryStream::new(canonical, names, filter))
    }

    /// Copies `source` onto `target` (spec.md §4.6).
    pub fn copy(&self, source: &str, target: &str, options: CopyOptions) -> Result<()> {
        tracing::debug!(source, target, "copy");
        let mut root = self.root.write().unwrap();
        copy_move::copy(&mut root, source, target, options, self.config.max_link_hops)
    }

    /// Moves `source` onto `target` (spec.md §4.6).
    pub fn mv(&self, source: &str, target: &str, options: CopyOptions) -> Result<()> {
        tracing::debug!(source, target, "move");
        let mut root = self.root.write().unwrap();
        copy_move::mv(&mut root, source, target, options, self.config.max_link_hops)
    }

    /// Reads every attribute named by `spec` (`view?:name(,name)*`) off
    /// `path` (spec.md §4.7).
    pub fn read_attributes(
        &self,
        path: &str,
        spec: &str,
        nofollow_links: bool,
    ) -> Result<std::collections::BTreeMap<String, AttrValue>> {
        let root = self.root.read().unwrap();
        let policy = self.follow_policy(nofollow_links);
        let (resolved, _stack) = path::resolve(&root, path, policy)?;
        match resolved.node() {
            Some(node) => attr::read_view(node, spec),
            None => attr::read_view_raw(&root.attrs, FileType::Directory, 0, spec),
        }
    }

    /// Writes a single named attribute on `path` (spec.md §4.7). The
    /// root itself cannot be the target of a structural mutation, but
    /// spec.md does not forbid retagging its own `hidden`/`readOnly`
    /// flags, so only a `readOnly` write that would make the root
    /// unusable is rejected.
    pub fn set_attribute(&self, path: &str, view: View, name: &str, value: AttrValue) -> Result<()> {
        let mut root = self.root.write().unwrap();
        let canonical = {
            let policy = self.follow_policy(false);
            let (resolved, stack) = path::resolve(&root, path, policy)?;
            if resolved.is_root() {
                if view == View::Memory && name == "readOnly" && value.as_bool()? {
                    return Err(Error::access_denied("/"));
                }
                attr::write_attribute_to_common(&mut root.attrs, view, name, value)?;
                return Ok(());
            }
            path::canonical_path_string(&stack)
        };
        let (parent, slot_name, _) = path::resolve_parent_mut(&mut root, &canonical, self.config.max_link_hops)?;
        let node = parent.children.get_mut(&slot_name).ok_or_else(|| Error::no_such_file(&canonical))?;
        attr::write_attribute(node, view, name, value)?;
        Ok(())
    }

    /// Reads a whole file's content in one call (spec.md §6 "Global
    /// store accessor").
    pub fn get_content(&self, path: &str) -> Result<Vec<u8>> {
        let root = self.root.read().unwrap();
        let policy = self.follow_policy(false);
        let (resolved, stack) = path::resolve(&root, path, policy)?;
        let canonical = PathBuf::from(path::canonical_path_string(&stack));
        match resolved.node() {
            Some(Node::File(file)) => Ok(file.lock().unwrap().content.clone()),
            _ => Err(Error::is_directory(canonical)),
        }
    }

    /// Atomically replaces a whole file's content, creating it if
    /// missing (spec.md §6).
    pub fn set_content(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let options = OpenOptions::new().write(true).create(true).truncate_existing(true);
        let channel = self.open_channel(path, options, "")?;
        channel.write(bytes)?;
        channel.close();
        Ok(())
    }

    /// Removes every child of the root, preserving the root node's own
    /// identity (spec.md §3 Lifecycle, §6 "clear()").
    pub fn clear(&self) {
        tracing::debug!("clear");
        let mut root = self.root.write().unwrap();
        root.children.clear();
    }
}

fn joined(parent: &Path, name: &str) -> PathBuf {
    let mut path = parent.to_path_buf();
    path.push(name);
    path
}

fn parse_creation_attrs(spec: &str) -> Result<Vec<(View, String, AttrValue)>> {
    if spec.is_empty() {
        Ok(Vec::new())
    } else {
        attr::parse_creation_attrs(spec)
    }
}

/// Applies creation-time attribute assignments to a freshly built,
/// not-yet-placed node. Since validation already happened in
/// [`parse_creation_attrs`] before any directory slot was touched, a
/// late failure here can only be the `ClassCastError` path, which
/// cannot occur for the `bool`-only assignments this grammar produces
/// --- kept as a `Result` regardless so future attribute kinds stay
/// safe by construction rather than by convention.
fn apply_creation_attrs(node: &mut Node, assignments: &[(View, String, AttrValue)]) -> Result<()> {
    for (view, name, value) in assignments {
        attr::write_attribute(node, *view, name, value.clone())?;
    }
    Ok(())
}

/// Shared by [`FileStore::delete`]/[`FileStore::delete_if_exists`] and
/// the `delete_on_close` hook built in [`FileStore::delete_on_close_hook`],
/// which only has `Arc<RwLock<DirectoryData>>` in scope, not a whole
/// `&FileStore`.
fn delete_at(root: &RwLock<DirectoryData>, path: &str, max_link_hops: u32, _nofollow_links: bool) -> Result<()> {
    let mut root = root.write().unwrap();
    let (parent, name, parent_path) = path::resolve_parent_mut(&mut root, path, max_link_hops)?;
    if parent.attrs.read_only {
        return Err(Error::access_denied(parent_path));
    }
    let full_path = joined(&parent_path, &name);
    match parent.children.get(&name) {
        None => return Err(Error::no_such_file(full_path)),
        Some(node) => {
            if node.is_read_only() {
                return Err(Error::access_denied(full_path));
            }
            if let Some(dir) = node.as_directory() {
                if !dir.children.is_empty() {
                    return Err(Error::directory_not_empty(full_path));
                }
            }
        }
    }
    parent.children.remove(&name);
    Ok(())
}
