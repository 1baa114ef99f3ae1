//! Tree data model --- [`Node`] and its three variants.
//!
//! Grounded on the teacher's split between node identity and attribute
//! data (`vfs::file::Attr`/`Time`), combined with the reference-counted,
//! lock-guarded shared-node pattern used for hard-link-equivalent nodes
//! in `examples/other_examples/ada69df6_enarx-vfs__tmpfs-src-dir.rs.rs`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::lock::LockTable;

/// Discriminant for the three node variants, used by the attribute
/// subsystem's `isRegularFile`/`isDirectory`/`isSymbolicLink` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    RegularFile,
    Directory,
    SymbolicLink,
}

/// Common attributes every node carries (spec.md §3).
///
/// Nodes do not know their own name or parent; parentage is determined
/// by whichever directory slot holds them.
#[derive(Debug, Clone)]
pub struct CommonAttrs {
    pub last_modified: SystemTime,
    pub last_access: SystemTime,
    pub creation: SystemTime,
    pub read_only: bool,
    pub hidden: bool,
}

impl CommonAttrs {
    fn new_now() -> Self {
        let now = SystemTime::now();
        CommonAttrs { last_modified: now, last_access: now, creation: now, read_only: false, hidden: false }
    }
}

impl Default for CommonAttrs {
    fn default() -> Self {
        Self::new_now()
    }
}

/// A File node's data: content buffer, live-channel accounting, and its
/// own lock table. Shared via [`SharedFile`] so that every directory
/// slot (hard link) referencing the same file shares one `FileData`.
pub struct FileData {
    pub attrs: CommonAttrs,
    pub content: Vec<u8>,
    pub locks: LockTable,
    /// Count of currently-open channels/streams, kept so a File can be
    /// told apart from an orphaned one for diagnostics; the File itself
    /// stays alive via `Arc` regardless of this count (invariant 6).
    pub open_handles: u64,
}

impl FileData {
    fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

impl Default for FileData {
    fn default() -> Self {
        FileData { attrs: CommonAttrs::default(), content: Vec::new(), locks: LockTable::new(), open_handles: 0 }
    }
}

/// Shared, reference-counted handle to a File node's data. Cloning this
/// `Arc` *is* what creates a hard link: every directory slot holding a
/// clone, plus every open channel, keeps the same `FileData` alive.
pub type SharedFile = Arc<Mutex<FileData>>;

/// A Directory node's data: its own attributes plus a name-to-child map.
/// Iteration order of the map is irrelevant; callers sort on demand
/// (spec.md §3).
pub struct DirectoryData {
    pub attrs: CommonAttrs,
    pub children: BTreeMap<String, Node>,
}

impl DirectoryData {
    fn new() -> Self {
        DirectoryData { attrs: CommonAttrs::default(), children: BTreeMap::new() }
    }

    pub fn root() -> Self {
        Self::new()
    }
}

/// A symbolic-link node's data: just the textual target, resolved at
/// use time by [`crate::path`].
pub struct LinkData {
    pub attrs: CommonAttrs,
    pub target: String,
}

/// A tree node: File, Directory, or Link (spec.md §3).
///
/// Directories and Links are owned inline and are never multiply owned;
/// moving one between directory maps is an ordinary Rust move. Files
/// are held behind `Arc<Mutex<_>>` so a directory slot can hold an
/// independent clone --- the mechanism by which hard links exist.
pub enum Node {
    File(SharedFile),
    Directory(DirectoryData),
    Link(LinkData),
}

impl Node {
    pub fn new_file() -> Self {
        Node::File(Arc::new(Mutex::new(FileData::new())))
    }

    pub fn new_directory() -> Self {
        Node::Directory(DirectoryData::new())
    }

    pub fn new_link(target: String) -> Self {
        Node::Link(LinkData { attrs: CommonAttrs::default(), target })
    }

    /// Creates a new directory slot sharing the given File's data ---
    /// the hard-link constructor.
    pub fn share_file(file: &SharedFile) -> Self {
        Node::File(Arc::clone(file))
    }

    pub fn file_type(&self) -> FileType {
        match self {
            Node::File(_) => FileType::RegularFile,
            Node::Directory(_) => FileType::Directory,
            Node::Link(_) => FileType::SymbolicLink,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Node::Link(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn as_directory(&self) -> Option<&DirectoryData> {
        match self {
            Node::Directory(dir) => Some(dir),
            _ => None,
        }
    }

    pub fn as_directory_mut(&mut self) -> Option<&mut DirectoryData> {
        match self {
            Node::Directory(dir) => Some(dir),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&SharedFile> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&LinkData> {
        match self {
            Node::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn as_link_mut(&mut self) -> Option<&mut LinkData> {
        match self {
            Node::Link(link) => Some(link),
            _ => None,
        }
    }

    /// `true` if writing content, adding children, or removing this node
    /// would be blocked by its own read-only flag.
    pub fn is_read_only(&self) -> bool {
        match self {
            Node::File(file) => file.lock().unwrap().attrs.read_only,
            Node::Directory(dir) => dir.attrs.read_only,
            Node::Link(link) => link.attrs.read_only,
        }
    }

    pub fn set_read_only(&mut self, value: bool) {
        match self {
            Node::File(file) => file.lock().unwrap().attrs.read_only = value,
            Node::Directory(dir) => dir.attrs.read_only = value,
            Node::Link(link) => link.attrs.read_only = value,
        }
    }

    pub fn set_hidden(&mut self, value: bool) {
        match self {
            Node::File(file) => file.lock().unwrap().attrs.hidden = value,
            Node::Directory(dir) => dir.attrs.hidden = value,
            Node::Link(link) => link.attrs.hidden = value,
        }
    }

    pub fn common_attrs(&self) -> CommonAttrs {
        match self {
            Node::File(file) => file.lock().unwrap().attrs.clone(),
            Node::Directory(dir) => dir.attrs.clone(),
            Node::Link(link) => link.attrs.clone(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Node::File(file) => file.lock().unwrap().size(),
            _ => 0,
        }
    }

    /// `true` if `self` and `other` are the very same node instance:
    /// the same shared File, or literally the same Directory/Link
    /// object (which, since those are never multiply owned, only ever
    /// happens when both references were resolved from the same path).
    pub fn same_instance(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::File(a), Node::File(b)) => Arc::ptr_eq(a, b),
            (Node::Directory(a), Node::Directory(b)) => std::ptr::eq(a, b),
            (Node::Link(a), Node::Link(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }

    /// Copies `self` into a freshly constructed node per spec.md §4.6's
    /// copy rules: a Directory copy is always empty, a File copy is a
    /// value-copy of the content, a Link copy carries the same target
    /// text (the resolved-and-followed case is handled by the caller,
    /// which picks the node to copy from before calling this).
    pub fn copy_shallow(&self) -> Node {
        match self {
            Node::File(file) => {
                let source = file.lock().unwrap();
                let mut data = FileData::new();
                data.content = source.content.clone();
                Node::File(Arc::new(Mutex::new(data)))
            }
            Node::Directory(_) => Node::new_directory(),
            Node::Link(link) => Node::new_link(link.target.clone()),
        }
    }

    /// Applies `attrs` (as captured via `copy_attributes`) onto a freshly
    /// created node.
    pub fn apply_attrs(&mut self, attrs: &CommonAttrs) {
        match self {
            Node::File(file) => {
                let mut data = file.lock().unwrap();
                data.attrs.last_modified = attrs.last_modified;
                data.attrs.last_access = attrs.last_access;
                data.attrs.creation = attrs.creation;
                data.attrs.hidden = attrs.hidden;
                data.attrs.read_only = attrs.read_only;
            }
            Node::Directory(dir) => {
                dir.attrs.last_modified = attrs.last_modified;
                dir.attrs.last_access = attrs.last_access;
                dir.attrs.creation = attrs.creation;
                dir.attrs.hidden = attrs.hidden;
                dir.attrs.read_only = attrs.read_only;
            }
            Node::Link(link) => {
                link.attrs.last_modified = attrs.last_modified;
                link.attrs.last_access = attrs.last_access;
                link.attrs.creation = attrs.creation;
                link.attrs.hidden = attrs.hidden;
                link.attrs.read_only = attrs.read_only;
            }
        }
    }

    pub fn touch_modified(&mut self) {
        let now = SystemTime::now();
        match self {
            Node::File(file) => file.lock().unwrap().attrs.last_modified = now,
            Node::Directory(dir) => dir.attrs.last_modified = now,
            Node::Link(link) => link.attrs.last_modified = now,
        }
    }

    pub fn require_directory(&self, path: &std::path::Path) -> Result<&DirectoryData> {
        self.as_directory().ok_or_else(|| Error::not_directory(path))
    }

    pub fn require_directory_mut(&mut self, path: &std::path::Path) -> Result<&mut DirectoryData> {
        self.as_directory_mut().ok_or_else(|| Error::not_directory(path))
    }

    pub fn require_link(&self, path: &std::path::Path) -> Result<&LinkData> {
        self.as_link().ok_or_else(|| Error::not_link(path))
    }
}
