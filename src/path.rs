//! Path resolution --- [`resolve`] and its mutable-parent counterpart.
//!
//! Implements spec.md §4.1's namei-style algorithm: components are
//! processed from a work queue rather than recursively, so that
//! following a symbolic link is just prepending its target's components
//! onto the front of the same queue. This keeps the hop counter, the
//! breadcrumb trail, and the "is this the final component" check in one
//! place instead of threading them through recursive calls.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::node::{DirectoryData, Node};

/// Policy governing a single path resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolvePolicy {
    /// Whether a symbolic link at the *final* component should itself be
    /// followed. Links encountered at intermediate components are
    /// always followed.
    pub follow_links: bool,
    /// Bound on the number of link hops a single resolution may take.
    pub max_link_hops: u32,
}

impl ResolvePolicy {
    pub fn new(follow_links: bool, max_link_hops: u32) -> Self {
        ResolvePolicy { follow_links, max_link_hops }
    }
}

/// The outcome of a resolution: either the root directory itself, or
/// some node reached by descending from it.
#[derive(Clone, Copy)]
pub enum Resolved<'a> {
    Root,
    Node(&'a Node),
}

impl<'a> Resolved<'a> {
    pub fn is_directory(&self, _root: &DirectoryData) -> bool {
        match self {
            Resolved::Root => true,
            Resolved::Node(node) => node.is_directory(),
        }
    }

    pub fn as_directory(&self, root: &'a DirectoryData, canonical: &Path) -> Result<&'a DirectoryData> {
        match self {
            Resolved::Root => Ok(root),
            Resolved::Node(node) => node.as_directory().ok_or_else(|| Error::not_directory(canonical)),
        }
    }

    pub fn as_link(&self, canonical: &Path) -> Result<&'a crate::node::LinkData> {
        match self {
            Resolved::Root => Err(Error::not_link(canonical)),
            Resolved::Node(node) => node.require_link(canonical),
        }
    }

    pub fn node(&self) -> Option<&'a Node> {
        match self {
            Resolved::Root => None,
            Resolved::Node(node) => Some(node),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Resolved::Root)
    }
}

/// Splits a POSIX-style path into its slash-separated components,
/// without filtering `.`/`..`/empty entries --- the caller's resolution
/// loop handles those.
fn split_components(path: &str) -> VecDeque<String> {
    let normalized = normalize(path);
    normalized.split('/').map(str::to_owned).collect()
}

/// Treats an empty path as "/"; prepends "/" to a relative path, since
/// there is no working directory (spec.md §4.1 step 1).
pub(crate) fn normalize(path: &str) -> String {
    if path.is_empty() {
        "/".to_owned()
    } else if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

pub fn canonical_path_string(stack: &[String]) -> String {
    if stack.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}", stack.join("/"))
    }
}

/// Walks `path` from `root`, following symbolic links per `policy`.
///
/// Returns the resolved node (or `Resolved::Root`) together with the
/// canonical stack of directory-name components leading to it.
pub fn resolve<'a>(
    root: &'a DirectoryData,
    path: &str,
    policy: ResolvePolicy,
) -> Result<(Resolved<'a>, Vec<String>)> {
    let mut queue = split_components(path);
    let mut stack: Vec<String> = Vec::new();
    let mut breadcrumbs: Vec<&'a Node> = Vec::new();
    let mut hops: u32 = 0;

    while let Some(component) = queue.pop_front() {
        match component.as_str() {
            "" | "." => continue,
            ".." => {
                stack.pop();
                breadcrumbs.pop();
            }
            name => {
                let dir = match breadcrumbs.last() {
                    None => root,
                    Some(node) => {
                        let canonical = canonical_path_string(&stack);
                        node.as_directory().ok_or_else(|| Error::not_directory(&canonical))?
                    }
                };
                let child = dir.children.get(name).ok_or_else(|| {
                    let mut named = stack.clone();
                    named.push(name.to_owned());
                    Error::no_such_file(canonical_path_string(&named))
                })?;

                let is_last = queue.is_empty();

                if let Node::Link(link) = child {
                    if is_last && !policy.follow_links {
                        stack.push(name.to_owned());
                        breadcrumbs.push(child);
                        break;
                    }

                    hops += 1;
                    if hops > policy.max_link_hops {
                        return Err(Error::link_depth_exceeded(path));
                    }

                    // Resolve relative to the link's parent directory:
                    // `stack`/`breadcrumbs` are already that parent,
                    // since we have not pushed the link's own slot yet.
                    let target = link.target.clone();
                    let target_components = split_components(&target);
                    if target.starts_with('/') {
                        stack.clear();
                        breadcrumbs.clear();
                    }
                    for comp in target_components.into_iter().rev() {
                        queue.push_front(comp);
                    }
                } else {
                    stack.push(name.to_owned());
                    breadcrumbs.push(child);
                }
            }
        }
    }

    let resolved = match breadcrumbs.last() {
        None => Resolved::Root,
        Some(node) => Resolved::Node(node),
    };
    Ok((resolved, stack))
}

/// Resolves everything but the final path component, returning a
/// mutable reference to that parent directory plus the final
/// component's name. Used by structural mutations (create, delete,
/// rename, symlink/hard-link creation).
///
/// Intermediate components always follow links; the final component is
/// not looked up at all here (it may not exist yet).
pub fn resolve_parent_mut<'a>(
    root: &'a mut DirectoryData,
    path: &str,
    max_link_hops: u32,
) -> Result<(&'a mut DirectoryData, String, PathBuf)> {
    let normalized = normalize(path);
    let (parent_str, name) = split_parent(&normalized)?;

    let policy = ResolvePolicy::new(true, max_link_hops);
    let (resolved, stack) = resolve(root, &parent_str, policy)?;
    let canonical = canonical_path_string(&stack);
    if !resolved.is_directory(root) {
        return Err(Error::not_directory(&canonical));
    }

    let dir = walk_mut(root, &stack);
    Ok((dir, name, PathBuf::from(canonical)))
}

/// Splits `"/a/b/c"` into parent `"/a/b"` and final name `"c"`. Fails if
/// the path names the root (no final component to mutate).
pub(crate) fn split_parent(normalized: &str) -> Result<(String, String)> {
    let trimmed = normalized.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((parent, name)) if !name.is_empty() => {
            let parent = if parent.is_empty() { "/".to_owned() } else { parent.to_owned() };
            Ok((parent, name.to_owned()))
        }
        _ => Err(Error::already_exists("/")),
    }
}

/// Re-descends from `root` through the already-validated `stack` of
/// literal directory names, mutably. The stack is known-good because it
/// was just produced by an immutable [`resolve`] call under the same
/// write guard.
fn walk_mut<'a>(root: &'a mut DirectoryData, stack: &[String]) -> &'a mut DirectoryData {
    let mut dir = root;
    for name in stack {
        let node = dir
            .children
            .get_mut(name)
            .expect("canonical directory component must still exist under the held write lock");
        dir = node
            .as_directory_mut()
            .expect("canonical directory component must still be a directory");
    }
    dir
}
