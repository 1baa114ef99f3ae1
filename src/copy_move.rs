//! Copy and move, grounded on spec.md §4.6 and on the preconditions the
//! teacher's `examples/shadow_fs/fs/mod.rs` checks before touching its
//! tree (target-parent existence and writability before committing any
//! mutation).
//!
//! Both operations validate everything --- existence, read-only parents,
//! replace-existing rules --- against an immutable pass over the tree
//! before performing any mutation, so a rejected copy/move never leaves
//! the tree partially changed.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::node::{DirectoryData, Node};
use crate::options::CopyOptions;
use crate::path::{self, ResolvePolicy};

fn validate_slot(dir: &DirectoryData, name: &str, replace_existing: bool, dir_path: &Path) -> Result<()> {
    if let Some(existing) = dir.children.get(name) {
        if !replace_existing {
            let mut path = dir_path.to_path_buf();
            path.push(name);
            return Err(Error::already_exists(path));
        }
        if let Some(child_dir) = existing.as_directory() {
            if !child_dir.children.is_empty() {
                let mut path = dir_path.to_path_buf();
                path.push(name);
                return Err(Error::directory_not_empty(path));
            }
        }
    }
    Ok(())
}

/// Resolves `source` and `target` under `policy` and reports whether
/// they name the very same node (or both name the root).
fn same_instance(root: &DirectoryData, source: &str, target: &str, policy: ResolvePolicy) -> Result<bool> {
    let (resolved_source, _) = path::resolve(root, source, policy)?;
    let same = match path::resolve(root, target, policy) {
        Ok((resolved_target, _)) => match (resolved_source.node(), resolved_target.node()) {
            (Some(a), Some(b)) => a.same_instance(b),
            (None, None) => true,
            _ => false,
        },
        Err(_) => false,
    };
    Ok(same)
}

/// Copies `source` onto `target` (spec.md §4.6's Copy rules).
pub fn copy(root: &mut DirectoryData, source: &str, target: &str, options: CopyOptions, max_link_hops: u32) -> Result<()> {
    let policy = ResolvePolicy::new(!options.nofollow_links, max_link_hops);

    if same_instance(root, source, target, policy)? {
        return Ok(());
    }

    let (new_node, attrs) = {
        let (resolved_source, _) = path::resolve(root, source, policy)?;
        match resolved_source.node() {
            Some(node) => (node.copy_shallow(), node.common_attrs()),
            None => (Node::new_directory(), root.attrs.clone()),
        }
    };

    let (parent, name, parent_path) = path::resolve_parent_mut(root, target, max_link_hops)?;
    if parent.attrs.read_only {
        return Err(Error::access_denied(parent_path));
    }
    validate_slot(parent, &name, options.replace_existing, &parent_path)?;

    let mut new_node = new_node;
    if options.copy_attributes {
        new_node.apply_attrs(&attrs);
    }
    parent.children.remove(&name);
    parent.children.insert(name, new_node);
    Ok(())
}

/// Moves `source` onto `target` (spec.md §4.6's Move rules).
///
/// The source's own final component is never followed even when the
/// caller omits `nofollow_links`: like POSIX `rename`, a move always
/// relocates whatever is literally named at the source path (a
/// symbolic link included) rather than its target. `nofollow_links`
/// still governs the same-instance no-op check, which is the one place
/// spec.md's "symbolic-link target followed unless nofollow_links"
/// precondition can apply without ambiguity.
pub fn mv(root: &mut DirectoryData, source: &str, target: &str, options: CopyOptions, max_link_hops: u32) -> Result<()> {
    let same_instance_policy = ResolvePolicy::new(!options.nofollow_links, max_link_hops);
    {
        let (resolved_source, _) = path::resolve(root, source, same_instance_policy)?;
        if resolved_source.is_root() {
            return Err(Error::directory_not_empty("/"));
        }
    }
    if same_instance(root, source, target, same_instance_policy)? {
        return Ok(());
    }

    let normalized_source = path::normalize(source);
    let normalized_target = path::normalize(target);
    let (source_parent_str, source_name) = path::split_parent(&normalized_source)?;
    let (target_parent_str, target_name) = path::split_parent(&normalized_target)?;

    let lookup_policy = ResolvePolicy::new(true, max_link_hops);

    let (resolved_source_parent, source_parent_stack) = path::resolve(root, &source_parent_str, lookup_policy)?;
    let source_parent_path = PathBuf::from(path::canonical_path_string(&source_parent_stack));
    let source_dir = resolved_source_parent.as_directory(root, &source_parent_path)?;
    if source_dir.attrs.read_only {
        return Err(Error::access_denied(source_parent_path));
    }
    if !source_dir.children.contains_key(&source_name) {
        let mut path = source_parent_path.clone();
        path.push(&source_name);
        return Err(Error::no_such_file(path));
    }

    let (resolved_target_parent, target_parent_stack) = path::resolve(root, &target_parent_str, lookup_policy)?;
    let target_parent_path = PathBuf::from(path::canonical_path_string(&target_parent_stack));
    let target_dir = resolved_target_parent.as_directory(root, &target_parent_path)?;
    if target_dir.attrs.read_only {
        return Err(Error::access_denied(target_parent_path));
    }
    validate_slot(target_dir, &target_name, options.replace_existing, &target_parent_path)?;

    let (source_parent, _, _) = path::resolve_parent_mut(root, source, max_link_hops)?;
    let node = source_parent
        .children
        .remove(&source_name)
        .expect("validated moments earlier while holding the store's exclusive write lock");

    let (target_parent, _, _) = path::resolve_parent_mut(root, target, max_link_hops)?;
    target_parent.children.remove(&target_name);
    target_parent.children.insert(target_name, node);
    Ok(())
}
