//! Attributes subsystem --- two named views (`basic`, `memory`) over a
//! single [`Node`], and the `view?:name(,name)*` query grammar that
//! selects between them.
//!
//! Grounded on spec.md §4.7's "polymorphic attribute view" design note:
//! a tagged variant for values, and a static table mapping `(view,
//! name)` to whether it is readable/writable, rather than a trait
//! object per view.

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::node::{CommonAttrs, FileType, Node};

/// A typed attribute value, as returned by a read or accepted by a
/// write.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Timestamp(SystemTime),
    U64(u64),
    Bool(bool),
    Null,
}

impl AttrValue {
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            AttrValue::Bool(b) => Ok(*b),
            _ => Err(Error::ClassCastError),
        }
    }

    pub fn as_timestamp(&self) -> Result<SystemTime> {
        match self {
            AttrValue::Timestamp(t) => Ok(*t),
            _ => Err(Error::ClassCastError),
        }
    }
}

/// The two attribute views spec.md §4.7 names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Basic,
    Memory,
}

impl View {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "" | "basic" => Ok(View::Basic),
            "memory" => Ok(View::Memory),
            other => Err(Error::UnsupportedOperation(format!("unsupported view: {other}"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            View::Basic => "basic",
            View::Memory => "memory",
        }
    }
}

/// Attributes common to both views, in table order.
const COMMON_ATTRS: &[&str] = &[
    "lastModifiedTime",
    "lastAccessTime",
    "creationTime",
    "size",
    "isRegularFile",
    "isDirectory",
    "isSymbolicLink",
    "isOther",
    "fileKey",
];

/// Attributes available only through the `memory` view.
const MEMORY_ONLY_ATTRS: &[&str] = &["readOnly", "hidden"];

fn attrs_for(view: View) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = COMMON_ATTRS.to_vec();
    if view == View::Memory {
        names.extend_from_slice(MEMORY_ONLY_ATTRS);
    }
    names
}

fn is_known_attr(view: View, name: &str) -> bool {
    attrs_for(view).contains(&name)
}

/// Parses `view?:name(,name)*`, expanding a trailing `*` to every
/// attribute of the resolved view. Returns the view and the resolved,
/// validated attribute names.
pub fn parse_query(spec: &str) -> Result<(View, Vec<&'static str>)> {
    let (view_part, names_part) = match spec.split_once(':') {
        Some((view, names)) => (view, names),
        None => ("", spec),
    };
    let view = View::parse(view_part)?;

    if names_part == "*" {
        return Ok((view, attrs_for(view)));
    }

    let mut resolved = Vec::new();
    for name in names_part.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let canonical = attrs_for(view)
            .into_iter()
            .find(|known| *known == name)
            .ok_or_else(|| Error::IllegalArgument(format!("unsupported attribute: {name}")))?;
        resolved.push(canonical);
    }
    Ok((view, resolved))
}

/// Reads a single attribute from raw `(attrs, file_type, size)` pieces
/// rather than a live [`Node`], so the root directory --- which has no
/// `Node` wrapper of its own --- can be queried the same way a
/// directory entry can.
pub fn read_attribute_raw(attrs: &CommonAttrs, file_type: FileType, size: u64, name: &str) -> Result<AttrValue> {
    Ok(match name {
        "lastModifiedTime" => AttrValue::Timestamp(attrs.last_modified),
        "lastAccessTime" => AttrValue::Timestamp(attrs.last_access),
        "creationTime" => AttrValue::Timestamp(attrs.creation),
        "size" => AttrValue::U64(size),
        "isRegularFile" => AttrValue::Bool(file_type == FileType::RegularFile),
        "isDirectory" => AttrValue::Bool(file_type == FileType::Directory),
        "isSymbolicLink" => AttrValue::Bool(file_type == FileType::SymbolicLink),
        "isOther" => AttrValue::Bool(false),
        "fileKey" => AttrValue::Null,
        "readOnly" => AttrValue::Bool(attrs.read_only),
        "hidden" => AttrValue::Bool(attrs.hidden),
        other => return Err(Error::IllegalArgument(format!("unsupported attribute: {other}"))),
    })
}

/// Reads a single attribute off `node` by bare name, regardless of
/// which view named it --- the caller has already validated the name
/// against the requested view via [`parse_query`].
pub fn read_attribute(node: &Node, name: &str) -> Result<AttrValue> {
    read_attribute_raw(&node.common_attrs(), node.file_type(), node.size(), name)
}

/// Reads every attribute named by `spec` (`view?:name(,name)*`) off raw
/// `(attrs, file_type, size)` pieces into a map keyed by bare attribute
/// name (spec.md §9's chosen, "current design" behavior --- no view
/// prefix on keys).
pub fn read_view_raw(attrs: &CommonAttrs, file_type: FileType, size: u64, spec: &str) -> Result<BTreeMap<String, AttrValue>> {
    let (_, names) = parse_query(spec)?;
    let mut map = BTreeMap::new();
    for name in names {
        map.insert(name.to_owned(), read_attribute_raw(attrs, file_type, size, name)?);
    }
    Ok(map)
}

/// Reads every attribute named by `spec` off a live [`Node`].
pub fn read_view(node: &Node, spec: &str) -> Result<BTreeMap<String, AttrValue>> {
    read_view_raw(&node.common_attrs(), node.file_type(), node.size(), spec)
}

/// Writes a single named attribute onto a raw [`CommonAttrs`]. Fails
/// with `IllegalArgument` if the name is unknown within `view`, and
/// `ClassCastError` if the value is the wrong type --- or if the name
/// names a read-only attribute, since none of the read-only attributes
/// accept any value.
pub fn write_attribute_to_common(attrs: &mut CommonAttrs, view: View, name: &str, value: AttrValue) -> Result<()> {
    if !is_known_attr(view, name) {
        return Err(Error::IllegalArgument(format!("unsupported attribute: {name}")));
    }
    match name {
        "lastModifiedTime" => attrs.last_modified = value.as_timestamp()?,
        "lastAccessTime" => attrs.last_access = value.as_timestamp()?,
        "creationTime" => attrs.creation = value.as_timestamp()?,
        "readOnly" if view == View::Memory => attrs.read_only = value.as_bool()?,
        "hidden" if view == View::Memory => attrs.hidden = value.as_bool()?,
        _ => return Err(Error::ClassCastError),
    }
    Ok(())
}

/// Writes a single named attribute onto a live [`Node`].
pub fn write_attribute(node: &mut Node, view: View, name: &str, value: AttrValue) -> Result<()> {
    let mut attrs = node.common_attrs();
    write_attribute_to_common(&mut attrs, view, name, value)?;
    node.apply_attrs(&attrs);
    Ok(())
}

/// Parses creation-time attributes of the form `view:name=value(,name=value)*`
/// (spec.md §4.7 "Creation-time attributes"). Only `memory:readOnly` and
/// `memory:hidden` are meaningful here since the other attributes are
/// either read-only or implicitly set by construction.
pub fn parse_creation_attrs(spec: &str) -> Result<Vec<(View, String, AttrValue)>> {
    let (view_part, assignments) = match spec.split_once(':') {
        Some((view, rest)) => (view, rest),
        None => ("", spec),
    };
    let view = View::parse(view_part)?;

    let mut out = Vec::new();
    for assignment in assignments.split(',') {
        let assignment = assignment.trim();
        if assignment.is_empty() {
            continue;
        }
        let (name, raw_value) = assignment
            .split_once('=')
            .ok_or_else(|| Error::IllegalArgument(format!("malformed attribute assignment: {assignment}")))?;
        if !is_known_attr(view, name) {
            return Err(Error::IllegalArgument(format!("unsupported attribute: {name}")));
        }
        let value = match raw_value {
            "true" => AttrValue::Bool(true),
            "false" => AttrValue::Bool(false),
            other => return Err(Error::IllegalArgument(format!("unsupported attribute value: {other}"))),
        };
        out.push((view, name.to_owned(), value));
    }
    Ok(out)
}
