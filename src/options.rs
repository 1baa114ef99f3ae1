//! Open-option and copy-option parsing and validation (spec.md §4.2),
//! grounded on the builder idiom of `std::fs::OpenOptions` and the
//! teacher's flag-set validation in `examples/shadow_fs/fs/mod.rs`.

use crate::error::{Error, Result};

/// The raw set of flags a caller may request when opening a channel or
/// stream. Validity depends on which of [`OpenOptions::validate_for_channel`],
/// [`OpenOptions::validate_for_input_stream`], or
/// [`OpenOptions::validate_for_output_stream`] is used to interpret it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate_existing: bool,
    pub create: bool,
    pub create_new: bool,
    pub delete_on_close: bool,
    pub sparse: bool,
    pub sync: bool,
    pub dsync: bool,
    pub nofollow_links: bool,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(mut self, value: bool) -> Self {
        self.read = value;
        self
    }

    pub fn write(mut self, value: bool) -> Self {
        self.write = value;
        self
    }

    pub fn append(mut self, value: bool) -> Self {
        self.append = value;
        self
    }

    pub fn truncate_existing(mut self, value: bool) -> Self {
        self.truncate_existing = value;
        self
    }

    pub fn create(mut self, value: bool) -> Self {
        self.create = value;
        self
    }

    pub fn create_new(mut self, value: bool) -> Self {
        self.create_new = value;
        self
    }

    pub fn delete_on_close(mut self, value: bool) -> Self {
        self.delete_on_close = value;
        self
    }

    pub fn nofollow_links(mut self, value: bool) -> Self {
        self.nofollow_links = value;
        self
    }

    /// Parses a host-supplied list of bare option names, rejecting
    /// anything unrecognized with "unsupported option".
    pub fn from_names(names: &[&str]) -> Result<Self> {
        let mut options = OpenOptions::new();
        for name in names {
            match *name {
                "read" => options.read = true,
                "write" => options.write = true,
                "append" => options.append = true,
                "truncate_existing" => options.truncate_existing = true,
                "create" => options.create = true,
                "create_new" => options.create_new = true,
                "delete_on_close" => options.delete_on_close = true,
                "sparse" => options.sparse = true,
                "sync" => options.sync = true,
                "dsync" => options.dsync = true,
                "nofollow_links" => options.nofollow_links = true,
                other => return Err(Error::UnsupportedOperation(format!("unsupported option: {other}"))),
            }
        }
        Ok(options)
    }

    fn any_write_intent(&self) -> bool {
        self.write || self.append || self.create || self.create_new || self.truncate_existing
    }

    /// Resolves the flags for a byte channel / file channel open, where
    /// both readability and writability are independently configurable.
    pub fn validate_for_channel(&self) -> Result<ChannelMode> {
        if self.append && self.truncate_existing {
            return Err(Error::IllegalArgument("illegal combination: append + truncate_existing".to_owned()));
        }
        if self.append && self.read {
            return Err(Error::IllegalArgument("illegal combination: append + read".to_owned()));
        }

        let writable = self.write || self.append;
        let readable = self.read || !writable;

        Ok(ChannelMode {
            readable,
            writable,
            append: self.append,
            truncate_existing: self.truncate_existing,
            create: self.create,
            create_new: self.create_new,
            delete_on_close: self.delete_on_close,
            nofollow_links: self.nofollow_links,
        })
    }

    /// Resolves flags for an input stream: read-only, with every
    /// write-implying option rejected outright.
    pub fn validate_for_input_stream(&self) -> Result<ChannelMode> {
        if self.write || self.append || self.truncate_existing || self.create || self.create_new {
            return Err(Error::UnsupportedOperation("write-implying option on an input stream".to_owned()));
        }
        Ok(ChannelMode {
            readable: true,
            writable: false,
            append: false,
            truncate_existing: false,
            create: false,
            create_new: false,
            delete_on_close: self.delete_on_close,
            nofollow_links: self.nofollow_links,
        })
    }

    /// Resolves flags for an output stream: write-only, with `create`
    /// defaulted on unless the caller specified any write-related flag
    /// of their own.
    pub fn validate_for_output_stream(&self) -> Result<ChannelMode> {
        if self.read {
            return Err(Error::UnsupportedOperation("read option on an output stream".to_owned()));
        }
        let create = if self.any_write_intent() { self.create } else { true };
        Ok(ChannelMode {
            readable: false,
            writable: true,
            append: self.append,
            truncate_existing: self.truncate_existing,
            create,
            create_new: self.create_new,
            delete_on_close: self.delete_on_close,
            nofollow_links: self.nofollow_links,
        })
    }
}

/// The resolved, internally-consistent flags a channel or stream is
/// actually opened with.
#[derive(Debug, Clone, Copy)]
pub struct ChannelMode {
    pub readable: bool,
    pub writable: bool,
    pub append: bool,
    pub truncate_existing: bool,
    pub create: bool,
    pub create_new: bool,
    pub delete_on_close: bool,
    pub nofollow_links: bool,
}

/// Options governing `copy`/`move` (spec.md §4.6).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOptions {
    pub replace_existing: bool,
    pub copy_attributes: bool,
    pub nofollow_links: bool,
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_existing(mut self, value: bool) -> Self {
        self.replace_existing = value;
        self
    }

    pub fn copy_attributes(mut self, value: bool) -> Self {
        self.copy_attributes = value;
        self
    }

    pub fn nofollow_links(mut self, value: bool) -> Self {
        self.nofollow_links = value;
        self
    }

    pub fn from_names(names: &[&str]) -> Result<Self> {
        let mut options = CopyOptions::new();
        for name in names {
            match *name {
                "replace_existing" => options.replace_existing = true,
                "copy_attributes" => options.copy_attributes = true,
                "nofollow_links" => options.nofollow_links = true,
                other => return Err(Error::UnsupportedOperation(format!("unsupported option: {other}"))),
            }
        }
        Ok(options)
    }
}
