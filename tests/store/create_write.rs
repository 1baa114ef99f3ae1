use memfs_store::{Error, OpenOptions};

use crate::common::{new_store, write_file};

#[test]
fn create_new_fails_if_the_file_already_exists() {
    let store = new_store();
    write_file(&store, "/foo", b"one");
    let options = OpenOptions::new().write(true).create_new(true);
    let err = store.open_channel("/foo", options, "").unwrap_err();
    assert!(matches!(err, Error::FileAlreadyExists(_)));
}

#[test]
fn create_new_succeeds_once_on_an_absent_path() {
    let store = new_store();
    let options = OpenOptions::new().write(true).create_new(true);
    let channel = store.open_channel("/foo", options, "").unwrap();
    channel.write(b"hi").unwrap();
    channel.close();
    assert_eq!(store.get_content("/foo").unwrap(), b"hi");
}

#[test]
fn write_without_create_on_a_missing_path_fails_with_no_such_file() {
    let store = new_store();
    let options = OpenOptions::new().write(true);
    let err = store.open_channel("/missing", options, "").unwrap_err();
    assert!(matches!(err, Error::NoSuchFile(_)));
}

#[test]
fn truncate_existing_on_open_clears_previous_content() {
    let store = new_store();
    write_file(&store, "/foo", b"previous content");
    write_file(&store, "/foo", b"new");
    assert_eq!(store.get_content("/foo").unwrap(), b"new");
}

#[test]
fn append_mode_always_writes_past_current_end() {
    let store = new_store();
    write_file(&store, "/foo", b"ab");
    let options = OpenOptions::new().append(true);
    let channel = store.open_channel("/foo", options, "").unwrap();
    channel.set_position(0).unwrap();
    channel.write(b"cd").unwrap();
    channel.close();
    assert_eq!(store.get_content("/foo").unwrap(), b"abcd");
}

#[test]
fn append_combined_with_read_is_rejected_at_open() {
    let store = new_store();
    let options = OpenOptions::new().append(true).read(true);
    let err = store.open_channel("/foo", options, "").unwrap_err();
    assert!(matches!(err, Error::IllegalArgument(_)));
}

#[test]
fn opening_a_directory_as_a_channel_fails_with_is_directory() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    let err = store.open_channel("/dir", OpenOptions::new().read(true), "").unwrap_err();
    assert!(matches!(err, Error::IsDirectory(_)));
}

#[test]
fn creation_time_read_only_permits_later_open_but_blocks_the_write() {
    let store = new_store();
    let options = OpenOptions::new().write(true).create(true);
    let channel = store.open_channel("/foo", options, "memory:readOnly=true").unwrap();
    let err = channel.write(b"x").unwrap_err();
    assert!(matches!(err, Error::AccessDenied(_)));
    // The node survives: this is a later write failing, not the
    // creation-time attribute application itself.
    assert!(store.exists("/foo"));
}

#[test]
fn an_unsupported_creation_attribute_leaves_no_node_behind() {
    let store = new_store();
    let options = OpenOptions::new().write(true).create(true);
    let err = store.open_channel("/foo", options, "basic:bogus=true").unwrap_err();
    assert!(matches!(err, Error::IllegalArgument(_)));
    assert!(!store.exists("/foo"));
}

#[test]
fn opening_an_already_read_only_file_for_writing_is_denied_at_open() {
    let store = new_store();
    let options = OpenOptions::new().write(true).create(true);
    let channel = store.open_channel("/foo", options, "memory:readOnly=true").unwrap();
    channel.close();
    let err = store.open_channel("/foo", OpenOptions::new().write(true), "").unwrap_err();
    assert!(matches!(err, Error::AccessDenied(_)));
}
