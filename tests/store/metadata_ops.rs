use memfs_store::{AttrValue, Error, View};

use crate::common::{new_store, write_file};

#[test]
fn basic_view_reports_size_and_type_flags() {
    let store = new_store();
    write_file(&store, "/foo", b"hello");
    let attrs = store.read_attributes("/foo", "basic:size,isRegularFile,isDirectory", false).unwrap();
    assert_eq!(attrs.get("size"), Some(&AttrValue::U64(5)));
    assert_eq!(attrs.get("isRegularFile"), Some(&AttrValue::Bool(true)));
    assert_eq!(attrs.get("isDirectory"), Some(&AttrValue::Bool(false)));
}

#[test]
fn star_expands_to_every_attribute_of_the_view() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let attrs = store.read_attributes("/foo", "memory:*", false).unwrap();
    assert!(attrs.contains_key("readOnly"));
    assert!(attrs.contains_key("hidden"));
    assert!(attrs.contains_key("size"));
}

#[test]
fn unknown_view_is_rejected() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let err = store.read_attributes("/foo", "posix:size", false).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation(_)));
}

#[test]
fn read_only_attribute_can_only_be_read_through_the_memory_view() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let err = store.read_attributes("/foo", "basic:readOnly", false).unwrap_err();
    assert!(matches!(err, Error::IllegalArgument(_)));
}

#[test]
fn hidden_flag_round_trips_and_blocks_further_writes_when_combined_with_read_only() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    store.set_attribute("/foo", View::Memory, "hidden", AttrValue::Bool(true)).unwrap();
    let attrs = store.read_attributes("/foo", "memory:hidden", false).unwrap();
    assert_eq!(attrs.get("hidden"), Some(&AttrValue::Bool(true)));

    store.set_attribute("/foo", View::Memory, "readOnly", AttrValue::Bool(true)).unwrap();
    let err = store.delete("/foo").unwrap_err();
    assert!(matches!(err, Error::AccessDenied(_)));
}

#[test]
fn size_attribute_is_read_only() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let err = store.set_attribute("/foo", View::Basic, "size", AttrValue::U64(5)).unwrap_err();
    assert_eq!(err, Error::ClassCastError);
}

#[test]
fn root_attributes_are_queryable_as_a_directory() {
    let store = new_store();
    let attrs = store.read_attributes("/", "basic:isDirectory,isRegularFile", false).unwrap();
    assert_eq!(attrs.get("isDirectory"), Some(&AttrValue::Bool(true)));
    assert_eq!(attrs.get("isRegularFile"), Some(&AttrValue::Bool(false)));
}
