use memfs_store::{Error, OpenOptions};

use crate::common::{new_store, write_file};

#[test]
fn deleting_a_missing_path_fails_with_no_such_file() {
    let store = new_store();
    let err = store.delete("/missing").unwrap_err();
    assert!(matches!(err, Error::NoSuchFile(_)));
}

#[test]
fn delete_if_exists_reports_false_instead_of_failing() {
    let store = new_store();
    assert_eq!(store.delete_if_exists("/missing").unwrap(), false);
    write_file(&store, "/foo", b"x");
    assert_eq!(store.delete_if_exists("/foo").unwrap(), true);
    assert!(!store.exists("/foo"));
}

#[test]
fn deleting_a_non_empty_directory_fails() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    write_file(&store, "/dir/child", b"x");
    let err = store.delete("/dir").unwrap_err();
    assert!(matches!(err, Error::DirectoryNotEmpty(_)));
}

#[test]
fn deleting_an_empty_directory_succeeds() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    store.delete("/dir").unwrap();
    assert!(!store.exists("/dir"));
}

#[test]
fn delete_under_a_read_only_parent_is_denied() {
    use memfs_store::{AttrValue, View};
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    write_file(&store, "/dir/child", b"x");
    store.set_attribute("/dir", View::Memory, "readOnly", AttrValue::Bool(true)).unwrap();
    let err = store.delete("/dir/child").unwrap_err();
    assert!(matches!(err, Error::AccessDenied(_)));
}

#[test]
fn delete_on_close_removes_the_file_once_every_handle_closes() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let options = OpenOptions::new().read(true).delete_on_close(true);
    let channel = store.open_channel("/foo", options, "").unwrap();
    assert!(store.exists("/foo"));
    channel.close();
    channel.close();
    assert!(!store.exists("/foo"));
}

#[test]
fn hard_link_survives_removal_of_the_original_directory_slot() {
    let store = new_store();
    write_file(&store, "/a", b"shared");
    store.create_link("/b", "/a").unwrap();
    store.delete("/a").unwrap();
    assert_eq!(store.get_content("/b").unwrap(), b"shared");
}
