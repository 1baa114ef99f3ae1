use memfs_store::{AttrValue, CopyOptions, Error, View};

use crate::common::{new_store, write_file};

#[test]
fn move_within_the_same_directory_renames_in_place() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    store.mv("/foo", "/bar", CopyOptions::new()).unwrap();
    assert!(!store.exists("/foo"));
    assert_eq!(store.get_content("/bar").unwrap(), b"x");
}

#[test]
fn move_across_directories_relocates_the_same_node() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    write_file(&store, "/foo", b"x");
    store.mv("/foo", "/dir/foo", CopyOptions::new()).unwrap();
    assert!(!store.exists("/foo"));
    assert_eq!(store.get_content("/dir/foo").unwrap(), b"x");
}

#[test]
fn move_onto_an_existing_target_without_replace_existing_fails() {
    let store = new_store();
    write_file(&store, "/a", b"a");
    write_file(&store, "/b", b"b");
    let err = store.mv("/a", "/b", CopyOptions::new()).unwrap_err();
    assert!(matches!(err, Error::FileAlreadyExists(_)));
}

#[test]
fn move_onto_an_existing_target_with_replace_existing_overwrites_it() {
    let store = new_store();
    write_file(&store, "/a", b"a");
    write_file(&store, "/b", b"b");
    store.mv("/a", "/b", CopyOptions::new().replace_existing(true)).unwrap();
    assert_eq!(store.get_content("/b").unwrap(), b"a");
}

#[test]
fn moving_the_root_fails_directory_not_empty() {
    let store = new_store();
    let err = store.mv("/", "/anywhere", CopyOptions::new()).unwrap_err();
    assert!(matches!(err, Error::DirectoryNotEmpty(_)));
}

#[test]
fn copy_without_copy_attributes_resets_hidden_on_the_new_node() {
    let store = new_store();
    write_file(&store, "/src", b"content");
    store.set_attribute("/src", View::Memory, "hidden", AttrValue::Bool(true)).unwrap();

    store.copy("/src", "/dst", CopyOptions::new()).unwrap();
    assert_eq!(store.get_content("/dst").unwrap(), b"content");
    let attrs = store.read_attributes("/dst", "memory:hidden", false).unwrap();
    assert_eq!(attrs.get("hidden"), Some(&AttrValue::Bool(false)));
}

#[test]
fn copy_with_copy_attributes_carries_hidden_across() {
    let store = new_store();
    write_file(&store, "/src", b"content");
    store.set_attribute("/src", View::Memory, "hidden", AttrValue::Bool(true)).unwrap();

    store.copy("/src", "/dst", CopyOptions::new().copy_attributes(true)).unwrap();
    let attrs = store.read_attributes("/dst", "memory:hidden", false).unwrap();
    assert_eq!(attrs.get("hidden"), Some(&AttrValue::Bool(true)));
}

#[test]
fn copying_a_directory_never_copies_its_children() {
    let store = new_store();
    store.create_directory("/src", "").unwrap();
    write_file(&store, "/src/child", b"x");
    store.copy("/src", "/dst", CopyOptions::new()).unwrap();
    let mut stream = store.read_directory("/dst", None).unwrap();
    assert_eq!(stream.iterator().unwrap().count(), 0);
}
