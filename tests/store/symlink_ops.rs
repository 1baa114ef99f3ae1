use memfs_store::{Error, OpenOptions};

use crate::common::{new_store, write_file};

#[test]
fn reading_through_a_symlink_reaches_the_target_content() {
    let store = new_store();
    write_file(&store, "/real", b"payload");
    store.create_symbolic_link("/link", "/real", "").unwrap();
    assert_eq!(store.get_content("/link").unwrap(), b"payload");
}

#[test]
fn read_symbolic_link_reports_the_textual_target_without_following_it() {
    let store = new_store();
    store.create_symbolic_link("/link", "/does/not/exist", "").unwrap();
    assert_eq!(store.read_symbolic_link("/link").unwrap(), "/does/not/exist");
}

#[test]
fn a_broken_symlink_fails_with_no_such_file_when_followed() {
    let store = new_store();
    store.create_symbolic_link("/link", "/missing", "").unwrap();
    let err = store.get_content("/link").unwrap_err();
    assert!(matches!(err, Error::NoSuchFile(_)));
}

#[test]
fn nofollow_links_at_open_returns_the_link_itself() {
    let store = new_store();
    write_file(&store, "/real", b"x");
    store.create_symbolic_link("/link", "/real", "").unwrap();
    let options = OpenOptions::new().read(true).nofollow_links(true);
    let err = store.open_channel("/link", options, "").unwrap_err();
    assert!(matches!(err, Error::IsDirectory(_)));
}

#[test]
fn a_two_link_cycle_fails_with_maximum_link_depth_exceeded() {
    let store = new_store();
    store.create_symbolic_link("/link1", "/link2", "").unwrap();
    store.create_symbolic_link("/link2", "/link1", "").unwrap();
    let err = store.to_real_path("/link1", false).unwrap_err();
    match err {
        Error::FileSystemError { path, reason } => {
            assert_eq!(path, std::path::PathBuf::from("/link1"));
            assert_eq!(reason, "maximum link depth exceeded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn creating_a_symlink_onto_an_existing_name_fails_with_already_exists() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let err = store.create_symbolic_link("/foo", "/bar", "").unwrap_err();
    assert!(matches!(err, Error::FileAlreadyExists(_)));
}

#[test]
fn creating_a_hard_link_to_a_directory_fails_with_is_directory() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    let err = store.create_link("/link", "/dir").unwrap_err();
    assert!(matches!(err, Error::IsDirectory(_)));
}
