use memfs_store::{Error, Filter};

use crate::common::{new_store, write_file};

#[test]
fn create_directory_then_list_reflects_new_children() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    write_file(&store, "/dir/a", b"");
    write_file(&store, "/dir/b", b"");

    let mut stream = store.read_directory("/dir", None).unwrap();
    let names: Vec<_> = stream
        .iterator()
        .unwrap()
        .map(Result::unwrap)
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a".to_owned(), "b".to_owned()]);
}

#[test]
fn creating_a_directory_twice_fails_with_already_exists() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    let err = store.create_directory("/dir", "").unwrap_err();
    assert!(matches!(err, Error::FileAlreadyExists(_)));
}

#[test]
fn listing_a_file_fails_with_not_directory() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let err = store.read_directory("/foo", None).unwrap_err();
    assert!(matches!(err, Error::NotDirectory(_)));
}

#[test]
fn directory_stream_snapshot_survives_concurrent_removal() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    write_file(&store, "/dir/a", b"");
    write_file(&store, "/dir/b", b"");

    let mut stream = store.read_directory("/dir", None).unwrap();
    store.delete("/dir/a").unwrap();
    store.delete("/dir/b").unwrap();

    let names: Vec<_> = stream.iterator().unwrap().map(Result::unwrap).collect();
    assert_eq!(names.len(), 2);
}

#[test]
fn a_second_iterator_call_is_rejected() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    let mut stream = store.read_directory("/dir", None).unwrap();
    let _first = stream.iterator().unwrap();
    let err = stream.iterator().unwrap_err();
    assert!(matches!(err, Error::IllegalState(_)));
}

/// spec.md §8 scenario 2: 100 files `file0..file99`, filtered by names
/// matching `file\d*[13579]` (i.e. ending in an odd digit) --- the 50
/// odd-indexed names, in lexicographic order.
#[test]
fn filtered_directory_stream_yields_only_odd_indexed_names_in_lexicographic_order() {
    let store = new_store();
    store.create_directory("/foo", "").unwrap();
    for i in 0..100 {
        write_file(&store, &format!("/foo/file{i}"), b"");
    }

    let ends_in_odd_digit: Filter = Box::new(|name| {
        Ok(name.chars().last().map(|c| matches!(c, '1' | '3' | '5' | '7' | '9')).unwrap_or(false))
    });
    let mut stream = store.read_directory("/foo", Some(ends_in_odd_digit)).unwrap();
    let names: Vec<_> = stream
        .iterator()
        .unwrap()
        .map(Result::unwrap)
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    let mut expected: Vec<String> = (0..100)
        .map(|i| format!("file{i}"))
        .filter(|name| matches!(name.as_bytes().last(), Some(b'1' | b'3' | b'5' | b'7' | b'9')))
        .collect();
    expected.sort();

    assert_eq!(names.len(), 50);
    assert_eq!(names, expected);
}

#[test]
fn listing_root_itself_works() {
    let store = new_store();
    write_file(&store, "/foo", b"");
    let mut stream = store.read_directory("/", None).unwrap();
    let names: Vec<_> = stream.iterator().unwrap().map(Result::unwrap).collect();
    assert_eq!(names, vec![std::path::PathBuf::from("/foo")]);
}
