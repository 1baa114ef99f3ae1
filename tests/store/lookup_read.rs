use memfs_store::{Error, OpenOptions};

use crate::common::{new_store, write_file};

#[test]
fn reading_a_missing_path_fails_with_no_such_file() {
    let store = new_store();
    let err = store.get_content("/missing").unwrap_err();
    assert!(matches!(err, Error::NoSuchFile(_)));
}

#[test]
fn dot_and_dot_dot_components_normalize_during_resolution() {
    let store = new_store();
    store.create_directory("/dir", "").unwrap();
    write_file(&store, "/dir/file", b"payload");
    assert_eq!(store.get_content("/dir/../dir/./file").unwrap(), b"payload");
}

#[test]
fn to_real_path_resolves_intermediate_symlinks() {
    let store = new_store();
    store.create_directory("/real", "").unwrap();
    write_file(&store, "/real/file", b"x");
    store.create_symbolic_link("/link", "/real", "").unwrap();
    assert_eq!(store.to_real_path("/link/file", false).unwrap(), std::path::PathBuf::from("/real/file"));
}

#[test]
fn input_stream_reads_from_the_beginning_and_reports_available_bytes() {
    let store = new_store();
    write_file(&store, "/foo", b"hello world");
    let stream = store.open_input_stream("/foo", OpenOptions::new()).unwrap();
    assert_eq!(stream.available().unwrap(), 11);
    let mut buf = [0u8; 5];
    assert_eq!(stream.read(&mut buf).unwrap(), 5);
    assert_eq!(&buf, b"hello");
    assert_eq!(stream.available().unwrap(), 6);
}

#[test]
fn input_stream_rejects_write_implying_options() {
    let store = new_store();
    write_file(&store, "/foo", b"x");
    let err = store.open_input_stream("/foo", OpenOptions::new().write(true)).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation(_)));
}

#[test]
fn output_stream_defaults_to_creating_and_appends_from_current_end() {
    let store = new_store();
    write_file(&store, "/foo", b"ab");
    let stream = store.open_output_stream("/foo", OpenOptions::new()).unwrap();
    stream.write(b"cd").unwrap();
    stream.close();
    assert_eq!(store.get_content("/foo").unwrap(), b"abcd");
}
