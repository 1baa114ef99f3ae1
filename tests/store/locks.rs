use memfs_store::{Error, OpenOptions};

use crate::common::{new_store, write_file};

#[test]
fn non_overlapping_locks_from_different_channels_both_succeed() {
    let store = new_store();
    write_file(&store, "/a", b"0123456789");
    let first = store.open_channel("/a", OpenOptions::new().write(true), "").unwrap();
    let second = store.open_channel("/a", OpenOptions::new().write(true), "").unwrap();
    first.lock(0, 5, false).unwrap();
    second.lock(5, 5, false).unwrap();
}

#[test]
fn an_exclusive_lock_blocks_a_later_shared_lock_on_an_overlapping_range() {
    let store = new_store();
    write_file(&store, "/a", b"0123456789");
    let first = store.open_channel("/a", OpenOptions::new().write(true), "").unwrap();
    first.lock(0, u64::MAX, false).unwrap();

    let second = store.open_channel("/a", OpenOptions::new().read(true), "").unwrap();
    let err = second.lock(0, 10, true).unwrap_err();
    assert_eq!(err, Error::OverlappingFileLock);
}

#[test]
fn closing_a_channel_releases_the_locks_it_held() {
    let store = new_store();
    write_file(&store, "/a", b"0123456789");
    let first = store.open_channel("/a", OpenOptions::new().write(true), "").unwrap();
    first.lock(0, 10, false).unwrap();
    first.close();

    let second = store.open_channel("/a", OpenOptions::new().write(true), "").unwrap();
    second.lock(0, 10, false).unwrap();
}

#[test]
fn a_shared_lock_requires_a_readable_channel() {
    let store = new_store();
    write_file(&store, "/a", b"x");
    let channel = store.open_channel("/a", OpenOptions::new().write(true), "").unwrap();
    let err = channel.lock(0, 1, true).unwrap_err();
    assert_eq!(err, Error::NonReadableChannel);
}

#[test]
fn an_exclusive_lock_requires_a_writable_channel() {
    let store = new_store();
    write_file(&store, "/a", b"x");
    let channel = store.open_channel("/a", OpenOptions::new().read(true), "").unwrap();
    let err = channel.lock(0, 1, false).unwrap_err();
    assert_eq!(err, Error::NonWritableChannel);
}

#[test]
fn releasing_a_lock_then_reacquiring_it_succeeds() {
    let store = new_store();
    write_file(&store, "/a", b"x");
    let channel = store.open_channel("/a", OpenOptions::new().write(true), "").unwrap();
    let id = channel.lock(0, 1, false).unwrap();
    channel.unlock(id).unwrap();
    channel.lock(0, 1, false).unwrap();
}
