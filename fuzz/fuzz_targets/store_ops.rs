#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use memfs_store::{CopyOptions, FileStore, OpenOptions, StoreConfig};

/// A small, closed vocabulary of paths keeps most generated operations
/// landing on top of each other (create/delete/rename churn on the same
/// handful of names) instead of scattering across a sparse tree, which
/// is where interesting state transitions live.
const PATHS: &[&str] = &["/a", "/b", "/c", "/dir", "/dir/a", "/dir/b", "/link"];

#[derive(Debug, Arbitrary)]
enum Op {
    CreateDirectory { path: u8, attrs: u8 },
    CreateSymlink { path: u8, target: u8 },
    CreateLink { path: u8, existing: u8 },
    Write { path: u8, create: bool, truncate: bool, content: Vec<u8> },
    Read { path: u8 },
    Delete { path: u8 },
    Copy { source: u8, target: u8, replace: bool },
    Move { source: u8, target: u8, replace: bool },
    ReadDir { path: u8 },
    Clear,
}

fn path_for(index: u8) -> &'static str {
    PATHS[index as usize % PATHS.len()]
}

fuzz_target!(|ops: Vec<Op>| {
    let store = FileStore::new(StoreConfig::default());

    for op in ops {
        match op {
            Op::CreateDirectory { path, attrs } => {
                let creation_attrs = if attrs % 2 == 0 { "" } else { "memory:readOnly=true" };
                let _ = store.create_directory(path_for(path), creation_attrs);
            }
            Op::CreateSymlink { path, target } => {
                let _ = store.create_symbolic_link(path_for(path), path_for(target), "");
            }
            Op::CreateLink { path, existing } => {
                let _ = store.create_link(path_for(path), path_for(existing));
            }
            Op::Write { path, create, truncate, content } => {
                let mut options = OpenOptions::new().write(true);
                if create {
                    options = options.create(true);
                }
                if truncate {
                    options = options.truncate_existing(true);
                }
                if let Ok(channel) = store.open_channel(path_for(path), options, "") {
                    let _ = channel.write(&content);
                    channel.close();
                }
            }
            Op::Read { path } => {
                let _ = store.get_content(path_for(path));
            }
            Op::Delete { path } => {
                let _ = store.delete_if_exists(path_for(path));
            }
            Op::Copy { source, target, replace } => {
                let options = if replace { CopyOptions::new().replace_existing(true) } else { CopyOptions::new() };
                let _ = store.copy(path_for(source), path_for(target), options);
            }
            Op::Move { source, target, replace } => {
                let options = if replace { CopyOptions::new().replace_existing(true) } else { CopyOptions::new() };
                let _ = store.mv(path_for(source), path_for(target), options);
            }
            Op::ReadDir { path } => {
                if let Ok(mut stream) = store.read_directory(path_for(path), None) {
                    if let Ok(entries) = stream.iterator() {
                        for entry in entries {
                            let _ = entry;
                        }
                    }
                }
            }
            Op::Clear => store.clear(),
        }
    }
});
