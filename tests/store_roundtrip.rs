use ea_core::{AttributeStore, Ea, EaList, EaType, ErrorKind, FileRef, MemoryStore};
use std::path::Path;

fn document() -> EaList {
    let mut list = EaList::new();
    list.insert(Ea::ascii(".SUBJECT", "quarterly report")).unwrap();
    list.insert(Ea::ascii(".COMMENTS", "draft")).unwrap();
    list.insert(Ea::new(".ICON", vec![0x42; 300], EaType::Icon, 0x80)).unwrap();
    list
}

/// 把集合打包为一个多值 EA 存进文件，再读出并还原
fn snapshot_and_restore<S: AttributeStore>(store: &mut S, file: FileRef<'_>) {
    let original = document();
    let snapshot = Ea::from_list_with_code_page("SNAPSHOT", &original, 0, 850).unwrap();
    snapshot.write(store, file).unwrap();

    let mut stored = Ea::named("snapshot");
    stored.read(&*store, file).unwrap();
    assert_eq!(stored, snapshot);
    assert_eq!(stored.code_page().unwrap(), 850);

    // 成员名称在打包时丢失，值按排序顺序回填
    let mut restored = EaList::new();
    for ea in original.iter() {
        restored.insert(Ea::named(ea.name())).unwrap();
    }
    restored.set_values(&stored).unwrap();
    let values: Vec<_> = restored.iter().map(|ea| ea.value().to_vec()).collect();
    let expected: Vec<_> = original.iter().map(|ea| ea.value().to_vec()).collect();
    assert_eq!(values, expected);
}

/// 写入、全量读取、删除一个成员、删除全部
fn list_lifecycle<S: AttributeStore>(store: &mut S, file: FileRef<'_>) {
    let mut list = document();
    list.write(store, file).unwrap();

    let mut all = EaList::new();
    all.read_all(&*store, file).unwrap();
    assert_eq!(all, document());

    Ea::named(".comments").remove(store, file).unwrap();
    all.read_all(&*store, file).unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.get(".COMMENTS").is_none());

    EaList::new().remove_all(store, file).unwrap();
    all.read_all(&*store, file).unwrap();
    assert!(all.is_empty());
}

#[test]
fn memory_store_lifecycle() {
    let mut store = MemoryStore::new();
    store.create_file("/doc");
    list_lifecycle(&mut store, FileRef::Path(Path::new("/doc")));
}

#[test]
fn memory_store_snapshot() {
    let mut store = MemoryStore::new();
    store.create_file("/doc");
    snapshot_and_restore(&mut store, FileRef::Path(Path::new("/doc")));
}

#[test]
fn memory_store_copy_between_files() {
    let mut store = MemoryStore::new();
    store.create_file("/a");
    store.create_file("/b");
    let (a, b) = (FileRef::Path(Path::new("/a")), FileRef::Path(Path::new("/b")));

    document().write(&mut store, a).unwrap();
    let mut copy = EaList::new();
    copy.read_all(&store, a).unwrap();
    copy.write_cached(&mut store, b).unwrap();

    assert_eq!(store.raw_attributes(Path::new("/a")), store.raw_attributes(Path::new("/b")));
}

#[test]
fn persisted_list_survives_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.bin");

    let mut list = document();
    let mut sink = std::fs::File::create(&path).unwrap();
    list.save_to(&mut sink).unwrap();
    drop(sink);

    let mut back = EaList::new();
    back.load_from(&mut std::fs::File::open(&path).unwrap()).unwrap();
    assert_eq!(back, document());
}

#[test]
fn empty_name_is_rejected_everywhere() {
    let mut store = MemoryStore::new();
    store.create_file("/doc");
    let file = FileRef::Path(Path::new("/doc"));

    let err = Ea::named("").write(&mut store, file).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingName);
    assert_eq!(EaList::new().insert(Ea::named("")).unwrap_err().kind(), ErrorKind::MissingName);
}

#[cfg(all(unix, feature = "xattr"))]
mod host {
    use super::*;
    use ea_core::{StoreConfig, XattrStore};

    fn xattrs_supported(path: &Path) -> bool {
        match xattr::set(path, "user.ea_core_probe", b"1") {
            Ok(()) => {
                let _ = xattr::remove(path, "user.ea_core_probe");
                true
            }
            Err(_) => false,
        }
    }

    fn temp_file() -> Option<(tempfile::TempDir, std::path::PathBuf)> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, b"content").unwrap();
        if !xattrs_supported(&path) {
            eprintln!("xattrs not supported, skipping test");
            return None;
        }
        Some((dir, path))
    }

    #[test]
    fn xattr_store_lifecycle() {
        let Some((_dir, path)) = temp_file() else {
            return;
        };
        let mut store = XattrStore::new(StoreConfig::default());
        list_lifecycle(&mut store, FileRef::Path(&path));
    }

    #[test]
    fn xattr_store_snapshot_by_handle() {
        let Some((_dir, path)) = temp_file() else {
            return;
        };
        let handle = std::fs::File::open(&path).unwrap();
        let mut store = XattrStore::default();
        snapshot_and_restore(&mut store, FileRef::Handle(&handle));
    }
}
