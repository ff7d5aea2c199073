//! 进程内属性存储

use super::{
    table_apply, table_enumerate, table_query, table_size, AttributeStore, FileRef, RawTable,
};
use crate::{
    codec::{decode_raw_fea_list, RawFea},
    consts::*,
    error::{Error, Result},
};
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use std::path::{Path, PathBuf};

/// 以路径为键的内存存储
///
/// 只支持 [`FileRef::Path`]；文件需要先用 [`MemoryStore::create_file`] 登记。
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    files: BTreeMap<PathBuf, RawTable>,
}

impl MemoryStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个没有 EA 的文件；已存在时不变
    pub fn create_file(&mut self, path: impl Into<PathBuf>) {
        self.files.entry(path.into()).or_default();
    }

    /// 是否已登记该文件
    pub fn contains_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// 文件上的原始记录，按名称排序
    pub fn raw_attributes(&self, path: &Path) -> Option<&[RawFea]> {
        self.files.get(path).map(Vec::as_slice)
    }

    fn table(&self, file: FileRef<'_>, op: &'static str) -> Result<&RawTable> {
        match file {
            FileRef::Path(path) => self
                .files
                .get(path)
                .ok_or(Error::store(op, ERROR_FILE_NOT_FOUND)),
            FileRef::Handle(_) => Err(Error::store(op, ERROR_INVALID_HANDLE)),
        }
    }

    fn table_mut(&mut self, file: FileRef<'_>, op: &'static str) -> Result<&mut RawTable> {
        match file {
            FileRef::Path(path) => self
                .files
                .get_mut(path)
                .ok_or(Error::store(op, ERROR_FILE_NOT_FOUND)),
            FileRef::Handle(_) => Err(Error::store(op, ERROR_INVALID_HANDLE)),
        }
    }
}

impl AttributeStore for MemoryStore {
    fn query_size(&self, file: FileRef<'_>) -> Result<u32> {
        table_size(self.table(file, "query_size")?)
    }

    fn query_by_names(&self, file: FileRef<'_>, query: &[u8], capacity: usize) -> Result<Vec<u8>> {
        const OP: &str = "query_by_names";
        table_query(self.table(file, OP)?, query, capacity, OP)
    }

    fn enumerate_all(&self, file: FileRef<'_>, capacity: usize) -> Result<Vec<u8>> {
        const OP: &str = "enumerate_all";
        table_enumerate(self.table(file, OP)?, capacity, OP)
    }

    fn set_by_record(&mut self, file: FileRef<'_>, record: &[u8]) -> Result<()> {
        let table = self.table_mut(file, "set_by_record")?;
        // 先完整解码，损坏的记录不改动任何 EA
        let raws = decode_raw_fea_list(record)?;
        log::trace!("[STORE] memory: applying {} entries to {}", raws.len(), file);
        for raw in raws {
            table_apply(table, raw);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_dena, encode_gea_list, encode_raw_fea_list};
    use crate::ErrorKind;
    use alloc::vec;

    const PATH: &str = "/mem/a";

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.create_file(PATH);
        store
    }

    fn path() -> FileRef<'static> {
        FileRef::Path(Path::new(PATH))
    }

    #[test]
    fn test_empty_file() {
        let store = store();
        assert_eq!(store.query_size(path()).unwrap(), 4);
        assert!(store.enumerate_all(path(), 64).unwrap().is_empty());
        assert!(store.contains_file(Path::new(PATH)));
    }

    #[test]
    fn test_set_and_enumerate() {
        let mut store = store();
        let record = encode_raw_fea_list(&[
            RawFea { flag: 0x80, name: "zeta".into(), blob: vec![0xFE, 0xFF, 1, 0, 7] },
            RawFea { flag: 0, name: "ALPHA".into(), blob: vec![0xFD, 0xFF, 0, 0] },
        ])
        .unwrap();
        store.set_by_record(path(), &record).unwrap();

        let size = store.query_size(path()).unwrap();
        let dena = decode_dena(&store.enumerate_all(path(), 2 * size as usize).unwrap()).unwrap();
        let names: Vec<_> = dena.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["ALPHA", "ZETA"]);
        assert_eq!(dena[1].value_len, 5);
    }

    #[test]
    fn test_corrupt_record_changes_nothing() {
        let mut store = store();
        let mut record = encode_raw_fea_list(&[RawFea {
            flag: 0,
            name: "A".into(),
            blob: vec![1],
        }])
        .unwrap();
        record.truncate(record.len() - 4);

        assert!(store.set_by_record(path(), &record).is_err());
        assert!(store.raw_attributes(Path::new(PATH)).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_file_and_handle() {
        let mut store = MemoryStore::new();
        let err = store.query_size(path()).unwrap_err();
        assert_eq!(err.code(), Some(ERROR_FILE_NOT_FOUND));

        let file = tempfile::tempfile().unwrap();
        let query = encode_gea_list(["A"]).unwrap();
        let err = store
            .query_by_names(FileRef::Handle(&file), &query, 64)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
        assert_eq!(err.code(), Some(ERROR_INVALID_HANDLE));
        assert_eq!(err.message(), "query_by_names");

        let err = store.set_by_record(FileRef::Handle(&file), &[4, 0, 0, 0]).unwrap_err();
        assert_eq!(err.code(), Some(ERROR_INVALID_HANDLE));
    }
}
