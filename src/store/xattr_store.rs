//! 宿主 xattr 存储
//!
//! 每个 EA 对应一个宿主扩展属性：
//!
//! ```text
//! 名称: <namespace><NAME>
//! 值:   [flag:1][blob]
//! ```
//!
//! `blob` 与单条记录中的值体相同（类型标签、显式长度和值）。
//! 名称空间之外的属性和名称不是大写形式的属性不可见。

use super::{
    table_enumerate, table_query, table_size, AttributeStore, FileRef, RawTable, StoreConfig,
};
use crate::{
    codec::{decode_raw_fea_list, RawFea},
    consts::*,
    ea::normalize_name,
    error::{Error, Result},
};
use alloc::string::String;
use alloc::vec::Vec;
use std::ffi::OsString;
use std::io;
use xattr::FileExt;

/// 基于宿主 xattr 的属性存储
#[derive(Debug, Clone, Default)]
pub struct XattrStore {
    config: StoreConfig,
}

fn map_xattr_error(op: &'static str, error: io::Error) -> Error {
    log::debug!("[STORE] xattr {} failed: {}", op, error);
    Error::store(op, error.raw_os_error().unwrap_or(0) as u32)
}

impl XattrStore {
    /// 按配置创建
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// 当前文件系统是否支持 xattr
    pub fn is_supported() -> bool {
        xattr::SUPPORTED_PLATFORM
    }

    /// 当前配置
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn host_name(&self, name: &str) -> String {
        let mut host = String::with_capacity(self.config.namespace.len() + name.len());
        host.push_str(&self.config.namespace);
        host.push_str(name);
        host
    }

    /// 宿主名称对应的 EA 名称；不属于本存储时为 `None`
    fn ea_name(&self, host: &OsString) -> Option<String> {
        let host = host.to_str()?;
        let name = host.strip_prefix(self.config.namespace.as_str())?;
        if name.is_empty() || name.len() > EA_NAME_MAX || normalize_name(name) != name {
            log::trace!("[STORE] xattr: ignoring {}", host);
            return None;
        }
        Some(String::from(name))
    }

    fn list(&self, file: FileRef<'_>, op: &'static str) -> Result<Vec<OsString>> {
        let names = match file {
            FileRef::Path(path) if self.config.follow_symlinks => xattr::list_deref(path),
            FileRef::Path(path) => xattr::list(path),
            FileRef::Handle(handle) => handle.list_xattr(),
        }
        .map_err(|error| map_xattr_error(op, error))?;
        Ok(names.collect())
    }

    fn get(&self, file: FileRef<'_>, host: &str, op: &'static str) -> Result<Option<Vec<u8>>> {
        match file {
            FileRef::Path(path) if self.config.follow_symlinks => xattr::get_deref(path, host),
            FileRef::Path(path) => xattr::get(path, host),
            FileRef::Handle(handle) => handle.get_xattr(host),
        }
        .map_err(|error| map_xattr_error(op, error))
    }

    fn set(&self, file: FileRef<'_>, host: &str, value: &[u8], op: &'static str) -> Result<()> {
        match file {
            FileRef::Path(path) if self.config.follow_symlinks => {
                xattr::set_deref(path, host, value)
            }
            FileRef::Path(path) => xattr::set(path, host, value),
            FileRef::Handle(handle) => handle.set_xattr(host, value),
        }
        .map_err(|error| map_xattr_error(op, error))
    }

    fn remove(&self, file: FileRef<'_>, host: &str, op: &'static str) -> Result<()> {
        match file {
            FileRef::Path(path) if self.config.follow_symlinks => xattr::remove_deref(path, host),
            FileRef::Path(path) => xattr::remove(path, host),
            FileRef::Handle(handle) => handle.remove_xattr(host),
        }
        .map_err(|error| map_xattr_error(op, error))
    }

    /// 读出文件上属于本存储的全部 EA，按名称排序
    fn load_table(&self, file: FileRef<'_>, op: &'static str) -> Result<RawTable> {
        let mut table = RawTable::new();
        for host in self.list(file, op)? {
            let Some(name) = self.ea_name(&host) else {
                continue;
            };
            // 列举与读取之间可能被删除
            let Some(value) = self.get(file, &self.host_name(&name), op)? else {
                continue;
            };
            let Some((&flag, blob)) = value.split_first() else {
                continue;
            };
            if blob.is_empty() || blob.len() > EA_VALUE_MAX {
                log::warn!("[STORE] xattr: skipping {} ({} byte value)", name, blob.len());
                continue;
            }
            table.push(RawFea {
                flag,
                name,
                blob: blob.to_vec(),
            });
        }
        table.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(table)
    }
}

impl AttributeStore for XattrStore {
    fn query_size(&self, file: FileRef<'_>) -> Result<u32> {
        table_size(&self.load_table(file, "query_size")?)
    }

    fn query_by_names(&self, file: FileRef<'_>, query: &[u8], capacity: usize) -> Result<Vec<u8>> {
        const OP: &str = "query_by_names";
        table_query(&self.load_table(file, OP)?, query, capacity, OP)
    }

    fn enumerate_all(&self, file: FileRef<'_>, capacity: usize) -> Result<Vec<u8>> {
        const OP: &str = "enumerate_all";
        table_enumerate(&self.load_table(file, OP)?, capacity, OP)
    }

    fn set_by_record(&mut self, file: FileRef<'_>, record: &[u8]) -> Result<()> {
        const OP: &str = "set_by_record";
        let raws = decode_raw_fea_list(record)?;

        for raw in raws {
            let host = self.host_name(&normalize_name(&raw.name));
            if raw.blob.is_empty() {
                if self.get(file, &host, OP)?.is_some() {
                    self.remove(file, &host, OP)?;
                    log::debug!("[STORE] xattr: removed {} from {}", host, file);
                }
                continue;
            }

            let mut value = Vec::with_capacity(1 + raw.blob.len());
            value.push(raw.flag);
            value.extend_from_slice(&raw.blob);
            self.set(file, &host, &value, OP)?;
            log::debug!("[STORE] xattr: set {} on {} ({} bytes)", host, file, value.len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_dena, encode_raw_fea_list};
    use alloc::vec;
    use std::fs;
    use std::path::Path;

    fn xattrs_supported(path: &Path) -> bool {
        match xattr::set(path, "user.ea_core_probe", b"1") {
            Ok(()) => {
                let _ = xattr::remove(path, "user.ea_core_probe");
                true
            }
            Err(_) => false,
        }
    }

    #[test]
    fn test_host_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        if !xattrs_supported(&path) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let mut store = XattrStore::default();
        let record = encode_raw_fea_list(&[RawFea {
            flag: 0x80,
            name: "note".into(),
            blob: vec![0xFD, 0xFF, 2, 0, b'h', b'i'],
        }])
        .unwrap();
        store.set_by_record(FileRef::Path(&path), &record).unwrap();

        let host = xattr::get(&path, "user.NOTE").unwrap().unwrap();
        assert_eq!(host, [0x80, 0xFD, 0xFF, 2, 0, b'h', b'i']);

        let size = store.query_size(FileRef::Path(&path)).unwrap();
        let dena = store.enumerate_all(FileRef::Path(&path), 2 * size as usize).unwrap();
        assert_eq!(decode_dena(&dena).unwrap()[0].name, "NOTE");
    }

    #[test]
    fn test_foreign_attributes_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        if !xattrs_supported(&path) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        xattr::set(&path, "user.lowercase", b"\0\xFD\xFF\x01\x00a").unwrap();
        let store = XattrStore::default();
        assert_eq!(store.query_size(FileRef::Path(&path)).unwrap(), 4);
    }

    #[test]
    fn test_remove_absent_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"x").unwrap();
        if !xattrs_supported(&path) {
            eprintln!("xattrs not supported, skipping test");
            return;
        }

        let mut store = XattrStore::default();
        let record = encode_raw_fea_list(&[RawFea {
            flag: 0,
            name: "GONE".into(),
            blob: Vec::new(),
        }])
        .unwrap();
        store.set_by_record(FileRef::Path(&path), &record).unwrap();
    }

    #[test]
    fn test_missing_path() {
        let store = XattrStore::default();
        let err = store
            .query_size(FileRef::Path(Path::new("/definitely/not/here")))
            .unwrap_err();
        assert_eq!(err.message(), "query_size");
        assert_eq!(err.code(), Some(ERROR_FILE_NOT_FOUND));
    }
}
