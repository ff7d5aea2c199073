//! 属性存储抽象
//!
//! 真正读写文件 EA 的是外部的属性存储。本模块只定义它的能力接口
//! [`AttributeStore`]，以及两种实现：
//!
//! - [`MemoryStore`] - 进程内存储，测试和交互式驱动程序使用
//! - [`XattrStore`] - 映射到宿主文件系统的 xattr（unix，`xattr` feature）
//!
//! 存储交换的都是 [`codec`](crate::codec) 中定义的原始记录，
//! 适配层只负责按 `query_size` 估算缓冲区大小并转交字节，不做语义解释。

mod memory;
#[cfg(all(unix, feature = "xattr"))]
mod xattr_store;

pub use memory::MemoryStore;
#[cfg(all(unix, feature = "xattr"))]
pub use xattr_store::XattrStore;

use crate::{
    codec::{
        dena::{encode_dena, DenaEntry},
        fea::{raw_encoded_len, RawFea},
        decode_gea_list, encode_raw_fea_list,
    },
    consts::*,
    ea::normalize_name,
    error::{Error, Result},
    utils::align_up,
};
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use std::fs::File;
use std::path::Path;

/// 文件引用
///
/// 由调用者选择按路径还是按已打开的句柄访问。
#[derive(Debug, Clone, Copy)]
pub enum FileRef<'a> {
    /// 文件路径
    Path(&'a Path),
    /// 已打开的文件
    Handle(&'a File),
}

impl fmt::Display for FileRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRef::Path(path) => write!(f, "{}", path.display()),
            FileRef::Handle(_) => f.write_str("<file handle>"),
        }
    }
}

impl<'a> From<&'a Path> for FileRef<'a> {
    fn from(path: &'a Path) -> Self {
        FileRef::Path(path)
    }
}

impl<'a> From<&'a File> for FileRef<'a> {
    fn from(file: &'a File) -> Self {
        FileRef::Handle(file)
    }
}

/// 属性存储接口
///
/// 实现者自行串行化对同一文件的并发访问。
pub trait AttributeStore {
    /// 文件全部 EA 编码为批量记录后的大小
    fn query_size(&self, file: FileRef<'_>) -> Result<u32>;

    /// 按查询列表取回 EA，返回批量记录
    ///
    /// 查询列表中每个名称在结果中都有一个条目；文件上不存在的 EA 值体为空。
    /// 结果超过 `capacity` 时返回 `ERROR_BUFFER_OVERFLOW`。
    fn query_by_names(&self, file: FileRef<'_>, query: &[u8], capacity: usize) -> Result<Vec<u8>>;

    /// 枚举文件的全部 EA，返回枚举结果（无值）
    fn enumerate_all(&self, file: FileRef<'_>, capacity: usize) -> Result<Vec<u8>>;

    /// 按批量记录设置 EA；值体为空的条目表示删除
    fn set_by_record(&mut self, file: FileRef<'_>, record: &[u8]) -> Result<()>;
}

/// 存储配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// 宿主 xattr 名称前缀
    pub namespace: String,
    /// 是否跟随符号链接
    pub follow_symlinks: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: String::from("user."),
            follow_symlinks: true,
        }
    }
}

/// 为按名称查询估算结果缓冲区大小
///
/// 结果中每个条目比查询条目多 3 字节固定部分，外加值体；
/// 值体总和不超过 `size`。
pub(crate) fn query_capacity(size: u32, query: &[u8]) -> usize {
    size as usize + 2 * query.len()
}

/// 为枚举估算缓冲区大小
pub(crate) fn enumerate_capacity(size: u32) -> usize {
    2 * size as usize
}

//=============================================================================
// 存储实现共用的记录表操作
//=============================================================================

/// 一个文件的全部 EA，按名称排序
pub(crate) type RawTable = Vec<RawFea>;

/// 记录表编码为批量记录后的大小
pub(crate) fn table_size(table: &[RawFea]) -> Result<u32> {
    let mut total = LIST_HEADER_SIZE;
    for raw in table {
        total += align_up(NEXT_OFFSET_SIZE + raw_encoded_len(raw)?);
    }
    Ok(total as u32)
}

/// 在记录表中按名称查找（不区分大小写）
pub(crate) fn table_find(table: &[RawFea], name: &str) -> core::result::Result<usize, usize> {
    let key = normalize_name(name);
    table.binary_search_by(|raw| raw.name.as_str().cmp(key.as_str()))
}

/// 把一条记录应用到记录表：空值体删除，否则插入或替换
pub(crate) fn table_apply(table: &mut RawTable, mut raw: RawFea) {
    raw.name = normalize_name(&raw.name);
    match (table_find(table, &raw.name), raw.blob.is_empty()) {
        (Ok(index), true) => {
            table.remove(index);
        }
        (Ok(index), false) => table[index] = raw,
        (Err(_), true) => {}
        (Err(index), false) => table.insert(index, raw),
    }
}

/// 回答按名称查询
pub(crate) fn table_query(
    table: &[RawFea],
    query: &[u8],
    capacity: usize,
    op: &'static str,
) -> Result<Vec<u8>> {
    let names = decode_gea_list(query)?;
    let reply: Vec<RawFea> = names
        .iter()
        .map(|name| match table_find(table, name) {
            Ok(index) => table[index].clone(),
            Err(_) => RawFea {
                flag: 0,
                name: normalize_name(name),
                blob: Vec::new(),
            },
        })
        .collect();

    let record = encode_raw_fea_list(&reply)?;
    check_capacity(record, capacity, op)
}

/// 枚举记录表
pub(crate) fn table_enumerate(
    table: &[RawFea],
    capacity: usize,
    op: &'static str,
) -> Result<Vec<u8>> {
    let entries: Vec<DenaEntry> = table
        .iter()
        .map(|raw| DenaEntry {
            name: raw.name.clone(),
            value_len: raw.blob.len() as u32,
        })
        .collect();

    let record = encode_dena(&entries)?;
    check_capacity(record, capacity, op)
}

fn check_capacity(record: Vec<u8>, capacity: usize, op: &'static str) -> Result<Vec<u8>> {
    if record.len() > capacity {
        log::warn!(
            "[STORE] {} needs {} bytes, caller provided {}",
            op,
            record.len(),
            capacity
        );
        return Err(Error::store(op, ERROR_BUFFER_OVERFLOW));
    }
    Ok(record)
}
