//! 枚举结果
//!
//! 属性存储枚举一个文件的全部 EA 时返回的名称序列，只带值长度，不带值：
//!
//! ```text
//! { [nextOffset:4][nameLen:1][name:nameLen][valueLen:4] <pad> } ...
//! ```
//!
//! 没有 `totalLen` 头部；空缓冲区表示文件没有 EA。读取全部 EA 时，
//! 先由枚举结果构造查询列表，再按其中的值长度估算批量记录的缓冲区大小。

use super::{encode_gea_list, walk_entries};
use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
    utils::{align_up, ByteWriter},
};
use alloc::string::String;
use alloc::vec::Vec;

/// 枚举结果中的一个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenaEntry {
    /// EA 名称
    pub name: String,
    /// 值体长度（即单条记录中的 `valueLen`）
    pub value_len: u32,
}

/// 编码枚举结果
pub fn encode_dena(entries: &[DenaEntry]) -> Result<Vec<u8>> {
    let mut total = 0;
    for entry in entries {
        if entry.name.is_empty() {
            return Err(Error::new(ErrorKind::MissingName, "EA has no name"));
        }
        if entry.name.len() > EA_NAME_MAX {
            return Err(Error::new(ErrorKind::TooLong, "EA name exceeds 255 bytes"));
        }
        total += align_up(DENA_FIXED_SIZE + entry.name.len());
    }

    let mut w = ByteWriter::with_capacity(total)?;
    for (index, entry) in entries.iter().enumerate() {
        let next_at = w.reserve_u32();
        w.put_u8(entry.name.len() as u8);
        w.put_bytes(entry.name.as_bytes());
        w.put_u32(entry.value_len);
        if index + 1 < entries.len() {
            w.patch_u32(next_at, align_up(DENA_FIXED_SIZE + entry.name.len()) as u32)?;
        }
        w.pad_to_alignment();
    }
    Ok(w.into_inner())
}

/// 解码枚举结果
pub fn decode_dena(data: &[u8]) -> Result<Vec<DenaEntry>> {
    let mut entries = Vec::new();
    if data.is_empty() {
        return Ok(entries);
    }

    walk_entries(data, 0, |r| {
        let name_len = r.read_u8()? as usize;
        let name = r.read_name(name_len)?;
        let value_len = r.read_u32()?;
        entries.push(DenaEntry { name, value_len });
        Ok(())
    })?;
    Ok(entries)
}

/// 由枚举结果构造查询列表
pub fn gea_list_from_dena(entries: &[DenaEntry]) -> Result<Vec<u8>> {
    encode_gea_list(entries.iter().map(|entry| entry.name.as_str()))
}

/// 容纳所有枚举条目的批量记录大小
pub fn fea_list_capacity(entries: &[DenaEntry]) -> usize {
    LIST_HEADER_SIZE
        + entries
            .iter()
            .map(|entry| {
                align_up(NEXT_OFFSET_SIZE + FEA_FIXED_SIZE + entry.name.len() + entry.value_len as usize)
            })
            .sum::<usize>()
}
