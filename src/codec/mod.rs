//! EA 记录格式编解码
//!
//! 这个模块在内存中的 [`Ea`](crate::Ea) / [`EaList`](crate::EaList) 与属性存储
//! 交换的几种二进制记录之间转换。所有整数为小端序。
//!
//! # 记录格式
//!
//! | 格式 | 布局 |
//! |------|------|
//! | 单条记录 | `[flag:1][nameLen:1][valueLen:2][name][typeTag:2]?[explicitLen:2]?[value]` |
//! | 批量记录 | `[totalLen:4]` + 条目 `[nextOffset:4][单条记录]` |
//! | 查询列表 | `[totalLen:4]` + 条目 `[nextOffset:4][nameLen:1][name]` |
//! | 枚举结果 | 条目 `[nextOffset:4][nameLen:1][name][valueLen:4]` |
//!
//! 条目起始偏移总是 4 字节对齐；`nextOffset` 为到下一条目的相对偏移，
//! 最后一个条目为 0。`totalLen` 包括最后一个条目的填充。
//!
//! # 模块
//!
//! - [`fea`] - 单条记录
//! - [`fea_list`] - 批量记录容器
//! - [`gea`] - 查询列表
//! - [`dena`] - 枚举结果

/// 枚举结果
pub mod dena;
/// 单条记录
pub mod fea;
/// 批量记录
pub mod fea_list;
/// 查询列表
pub mod gea;

pub use dena::{decode_dena, encode_dena, DenaEntry};
pub use fea::{decode_fea, encode_fea, RawFea};
pub use fea_list::{decode_fea_list, decode_raw_fea_list, encode_fea_list, encode_raw_fea_list};
pub use gea::{decode_gea_list, encode_gea_list};

use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
    utils::{align_up, ByteReader, ByteWriter},
};

/// 链表容器中的一个条目
///
/// `encoded_len` 不含 `nextOffset` 和对齐填充。
pub(crate) trait ListEntry {
    fn encoded_len(&self) -> Result<usize>;
    fn encode(&self, w: &mut ByteWriter) -> Result<usize>;
}

impl<T: ListEntry + ?Sized> ListEntry for &T {
    fn encoded_len(&self) -> Result<usize> {
        (**self).encoded_len()
    }

    fn encode(&self, w: &mut ByteWriter) -> Result<usize> {
        (**self).encode(w)
    }
}

/// 编码带 `totalLen` 头部的链表容器
///
/// 先完整校验并计算长度，再一次性分配、写入。
pub(crate) fn encode_list<T: ListEntry>(entries: &[T]) -> Result<alloc::vec::Vec<u8>> {
    let mut total = LIST_HEADER_SIZE;
    for entry in entries {
        total += align_up(NEXT_OFFSET_SIZE + entry.encoded_len()?);
    }
    let total_len = u32::try_from(total)
        .map_err(|_| Error::new(ErrorKind::TooLong, "EA list exceeds 4 GiB"))?;

    let mut w = ByteWriter::with_capacity(total)?;
    w.put_u32(total_len);

    for (index, entry) in entries.iter().enumerate() {
        let next_at = w.reserve_u32();
        let len = NEXT_OFFSET_SIZE + entry.encode(&mut w)?;
        if index + 1 < entries.len() {
            w.patch_u32(next_at, align_up(len) as u32)?;
        }
        w.pad_to_alignment();
    }

    debug_assert_eq!(w.position(), total);
    Ok(w.into_inner())
}

/// 遍历 `[nextOffset:4]` 链接的条目
///
/// 从 `first` 开始，直到 `nextOffset == 0`。`visit` 收到定位在 `nextOffset`
/// 之后的游标。偏移必须向前推进且不能越过缓冲区末尾，否则返回 [`ErrorKind::Corrupted`]。
pub(crate) fn walk_entries<'a, F>(data: &'a [u8], first: usize, mut visit: F) -> Result<()>
where
    F: FnMut(&mut ByteReader<'a>) -> Result<()>,
{
    let mut r = ByteReader::new(data);
    let mut entry_start = first;

    loop {
        r.seek(entry_start)?;
        let next = r.read_u32()? as usize;
        visit(&mut r)?;

        if next == 0 {
            return Ok(());
        }

        let consumed = r.position() - entry_start;
        if next < consumed || entry_start + next > data.len() {
            return Err(Error::new(ErrorKind::Corrupted, "invalid next entry offset"));
        }
        entry_start += next;
    }
}

/// 读取并校验容器的 `totalLen`，返回容器切片
pub(crate) fn list_body(data: &[u8]) -> Result<&[u8]> {
    let mut r = ByteReader::new(data);
    let total = r.read_u32()? as usize;
    if total < LIST_HEADER_SIZE || total > data.len() {
        return Err(Error::new(ErrorKind::Corrupted, "invalid EA list length"));
    }
    Ok(&data[..total])
}
