//! 查询列表
//!
//! 只携带名称，用来告诉属性存储要取回哪些 EA：
//!
//! ```text
//! [totalLen:4] { [nextOffset:4][nameLen:1][name:nameLen] <pad> } ...
//! ```

use super::{encode_list, list_body, walk_entries, ListEntry};
use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
    utils::ByteWriter,
};
use alloc::string::String;
use alloc::vec::Vec;

/// 查询列表条目
struct GeaName<'a>(&'a str);

impl ListEntry for GeaName<'_> {
    fn encoded_len(&self) -> Result<usize> {
        if self.0.is_empty() {
            return Err(Error::new(ErrorKind::MissingName, "EA has no name"));
        }
        if self.0.len() > EA_NAME_MAX {
            return Err(Error::new(ErrorKind::TooLong, "EA name exceeds 255 bytes"));
        }
        Ok(1 + self.0.len())
    }

    fn encode(&self, w: &mut ByteWriter) -> Result<usize> {
        let len = self.encoded_len()?;
        w.put_u8(self.0.len() as u8);
        w.put_bytes(self.0.as_bytes());
        Ok(len)
    }
}

/// 从名称序列构造查询列表
///
/// 任一名称为空返回 [`ErrorKind::MissingName`]。
pub fn encode_gea_list<'a, I>(names: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a str>,
{
    let entries: Vec<GeaName<'a>> = names.into_iter().map(GeaName).collect();
    encode_list(&entries)
}

/// 解析查询列表，按顺序返回名称
pub fn decode_gea_list(data: &[u8]) -> Result<Vec<String>> {
    let body = list_body(data)?;
    let mut names = Vec::new();
    if body.len() == LIST_HEADER_SIZE {
        return Ok(names);
    }

    walk_entries(body, LIST_HEADER_SIZE, |r| {
        let name_len = r.read_u8()? as usize;
        names.push(r.read_name(name_len)?);
        Ok(())
    })?;
    Ok(names)
}
