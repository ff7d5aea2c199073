//! 批量记录容器
//!
//! `[totalLen:4]` 之后是若干 `[nextOffset:4][单条记录]`，每个条目从 4 字节边界开始。

use super::{
    encode_list,
    fea::{self, RawFea},
    list_body, walk_entries, ListEntry,
};
use crate::{
    consts::*,
    ea::Ea,
    error::Result,
    utils::ByteWriter,
};
use alloc::vec::Vec;

impl ListEntry for Ea {
    fn encoded_len(&self) -> Result<usize> {
        fea::encoded_len(self)
    }

    fn encode(&self, w: &mut ByteWriter) -> Result<usize> {
        fea::encode_fea(self, w)
    }
}

impl ListEntry for RawFea {
    fn encoded_len(&self) -> Result<usize> {
        fea::raw_encoded_len(self)
    }

    fn encode(&self, w: &mut ByteWriter) -> Result<usize> {
        fea::encode_raw_fea(self, w)
    }
}

/// 按给定顺序编码一组 EA
///
/// 任一 EA 名称为空返回 [`MissingName`](crate::ErrorKind::MissingName)，
/// 此时不产生任何输出。
pub fn encode_fea_list<'a, I>(eas: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a Ea>,
{
    let eas: Vec<&Ea> = eas.into_iter().collect();
    encode_list(&eas)
}

/// 编码一组未解释的记录
pub fn encode_raw_fea_list(raws: &[RawFea]) -> Result<Vec<u8>> {
    encode_list(raws)
}

/// 解码批量记录，按缓冲区顺序返回所有条目（包括空值条目）
pub fn decode_fea_list(data: &[u8]) -> Result<Vec<Ea>> {
    decode_raw_fea_list(data)?
        .iter()
        .map(RawFea::to_ea)
        .collect()
}

/// 解码批量记录但不解释值体
pub fn decode_raw_fea_list(data: &[u8]) -> Result<Vec<RawFea>> {
    let body = list_body(data)?;
    let mut raws = Vec::new();
    if body.len() == LIST_HEADER_SIZE {
        return Ok(raws);
    }

    walk_entries(body, LIST_HEADER_SIZE, |r| {
        raws.push(fea::decode_raw_fea(r)?);
        Ok(())
    })?;
    Ok(raws)
}
