//! 单条 EA 记录的编解码
//!
//! 记录体布局（不含 `nextOffset`）：
//!
//! ```text
//! [flag:1][nameLen:1][valueLen:2][name:nameLen][typeTag:2]?[explicitLen:2]?[value]
//! ```
//!
//! `valueLen` 覆盖类型标签、显式长度和值本身；值为空时为 0，且不写类型标签。

use crate::{
    consts::*,
    ea::Ea,
    error::{Error, ErrorKind, Result},
    types::EaType,
    utils::{ByteReader, ByteWriter},
};
use alloc::string::String;
use alloc::vec::Vec;

/// 未解释的记录
///
/// `blob` 是记录中 `valueLen` 覆盖的原始字节（类型标签 + 可选长度 + 值）。
/// 属性存储只搬运这部分，不解释其内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFea {
    /// 标志字节
    pub flag: u8,
    /// 名称
    pub name: String,
    /// 带类型的值体
    pub blob: Vec<u8>,
}

/// 单条记录体的编码长度
///
/// 同时检查名称非空，以及名称和值是否能放进各自的长度字段。
pub fn encoded_len(ea: &Ea) -> Result<usize> {
    if ea.name().is_empty() {
        return Err(Error::new(ErrorKind::MissingName, "EA has no name"));
    }
    let name_len = ea.name().len();
    if name_len > EA_NAME_MAX {
        return Err(Error::new(ErrorKind::TooLong, "EA name exceeds 255 bytes"));
    }
    let value_len = value_field_len(ea);
    if value_len > EA_VALUE_MAX {
        return Err(Error::new(ErrorKind::TooLong, "EA value exceeds 65535 bytes"));
    }
    Ok(FEA_FIXED_SIZE + name_len + value_len)
}

/// `valueLen` 字段的最终取值
fn value_field_len(ea: &Ea) -> usize {
    if ea.value().is_empty() {
        return 0;
    }
    let mut len = WORD_SIZE + ea.value().len();
    if ea.is_length_prefixed() {
        len += WORD_SIZE;
    }
    len
}

/// 编码一条记录体，返回写入的字节数
///
/// `valueLen` 先预留，写入基础值长度，写类型标签后加 2，写显式长度后再加 2。
/// 名称为空返回 [`ErrorKind::MissingName`]。
pub fn encode_fea(ea: &Ea, w: &mut ByteWriter) -> Result<usize> {
    // 校验在写入之前完成，失败时 writer 保持不变
    encoded_len(ea)?;

    let start = w.position();
    let value = ea.value();

    w.put_u8(ea.flag());
    w.put_u8(ea.name().len() as u8);
    let value_len_at = w.reserve_u16();
    w.patch_u16(value_len_at, value.len() as u16)?;
    w.put_bytes(ea.name().as_bytes());

    if !value.is_empty() {
        w.put_u16(ea.ea_type().tag());
        w.add_u16(value_len_at, WORD_SIZE as u16)?;
        if ea.is_length_prefixed() {
            w.put_u16(value.len() as u16);
            w.add_u16(value_len_at, WORD_SIZE as u16)?;
        }
        w.put_bytes(value);
    }

    Ok(w.position() - start)
}

/// 编码一条未解释的记录体
pub fn encode_raw_fea(raw: &RawFea, w: &mut ByteWriter) -> Result<usize> {
    raw_encoded_len(raw)?;

    let start = w.position();
    w.put_u8(raw.flag);
    w.put_u8(raw.name.len() as u8);
    w.put_u16(raw.blob.len() as u16);
    w.put_bytes(raw.name.as_bytes());
    w.put_bytes(&raw.blob);
    Ok(w.position() - start)
}

/// 未解释记录体的编码长度
pub fn raw_encoded_len(raw: &RawFea) -> Result<usize> {
    if raw.name.is_empty() {
        return Err(Error::new(ErrorKind::MissingName, "EA has no name"));
    }
    if raw.name.len() > EA_NAME_MAX {
        return Err(Error::new(ErrorKind::TooLong, "EA name exceeds 255 bytes"));
    }
    if raw.blob.len() > EA_VALUE_MAX {
        return Err(Error::new(ErrorKind::TooLong, "EA value exceeds 65535 bytes"));
    }
    Ok(FEA_FIXED_SIZE + raw.name.len() + raw.blob.len())
}

/// 读取一条记录体，不解释值
pub fn decode_raw_fea(r: &mut ByteReader<'_>) -> Result<RawFea> {
    let flag = r.read_u8()?;
    let name_len = r.read_u8()? as usize;
    let value_len = r.read_u16()? as usize;
    let name = r.read_name(name_len)?;
    let blob = r.read_bytes(value_len)?;

    Ok(RawFea {
        flag,
        name,
        blob: blob.to_vec(),
    })
}

/// 解释值体
///
/// 空值体解码为空值的 ASCII EA。否则前两个字节为类型标签；
/// 需要长度前缀的类型再读两个字节的显式长度，其余类型把剩余字节原样作为值。
pub fn decode_blob(name: &str, flag: u8, blob: &[u8]) -> Result<Ea> {
    if blob.is_empty() {
        return Ok(Ea::new(name, Vec::new(), EaType::Ascii, flag));
    }

    let mut r = ByteReader::new(blob);
    let ea_type = EaType::from_tag(r.read_u16()?);
    let value = if ea_type.is_length_prefixed() {
        let explicit_len = r.read_u16()? as usize;
        let value = r.read_bytes(explicit_len)?;
        if r.remaining() != 0 {
            log::debug!(
                "[CODEC] EA {} carries {} bytes after its explicit length",
                name,
                r.remaining()
            );
        }
        value
    } else {
        r.read_rest()
    };

    Ok(Ea::new(name, value.to_vec(), ea_type, flag))
}

/// 解码一条记录体
pub fn decode_fea(r: &mut ByteReader<'_>) -> Result<Ea> {
    let raw = decode_raw_fea(r)?;
    decode_blob(&raw.name, raw.flag, &raw.blob)
}

impl RawFea {
    /// 从 EA 生成未解释记录
    pub fn from_ea(ea: &Ea) -> Result<Self> {
        let mut w = ByteWriter::with_capacity(encoded_len(ea)?)?;
        let len = encode_fea(ea, &mut w)?;
        let body = w.into_inner();
        debug_assert_eq!(len, body.len());
        Ok(Self {
            flag: ea.flag(),
            name: ea.name().into(),
            blob: body[FEA_FIXED_SIZE + ea.name().len()..].to_vec(),
        })
    }

    /// 解释为 EA
    pub fn to_ea(&self) -> Result<Ea> {
        decode_blob(&self.name, self.flag, &self.blob)
    }
}
