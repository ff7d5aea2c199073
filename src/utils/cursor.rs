//! 带边界检查的字节游标
//!
//! 所有多字节字段都是小端序。读取前先检查剩余长度，越界返回
//! [`ErrorKind::Corrupted`]，不会 panic。

use crate::{
    consts::*,
    error::{Error, ErrorKind, Result},
};
use alloc::{string::String, vec::Vec};
use byteorder::{ByteOrder, LittleEndian};

/// 计算把 `len` 补齐到 4 字节边界所需的填充字节数
///
/// 即 `(4 - len % 4) % 4`
#[inline]
pub const fn padding(len: usize) -> usize {
    (EA_PAD - (len & EA_ROUND)) & EA_ROUND
}

/// 向上对齐到 4 字节边界
#[inline]
pub const fn align_up(len: usize) -> usize {
    len + padding(len)
}

/// 只读字节游标
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// 从缓冲区开头创建游标
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// 当前位置
    pub fn position(&self) -> usize {
        self.pos
    }

    /// 剩余字节数
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// 跳转到绝对位置
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::new(ErrorKind::Corrupted, "offset beyond end of buffer"));
        }
        self.pos = pos;
        Ok(())
    }

    /// 读取 `n` 个字节
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::new(ErrorKind::Corrupted, "record truncated"));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// 读取剩余全部字节
    pub fn read_rest(&mut self) -> &'a [u8] {
        let bytes = &self.data[self.pos..];
        self.pos = self.data.len();
        bytes
    }

    /// 读取 `n` 字节的 EA 名称
    ///
    /// 名称必须是合法 UTF-8，否则返回 [`ErrorKind::Corrupted`]，游标不移动。
    pub fn read_name(&mut self, n: usize) -> Result<String> {
        let start = self.pos;
        let bytes = self.read_bytes(n)?;
        match core::str::from_utf8(bytes) {
            Ok(name) => Ok(String::from(name)),
            Err(_) => {
                self.pos = start;
                Err(Error::new(ErrorKind::Corrupted, "EA name is not valid UTF-8"))
            }
        }
    }

    /// 读取 u8
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// 读取小端 u16
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    /// 读取小端 u32
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }
}

/// 追加写入的字节游标
///
/// 支持先预留长度字段、写完后再回填（back-patch）。
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// 预分配 `capacity` 字节
    ///
    /// 分配失败返回 [`ErrorKind::AllocationFailure`]
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        Ok(Self { buf })
    }

    /// 已写入字节数
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// 写入 u8
    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// 写入小端 u16
    pub fn put_u16(&mut self, value: u16) {
        let mut word = [0u8; 2];
        LittleEndian::write_u16(&mut word, value);
        self.buf.extend_from_slice(&word);
    }

    /// 写入小端 u32
    pub fn put_u32(&mut self, value: u32) {
        let mut dword = [0u8; 4];
        LittleEndian::write_u32(&mut dword, value);
        self.buf.extend_from_slice(&dword);
    }

    /// 写入原始字节
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// 预留一个 u16 字段，返回其偏移
    pub fn reserve_u16(&mut self) -> usize {
        let at = self.position();
        self.put_u16(0);
        at
    }

    /// 预留一个 u32 字段，返回其偏移
    pub fn reserve_u32(&mut self) -> usize {
        let at = self.position();
        self.put_u32(0);
        at
    }

    /// 回填 u16 字段
    pub fn patch_u16(&mut self, at: usize, value: u16) -> Result<()> {
        let slot = self
            .buf
            .get_mut(at..at + 2)
            .ok_or(Error::new(ErrorKind::Corrupted, "patch offset out of range"))?;
        LittleEndian::write_u16(slot, value);
        Ok(())
    }

    /// 回填 u32 字段
    pub fn patch_u32(&mut self, at: usize, value: u32) -> Result<()> {
        let slot = self
            .buf
            .get_mut(at..at + 4)
            .ok_or(Error::new(ErrorKind::Corrupted, "patch offset out of range"))?;
        LittleEndian::write_u32(slot, value);
        Ok(())
    }

    /// 在已写入的 u16 字段上累加
    pub fn add_u16(&mut self, at: usize, delta: u16) -> Result<()> {
        let slot = self
            .buf
            .get(at..at + 2)
            .ok_or(Error::new(ErrorKind::Corrupted, "patch offset out of range"))?;
        let current = LittleEndian::read_u16(slot);
        let next = current
            .checked_add(delta)
            .ok_or(Error::new(ErrorKind::TooLong, "value length exceeds 65535 bytes"))?;
        self.patch_u16(at, next)
    }

    /// 补零到 4 字节边界
    pub fn pad_to_alignment(&mut self) {
        let pad = padding(self.buf.len());
        self.buf.resize(self.buf.len() + pad, 0);
    }

    /// 已写入的内容
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// 取出缓冲区
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(padding(0), 0);
        assert_eq!(padding(1), 3);
        assert_eq!(padding(4), 0);
        assert_eq!(padding(7), 1);
        assert_eq!(align_up(13), 16);
    }

    #[test]
    fn test_reader_bounds() {
        let data = [0x34, 0x12, 0x01];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.remaining(), 1);

        let err = reader.read_u16().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        // 失败的读取不移动位置
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
    }

    #[test]
    fn test_read_name_rejects_invalid_utf8() {
        let data = [b'A', b'B', 0xE9, b'T'];
        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.read_name(2).unwrap(), "AB");

        let err = reader.read_name(2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_seek_past_end() {
        let data = [0u8; 4];
        let mut reader = ByteReader::new(&data);
        assert!(reader.seek(4).is_ok());
        assert_eq!(reader.seek(5).unwrap_err().kind(), ErrorKind::Corrupted);
    }

    #[test]
    fn test_writer_backpatch() {
        let mut writer = ByteWriter::with_capacity(16).unwrap();
        writer.put_u8(0xAA);
        let at = writer.reserve_u16();
        writer.put_bytes(b"xyz");
        writer.patch_u16(at, 3).unwrap();
        writer.add_u16(at, 2).unwrap();
        writer.pad_to_alignment();

        assert_eq!(writer.as_slice(), &[0xAA, 5, 0, b'x', b'y', b'z', 0, 0]);
    }

    #[test]
    fn test_add_overflow() {
        let mut writer = ByteWriter::default();
        let at = writer.reserve_u16();
        writer.patch_u16(at, u16::MAX).unwrap();
        assert_eq!(writer.add_u16(at, 1).unwrap_err().kind(), ErrorKind::TooLong);
    }
}
