//! EA 集合的流持久化
//!
//! 流中保存的就是批量记录本身：`[totalLen:4][rest]`。

use super::EaList;
use crate::{
    codec::{decode_fea_list, encode_fea_list},
    consts::LIST_HEADER_SIZE,
    error::{Error, ErrorKind, Result},
};
use alloc::vec::Vec;
use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Write};

impl EaList {
    /// 把集合写入流
    ///
    /// 有缓存时原样写出缓存，否则先编码并缓存。空集合写出一个空的批量记录。
    pub fn save_to<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if self.cache.is_none() {
            self.cache = Some(encode_fea_list(self.iter())?);
        }
        if let Some(record) = &self.cache {
            out.write_all(record)?;
            log::debug!("[EALIST] saved {} bytes", record.len());
        }
        Ok(())
    }

    /// 从流读取批量记录，替换集合内容和缓存
    ///
    /// 流中的记录有误时集合不变。
    pub fn load_from<R: Read>(&mut self, input: &mut R) -> Result<()> {
        let mut header = [0u8; LIST_HEADER_SIZE];
        input.read_exact(&mut header)?;
        let total = LittleEndian::read_u32(&header) as usize;
        if total < LIST_HEADER_SIZE {
            return Err(Error::new(ErrorKind::Corrupted, "EA list length too small"));
        }

        // 头部长度不可信，按实际读到的字节增长缓冲区
        let mut record = Vec::new();
        record.extend_from_slice(&header);
        let body_len = (total - LIST_HEADER_SIZE) as u64;
        input.take(body_len).read_to_end(&mut record)?;
        if record.len() != total {
            return Err(Error::new(ErrorKind::Corrupted, "stream ended inside an EA list"));
        }

        let eas = decode_fea_list(&record)?;
        let mut fresh = EaList::new();
        fresh.apply_fea_list(eas)?;

        self.set = fresh.set;
        self.cache = Some(record);
        log::debug!("[EALIST] loaded {} EAs ({} bytes)", self.len(), total);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ea::Ea, types::EaType};
    use std::io::Cursor;

    fn sample() -> EaList {
        let mut list = EaList::new();
        list.insert(Ea::ascii("B", "second")).unwrap();
        list.insert(Ea::new("A", vec![0, 1, 2], EaType::Binary, 0x80)).unwrap();
        list
    }

    #[test]
    fn test_save_load() {
        let mut list = sample();
        let mut buf = Vec::new();
        list.save_to(&mut buf).unwrap();
        assert_eq!(LittleEndian::read_u32(&buf) as usize, buf.len());
        assert_eq!(list.cached_record(), Some(buf.as_slice()));

        let mut back = EaList::new();
        back.insert(Ea::ascii("OLD", "x")).unwrap();
        back.load_from(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(back, sample());
        assert_eq!(back.cached_record(), Some(buf.as_slice()));
    }

    #[test]
    fn test_save_empty() {
        let mut buf = Vec::new();
        EaList::new().save_to(&mut buf).unwrap();
        assert_eq!(buf, [4, 0, 0, 0]);

        let mut back = sample();
        back.load_from(&mut Cursor::new(&buf)).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_load_short_stream() {
        let mut buf = Vec::new();
        sample().save_to(&mut buf).unwrap();
        buf.truncate(buf.len() - 3);

        let mut list = sample();
        let err = list.load_from(&mut Cursor::new(&buf)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert_eq!(list, sample());
    }

    #[test]
    fn test_load_huge_length_short_body() {
        let mut list = sample();
        let err = list
            .load_from(&mut Cursor::new([0xFF, 0xFF, 0xFF, 0xFF, 1, 2, 3]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert_eq!(list, sample());
    }

    /// 一条 ASCII 记录，名称按原始字节写入
    fn raw_entry(name: &[u8], value: &[u8], last: bool) -> Vec<u8> {
        let mut body = vec![0u8, name.len() as u8];
        body.extend_from_slice(&((4 + value.len()) as u16).to_le_bytes());
        body.extend_from_slice(name);
        body.extend_from_slice(&[0xFD, 0xFF]);
        body.extend_from_slice(&(value.len() as u16).to_le_bytes());
        body.extend_from_slice(value);

        let size = (4 + body.len() + 3) & !3;
        let next = if last { 0 } else { size as u32 };
        let mut entry = next.to_le_bytes().to_vec();
        entry.extend_from_slice(&body);
        entry.resize(size, 0);
        entry
    }

    #[test]
    fn test_load_rejects_non_utf8_names() {
        let mut record = vec![0u8; 4];
        record.extend(raw_entry(b"\xE9TE", b"summer", false));
        record.extend(raw_entry(b"\xE8TE", b"winter", true));
        let total = record.len() as u32;
        record[..4].copy_from_slice(&total.to_le_bytes());

        let mut list = sample();
        let err = list.load_from(&mut Cursor::new(&record)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert_eq!(list, sample());
        assert!(list.cached_record().is_none());
    }

    #[test]
    fn test_load_bad_length() {
        let mut list = EaList::new();
        let err = list.load_from(&mut Cursor::new([2u8, 0, 0, 0])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
    }
}
