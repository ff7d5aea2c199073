//! 通用工具

/// 字节游标
pub mod cursor;

pub use cursor::{align_up, padding, ByteReader, ByteWriter};
