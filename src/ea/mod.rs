//! 单个扩展属性
//!
//! [`Ea`] 是一个带类型的命名值：名称（统一转为大写）、不透明的值字节、
//! 类型标签和标志字节。值为空在写入时表示删除。
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use ea_core::{Ea, EaType, store::{FileRef, MemoryStore}};
//!
//! let mut ea = Ea::ascii(".comments", "reviewed");
//! ea.write(&mut store, FileRef::Path(path))?;
//!
//! let mut back = Ea::named(".COMMENTS");
//! back.read(&store, FileRef::Path(path))?;
//! assert_eq!(back.value(), b"reviewed");
//! ```

mod io;

use crate::{
    error::{Error, ErrorKind, Result},
    types::{EaFlags, EaType},
    utils::ByteReader,
};
use alloc::string::String;
use alloc::vec::Vec;

/// 扩展属性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ea {
    name: String,
    value: Vec<u8>,
    ea_type: EaType,
    flag: u8,
}

/// 名称规范化（转大写）
pub(crate) fn normalize_name(name: &str) -> String {
    name.to_uppercase()
}

impl Ea {
    /// 由显式字段构造
    ///
    /// 不检查值与类型是否匹配，由调用者保证。
    pub fn new(name: &str, value: impl Into<Vec<u8>>, ea_type: EaType, flag: u8) -> Self {
        Self {
            name: normalize_name(name),
            value: value.into(),
            ea_type,
            flag,
        }
    }

    /// 构造 ASCII 类型的 EA
    pub fn ascii(name: &str, value: &str) -> Self {
        Self::new(name, value.as_bytes(), EaType::Ascii, 0)
    }

    /// 只有名称的空 EA，用作 [`Ea::read`] 的目标
    pub fn named(name: &str) -> Self {
        Self::ascii(name, "")
    }

    /// 名称（大写）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设置名称（转为大写）
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = normalize_name(name);
        self
    }

    /// 值字节
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// 设置值
    pub fn set_value(&mut self, value: impl Into<Vec<u8>>) -> &mut Self {
        self.value = value.into();
        self
    }

    /// 值类型
    pub fn ea_type(&self) -> EaType {
        self.ea_type
    }

    /// 设置值类型
    pub fn set_type(&mut self, ea_type: EaType) -> &mut Self {
        self.ea_type = ea_type;
        self
    }

    /// 标志字节
    pub fn flag(&self) -> u8 {
        self.flag
    }

    /// 设置标志字节
    pub fn set_flag(&mut self, flag: u8) -> &mut Self {
        self.flag = flag;
        self
    }

    /// 标志字节的位视图
    pub fn flags(&self) -> EaFlags {
        EaFlags::from_bits_retain(self.flag)
    }

    /// 类型的可读名称，未识别的类型显示为 `Unknown(XXXX)`
    pub fn type_name(&self) -> String {
        alloc::format!("{}", self.ea_type)
    }

    /// 是否为关键 EA
    pub fn is_critical(&self) -> bool {
        self.flags().contains(EaFlags::NEED_EA)
    }

    /// 值是否带显式长度前缀
    pub fn is_length_prefixed(&self) -> bool {
        self.ea_type.is_length_prefixed()
    }

    /// 是否为多值 EA
    pub fn is_multi_valued(&self) -> bool {
        self.ea_type.is_multi_valued()
    }

    /// 多值 EA 中的元素个数
    ///
    /// 非多值 EA 返回 [`ErrorKind::NotMultiValued`]
    pub fn num_values(&self) -> Result<u16> {
        let mut r = self.multi_header()?;
        r.read_u16()?;
        r.read_u16()
    }

    /// 打包多值 EA 时记录的代码页
    ///
    /// 非多值 EA 返回 [`ErrorKind::NotMultiValued`]
    pub fn code_page(&self) -> Result<u16> {
        self.multi_header()?.read_u16()
    }

    fn multi_header(&self) -> Result<ByteReader<'_>> {
        if !self.is_multi_valued() {
            return Err(Error::new(ErrorKind::NotMultiValued, "EA is not multi-valued"));
        }
        Ok(ByteReader::new(&self.value))
    }
}

impl Default for Ea {
    fn default() -> Self {
        Self::named("")
    }
}
