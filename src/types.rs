//! 数据结构定义
//!
//! EA 类型标签和标志字节的强类型表示。

use crate::consts::*;
use bitflags::bitflags;
use core::fmt;

/// EA 值的类型标签
///
/// 线格式中是一个小端 `u16`；未识别的标签原样保存在 [`EaType::Unknown`] 中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EaType {
    /// 二进制数据
    Binary,
    /// ASCII 文本
    Ascii,
    /// 位图
    Bitmap,
    /// 图元文件
    Metafile,
    /// 图标
    Icon,
    /// EA 引用
    EaRef,
    /// 多值、多类型
    MultiValueMultiType,
    /// 多值、单类型
    MultiValueSingleType,
    /// ASN.1
    Asn1,
    /// 未识别的标签
    Unknown(u16),
}

impl EaType {
    /// 线格式标签
    pub const fn tag(self) -> u16 {
        match self {
            EaType::Binary => EAT_BINARY,
            EaType::Ascii => EAT_ASCII,
            EaType::Bitmap => EAT_BITMAP,
            EaType::Metafile => EAT_METAFILE,
            EaType::Icon => EAT_ICON,
            EaType::EaRef => EAT_EA,
            EaType::MultiValueMultiType => EAT_MVMT,
            EaType::MultiValueSingleType => EAT_MVST,
            EaType::Asn1 => EAT_ASN1,
            EaType::Unknown(tag) => tag,
        }
    }

    /// 从线格式标签构造
    pub const fn from_tag(tag: u16) -> Self {
        match tag {
            EAT_BINARY => EaType::Binary,
            EAT_ASCII => EaType::Ascii,
            EAT_BITMAP => EaType::Bitmap,
            EAT_METAFILE => EaType::Metafile,
            EAT_ICON => EaType::Icon,
            EAT_EA => EaType::EaRef,
            EAT_MVMT => EaType::MultiValueMultiType,
            EAT_MVST => EaType::MultiValueSingleType,
            EAT_ASN1 => EaType::Asn1,
            other => EaType::Unknown(other),
        }
    }

    /// 值是否带显式长度前缀
    ///
    /// 只由类型决定，与内容无关。
    pub const fn is_length_prefixed(self) -> bool {
        matches!(
            self,
            EaType::Binary
                | EaType::Ascii
                | EaType::Bitmap
                | EaType::Metafile
                | EaType::Icon
                | EaType::EaRef
        )
    }

    /// 是否为多值类型
    pub const fn is_multi_valued(self) -> bool {
        matches!(
            self,
            EaType::MultiValueMultiType | EaType::MultiValueSingleType
        )
    }
}

impl From<u16> for EaType {
    fn from(tag: u16) -> Self {
        EaType::from_tag(tag)
    }
}

impl From<EaType> for u16 {
    fn from(ty: EaType) -> Self {
        ty.tag()
    }
}

impl fmt::Display for EaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EaType::Binary => f.write_str("Binary"),
            EaType::Ascii => f.write_str("ASCII"),
            EaType::Bitmap => f.write_str("Bitmap"),
            EaType::Metafile => f.write_str("Metafile"),
            EaType::Icon => f.write_str("Icon"),
            EaType::EaRef => f.write_str("EA"),
            EaType::MultiValueMultiType => f.write_str("MVMT"),
            EaType::MultiValueSingleType => f.write_str("MVST"),
            EaType::Asn1 => f.write_str("ASN.1"),
            EaType::Unknown(tag) => write!(f, "Unknown({:04X})", tag),
        }
    }
}

bitflags! {
    /// EA 标志字节
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EaFlags: u8 {
        /// 关键 EA
        const NEED_EA = FEA_NEEDEA;
    }
}
