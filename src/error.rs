//! 错误类型定义
//!
//! 提供扩展属性编解码与存储操作的错误类型。

use core::fmt;

/// EA 操作错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
    code: Option<u32>,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// 对空 EaList 打包
    EmptyCollection,
    /// 需要名称的操作遇到空名称
    MissingName,
    /// 对非多值 EA 做多值操作
    NotMultiValued,
    /// 多值缓冲区中的类型标签未通过长度前缀检查（code 为类型标签）
    InvalidEncodedType,
    /// `set_values` 元素个数不一致
    ElementCountMismatch,
    /// 缓冲区分配失败
    AllocationFailure,
    /// 外部属性存储失败（code 为存储返回码，message 为操作名）
    Store,
    /// 名称或值超出其长度字段的表示范围
    TooLong,
    /// 缓冲区截断或偏移链损坏
    Corrupted,
    /// 流读写错误
    Io,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            code: None,
        }
    }

    /// 创建带数值码的错误
    pub const fn with_code(kind: ErrorKind, message: &'static str, code: u32) -> Self {
        Self {
            kind,
            message,
            code: Some(code),
        }
    }

    /// 包装外部存储的失败码
    ///
    /// `op` 为触发失败的存储操作名（如 `"query_by_names"`）
    pub const fn store(op: &'static str, code: u32) -> Self {
        Self::with_code(ErrorKind::Store, op, code)
    }

    /// 类型标签未通过长度前缀检查
    pub const fn invalid_type(tag: u16) -> Self {
        Self::with_code(
            ErrorKind::InvalidEncodedType,
            "embedded type is not length-preceded",
            tag as u32,
        )
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// 获取附带的数值码
    pub const fn code(&self) -> Option<u32> {
        self.code
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.code) {
            (ErrorKind::Store, Some(code)) => {
                write!(f, "Store: {} failed with code {}", self.message, code)
            }
            (ErrorKind::InvalidEncodedType, Some(tag)) => {
                write!(f, "{:?}: {} ({:#06X})", self.kind, self.message, tag)
            }
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                Error::new(ErrorKind::Corrupted, "stream ended inside an EA list")
            }
            std::io::ErrorKind::OutOfMemory => {
                Error::new(ErrorKind::AllocationFailure, "out of memory")
            }
            _ => match err.raw_os_error() {
                Some(code) => Error::with_code(ErrorKind::Io, "stream I/O failed", code as u32),
                None => Error::new(ErrorKind::Io, "stream I/O failed"),
            },
        }
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_err: std::collections::TryReserveError) -> Self {
        Error::new(ErrorKind::AllocationFailure, "buffer allocation failed")
    }
}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;
