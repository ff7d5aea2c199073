//! 常量定义
//!
//! EA 类型标签、标志位和各种记录格式的固定尺寸。

//=============================================================================
// EA 类型标签
//=============================================================================

/// 二进制数据（长度前缀）
pub const EAT_BINARY: u16 = 0xFFFE;
/// ASCII 文本（长度前缀）
pub const EAT_ASCII: u16 = 0xFFFD;
/// 位图（长度前缀）
pub const EAT_BITMAP: u16 = 0xFFFB;
/// 图元文件（长度前缀）
pub const EAT_METAFILE: u16 = 0xFFFA;
/// 图标（长度前缀）
pub const EAT_ICON: u16 = 0xFFF9;
/// 对另一个 EA 的引用（长度前缀）
pub const EAT_EA: u16 = 0xFFEE;
/// 多值、多类型
pub const EAT_MVMT: u16 = 0xFFDF;
/// 多值、单类型
pub const EAT_MVST: u16 = 0xFFDE;
/// ASN.1 编码
pub const EAT_ASN1: u16 = 0xFFDD;

//=============================================================================
// EA 标志
//=============================================================================

/// 关键 EA（文件系统不支持 EA 时不得丢弃）
pub const FEA_NEEDEA: u8 = 0x80;

//=============================================================================
// 记录格式尺寸
//=============================================================================

/// 链表容器对齐（4字节对齐）
pub const EA_PAD: usize = 4;
/// 对齐掩码
pub const EA_ROUND: usize = EA_PAD - 1;

/// 容器头部 `totalLen` 字段大小
pub const LIST_HEADER_SIZE: usize = 4;

/// 条目 `nextOffset` 字段大小
pub const NEXT_OFFSET_SIZE: usize = 4;

/// 单条记录固定部分：flag + nameLen + valueLen
pub const FEA_FIXED_SIZE: usize = 4;

/// 查询列表条目固定部分：nextOffset + nameLen
pub const GEA_FIXED_SIZE: usize = NEXT_OFFSET_SIZE + 1;

/// 枚举结果条目固定部分：nextOffset + nameLen + valueLen
pub const DENA_FIXED_SIZE: usize = NEXT_OFFSET_SIZE + 1 + 4;

/// 名称最大长度（nameLen 为单字节）
pub const EA_NAME_MAX: usize = u8::MAX as usize;

/// 值体最大长度（valueLen 为双字节）
pub const EA_VALUE_MAX: usize = u16::MAX as usize;

/// 多值 EA 头部：codePage + count
pub const MV_HEADER_SIZE: usize = 4;

/// 类型标签 / 显式长度字段大小
pub const WORD_SIZE: usize = 2;

//=============================================================================
// 代码页
//=============================================================================

/// 未能从环境判断字符集时使用的代码页
pub const DEFAULT_CODE_PAGE: u16 = 437;

/// 覆盖代码页的环境变量
pub const CODE_PAGE_ENV: &str = "EA_CODEPAGE";

//=============================================================================
// 存储返回码
//=============================================================================

/// 文件不存在
pub const ERROR_FILE_NOT_FOUND: u32 = 2;

/// 存储不支持该类文件引用
pub const ERROR_INVALID_HANDLE: u32 = 6;

/// 结果超出调用方提供的缓冲区
pub const ERROR_BUFFER_OVERFLOW: u32 = 111;

/// 代码页查询结果与进程环境不一致
pub const ERROR_CP_NOT_MOVED: u32 = 472;
