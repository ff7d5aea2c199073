//! ea_core: 文件扩展属性（EA）的数据模型与二进制编解码
//!
//! 这个库把命名、带类型的文件元数据（扩展属性）在内存对象和属性存储使用的
//! 几种二进制记录之间相互转换：
//!
//! - 单条记录：一个 EA 的标志、名称和带类型标签的值
//! - 批量记录：4 字节对齐、以 `nextOffset` 链接的单条记录序列
//! - 查询列表：只带名称的链表，用于按名称查询
//! - 枚举结果：名称和值长度，用于读取文件的全部 EA
//! - 多值 EA：把整个 EA 集合打包进一个 EA 的值
//!
//! 真正的文件读写由实现了 [`AttributeStore`] 的存储完成。
//!
//! # 示例
//!
//! ```rust,ignore
//! use ea_core::{Ea, EaList, EaType, FileRef, MemoryStore, Result};
//!
//! fn main() -> Result<()> {
//!     let mut store = MemoryStore::new();
//!     store.create_file("/doc.txt");
//!     let file = FileRef::Path("/doc.txt".as_ref());
//!
//!     let mut list = EaList::new();
//!     list.insert(Ea::ascii(".SUBJECT", "minutes"))?;
//!     list.insert(Ea::new(".ICON", vec![0u8; 32], EaType::Icon, 0x80))?;
//!     list.write(&mut store, file)?;
//!
//!     // 整个集合打包为一个多值 EA
//!     let snapshot = Ea::from_list("SNAPSHOT", &list, 0)?;
//!     let restored = EaList::from_multi("SNAPSHOT", &snapshot)?;
//!     assert_eq!(restored.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`consts`] - 类型标签与记录尺寸
//! - [`types`] - EA 类型与标志
//! - [`ea`] - 单个 EA
//! - [`codec`] - 二进制记录编解码
//! - [`list`] - 按名称排序的 EA 集合
//! - [`multi`] - 多值 EA 打包与解包
//! - [`store`] - 属性存储抽象及实现

#![warn(missing_docs)]
#![forbid(unsafe_code)]

extern crate alloc;

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 常量定义
pub mod consts;

/// EA 类型与标志
pub mod types;

/// 字节游标
pub mod utils;

/// 单个 EA
pub mod ea;

/// 二进制记录编解码
pub mod codec;

/// EA 集合
pub mod list;

/// 多值 EA
pub mod multi;

/// 属性存储
pub mod store;

// ===== 公共导出 =====

// 错误处理
pub use error::{Error, ErrorKind, Result};

// 数据模型
pub use ea::Ea;
pub use list::EaList;
pub use types::{EaFlags, EaType};

// 代码页
pub use multi::query_code_page;

// 存储
pub use store::{AttributeStore, FileRef, MemoryStore, StoreConfig};
#[cfg(all(unix, feature = "xattr"))]
pub use store::XattrStore;
