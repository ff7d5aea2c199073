//! 多值 EA 打包与解包
//!
//! 把整个 [`EaList`] 打包进单个 EA 的值，或从这样的值还原集合。
//!
//! ```text
//! MVST: [codePage:2][count:2][type:2] { [len:2]? [value] } ...
//! MVMT: [codePage:2][count:2] { [type:2][len:2]? [value] } ...
//! ```
//!
//! 全部成员类型相同时使用 MVST，只写一次类型。元素顺序即集合的排序顺序。
//! 打包不保存成员名称，解包时名称由基名和从 1 开始、补零的序号合成，
//! 例如 12 个元素得到 `BASE.01` .. `BASE.12`。
//!
//! 解包要求每个元素的类型都带长度前缀，否则无法确定元素边界，
//! 返回 [`ErrorKind::InvalidEncodedType`]。

mod codepage;

pub use codepage::{query_code_page, query_code_page_from};

use crate::{
    consts::*,
    ea::Ea,
    error::{Error, ErrorKind, Result},
    list::EaList,
    types::EaType,
    utils::{ByteReader, ByteWriter},
};
use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

impl Ea {
    /// 把集合打包为一个多值 EA，代码页取自进程环境
    ///
    /// 集合为空返回 [`ErrorKind::EmptyCollection`]。
    pub fn from_list(name: &str, list: &EaList, flag: u8) -> Result<Ea> {
        if list.is_empty() {
            return Err(empty_collection());
        }
        Self::from_list_with_code_page(name, list, flag, query_code_page()?)
    }

    /// 以指定代码页打包
    pub fn from_list_with_code_page(
        name: &str,
        list: &EaList,
        flag: u8,
        code_page: u16,
    ) -> Result<Ea> {
        let mut members = list.iter();
        let first = members.next().ok_or_else(empty_collection)?.ea_type();
        let single_typed = members.all(|ea| ea.ea_type() == first);

        let count = u16::try_from(list.len())
            .map_err(|_| Error::new(ErrorKind::TooLong, "too many EAs for one multi-valued EA"))?;

        let mut size = MV_HEADER_SIZE;
        if single_typed {
            size += WORD_SIZE;
        }
        for ea in list {
            if !single_typed {
                size += WORD_SIZE;
            }
            if ea.is_length_prefixed() {
                if ea.value().len() > EA_VALUE_MAX {
                    return Err(Error::new(ErrorKind::TooLong, "EA value exceeds 65535 bytes"));
                }
                size += WORD_SIZE;
            }
            size += ea.value().len();
        }

        let mut w = ByteWriter::with_capacity(size)?;
        w.put_u16(code_page);
        w.put_u16(count);
        if single_typed {
            w.put_u16(first.tag());
        }
        for ea in list {
            if !single_typed {
                w.put_u16(ea.ea_type().tag());
            }
            if ea.is_length_prefixed() {
                w.put_u16(ea.value().len() as u16);
            }
            w.put_bytes(ea.value());
        }

        let ea_type = if single_typed {
            EaType::MultiValueSingleType
        } else {
            EaType::MultiValueMultiType
        };
        log::debug!(
            "[MULTI] packed {} EAs into {} as {} ({} bytes, code page {})",
            count,
            name,
            ea_type,
            size,
            code_page
        );
        Ok(Ea::new(name, w.into_inner(), ea_type, flag))
    }
}

impl EaList {
    /// 把多值 EA 解包为集合
    ///
    /// 成员名为 `base.NN`，标志均取自多值 EA。
    pub fn from_multi(base: &str, ea: &Ea) -> Result<EaList> {
        let elements = parse_elements(ea)?;
        let digits = elements.len().to_string().len();

        let mut list = EaList::new();
        for (index, (ea_type, value)) in elements.into_iter().enumerate() {
            let name = format!("{}.{:0width$}", base, index + 1, width = digits);
            list.insert(Ea::new(&name, value, ea_type, ea.flag()))?;
        }
        log::debug!("[MULTI] unpacked {} into {} EAs", ea.name(), list.len());
        Ok(list)
    }

    /// 按排序顺序用多值 EA 中的元素覆盖成员的值、类型和标志，名称不变
    ///
    /// 元素个数与成员个数不同返回 [`ErrorKind::ElementCountMismatch`]。
    /// 任何错误都不改动集合。
    pub fn set_values(&mut self, ea: &Ea) -> Result<()> {
        if usize::from(ea.num_values()?) != self.len() {
            return Err(Error::new(
                ErrorKind::ElementCountMismatch,
                "element count differs from EA list size",
            ));
        }

        let elements = parse_elements(ea)?;
        for (member, (ea_type, value)) in self.values_mut().zip(elements) {
            member.set_value(value).set_type(ea_type).set_flag(ea.flag());
        }
        Ok(())
    }
}

fn empty_collection() -> Error {
    Error::new(ErrorKind::EmptyCollection, "cannot pack an empty EA list")
}

fn checked_type(tag: u16) -> Result<EaType> {
    let ea_type = EaType::from_tag(tag);
    if !ea_type.is_length_prefixed() {
        return Err(Error::invalid_type(tag));
    }
    Ok(ea_type)
}

/// 解析多值 EA 的全部元素
fn parse_elements(ea: &Ea) -> Result<Vec<(EaType, &[u8])>> {
    if !ea.is_multi_valued() {
        return Err(Error::new(ErrorKind::NotMultiValued, "EA is not multi-valued"));
    }

    let mut r = ByteReader::new(ea.value());
    let _code_page = r.read_u16()?;
    let count = r.read_u16()? as usize;

    let shared = match ea.ea_type() {
        EaType::MultiValueSingleType => Some(checked_type(r.read_u16()?)?),
        _ => None,
    };

    let mut elements = Vec::new();
    elements.try_reserve_exact(count)?;
    for _ in 0..count {
        let ea_type = match shared {
            Some(ea_type) => ea_type,
            None => checked_type(r.read_u16()?)?,
        };
        let len = r.read_u16()? as usize;
        elements.push((ea_type, r.read_bytes(len)?));
    }

    if r.remaining() > 0 {
        log::debug!("[MULTI] {} has {} trailing bytes", ea.name(), r.remaining());
    }
    Ok(elements)
}
