//! EA 的格式化输出（eatool 与 eadrive 共用）

use ea_core::{Ea, EaList, EaType};
use std::fmt::Write as _;
use std::io::{self, Write};

/// 每层嵌套的缩进
pub const INDENT_DELTA: usize = 3;

/// 值的十六进制表示（大写）
pub fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(s, "{:02X}", byte);
    }
    s
}

/// 输出一个 EA；值为空时不输出
///
/// 多值 EA 以自身名称为基名展开，缩进增加 [`INDENT_DELTA`]。
/// 无法展开时按十六进制输出原始值。
pub fn dump_ea<W: Write>(out: &mut W, ea: &Ea, indent: usize) -> io::Result<()> {
    if ea.value().is_empty() {
        return Ok(());
    }
    let width = 7 + indent;

    writeln!(out, "{:>width$}{}", "name:  ", ea.name(), width = width)?;
    write!(out, "{:>width$}{}", "type:  ", ea.type_name(), width = width)?;
    if ea.is_critical() {
        write!(out, " (EA is critical)")?;
    }
    writeln!(out)?;

    if ea.is_multi_valued() {
        match EaList::from_multi(ea.name(), ea) {
            Ok(list) => {
                writeln!(out, "{:>width$}", "value: ", width = width)?;
                return dump_list(out, &list, indent + INDENT_DELTA);
            }
            Err(err) => log::warn!("cannot expand {}: {}", ea.name(), err),
        }
    }

    let value = match ea.ea_type() {
        EaType::Ascii => String::from_utf8_lossy(ea.value()).into_owned(),
        _ => hex(ea.value()),
    };
    writeln!(out, "{:>width$}{}", "value: ", value, width = width)
}

/// 输出集合中的每个 EA，之后各跟一个空行
pub fn dump_list<W: Write>(out: &mut W, list: &EaList, indent: usize) -> io::Result<()> {
    for ea in list {
        dump_ea(out, ea, indent)?;
        writeln!(out)?;
    }
    Ok(())
}
