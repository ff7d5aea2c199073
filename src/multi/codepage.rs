//! 进程代码页查询
//!
//! 多值 EA 头部记录打包时的代码页。查询顺序：
//!
//! 1. `EA_CODEPAGE` 环境变量（十进制代码页号）
//! 2. `LC_ALL` / `LC_CTYPE` / `LANG` 中第一个非空值的字符集部分
//! 3. [`DEFAULT_CODE_PAGE`]

use crate::{
    consts::*,
    error::{Error, Result},
};
use alloc::string::String;

/// 从进程环境查询代码页
pub fn query_code_page() -> Result<u16> {
    query_code_page_from(|key| std::env::var(key).ok())
}

/// 从给定的变量来源查询代码页
///
/// `EA_CODEPAGE` 无法解析时返回存储错误 `ERROR_CP_NOT_MOVED`。
pub fn query_code_page_from<F>(lookup: F) -> Result<u16>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(CODE_PAGE_ENV) {
        return raw.trim().parse::<u16>().map_err(|_| {
            log::warn!("[MULTI] {}={:?} is not a code page", CODE_PAGE_ENV, raw);
            Error::store("query_code_page", ERROR_CP_NOT_MOVED)
        });
    }

    let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
        .iter()
        .filter_map(|key| lookup(key))
        .find(|value| !value.is_empty());

    let code_page = locale
        .as_deref()
        .and_then(charset_of)
        .and_then(code_page_of_charset)
        .unwrap_or(DEFAULT_CODE_PAGE);
    log::trace!("[MULTI] locale {:?} -> code page {}", locale, code_page);
    Ok(code_page)
}

/// `ll_CC.charset@modifier` 中的字符集部分
fn charset_of(locale: &str) -> Option<&str> {
    let (_, rest) = locale.split_once('.')?;
    Some(rest.split('@').next().unwrap_or(rest))
}

fn code_page_of_charset(charset: &str) -> Option<u16> {
    let normalized: String = charset
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let code_page = match normalized.as_str() {
        "utf8" => 1208,
        "iso88591" | "latin1" => 819,
        "iso885915" | "latin9" => 923,
        "cp1252" | "windows1252" => 1252,
        "cp850" | "ibm850" => 850,
        "cp437" | "ibm437" => 437,
        "koi8r" => 878,
        _ => return None,
    };
    Some(code_page)
}
