//! EA 集合
//!
//! [`EaList`] 以名称为键（不区分大小写）保存一组 [`Ea`]，键唯一并按键排序。
//! 排序顺序决定批量记录中的条目顺序，也决定多值打包时的元素顺序。
//!
//! 集合还持有一份可选的批量记录缓存：
//!
//! - `read` / `read_all` / `load_from` 保存存储返回的原始记录
//! - `write` 保存刚编码的记录
//! - 任何经由本 API 的内容修改都会丢弃缓存
//!
//! 缓存供 [`EaList::write_cached`] 原样转写，无需重新编码。

mod io;
mod sorted;
mod stream;

pub use sorted::{CaseInsensitive, KeyOrder, Keyed, SortedKeySet};

use crate::{
    ea::Ea,
    error::{Error, ErrorKind, Result},
};
use alloc::vec::Vec;

impl Keyed for Ea {
    fn key(&self) -> &str {
        self.name()
    }
}

/// 按名称排序的 EA 集合
#[derive(Debug, Clone, Default)]
pub struct EaList {
    set: SortedKeySet<Ea>,
    cache: Option<Vec<u8>>,
}

impl EaList {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换同名 EA，返回被替换的旧值
    ///
    /// 名称为空返回 [`ErrorKind::MissingName`]，集合不变。
    pub fn insert(&mut self, ea: Ea) -> Result<Option<Ea>> {
        if ea.name().is_empty() {
            return Err(Error::new(ErrorKind::MissingName, "EA has no name"));
        }
        self.cache = None;
        Ok(self.set.add_or_replace(ea))
    }

    /// 按名称查找（不区分大小写）
    pub fn get(&self, name: &str) -> Option<&Ea> {
        self.set.get(name)
    }

    /// 是否包含该名称
    pub fn contains(&self, name: &str) -> bool {
        self.set.contains(name)
    }

    /// 移除同名 EA（只影响集合，不访问存储）
    pub fn remove_key(&mut self, name: &str) -> Option<Ea> {
        let removed = self.set.remove(name);
        if removed.is_some() {
            self.cache = None;
        }
        removed
    }

    /// 清空集合并丢弃缓存
    pub fn clear(&mut self) {
        self.set.clear();
        self.cache = None;
    }

    /// 成员个数
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// 按名称顺序遍历
    pub fn iter(&self) -> core::slice::Iter<'_, Ea> {
        self.set.iter()
    }

    /// 最近一次读取、写入或加载得到的批量记录
    pub fn cached_record(&self) -> Option<&[u8]> {
        self.cache.as_deref()
    }

    /// 用另一个集合的内容和缓存替换自身
    pub fn assign_from(&mut self, other: &EaList) {
        self.set = other.set.clone();
        self.cache = other.cache.clone();
    }

    pub(crate) fn values_mut(&mut self) -> core::slice::IterMut<'_, Ea> {
        self.cache = None;
        self.set.values_mut()
    }

    /// 按解码顺序应用批量记录中的条目
    ///
    /// 非空值插入或替换，空值（墓碑）移除同名成员。
    /// 先整体校验，任何条目无名称时集合不变。
    pub(crate) fn apply_fea_list(&mut self, eas: Vec<Ea>) -> Result<()> {
        if eas.iter().any(|ea| ea.name().is_empty()) {
            return Err(Error::new(ErrorKind::Corrupted, "EA list entry has no name"));
        }
        for ea in eas {
            if ea.value().is_empty() {
                self.set.remove(ea.name());
            } else {
                self.set.add_or_replace(ea);
            }
        }
        Ok(())
    }
}

/// 只比较成员，不比较缓存
impl PartialEq for EaList {
    fn eq(&self, other: &Self) -> bool {
        self.set == other.set
    }
}

impl Eq for EaList {}

impl<'a> IntoIterator for &'a EaList {
    type Item = &'a Ea;
    type IntoIter = core::slice::Iter<'a, Ea>;

    fn into_iter(self) -> Self::IntoIter {
        self.set.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EaType;

    fn sample() -> EaList {
        let mut list = EaList::new();
        list.insert(Ea::ascii("zeta", "z")).unwrap();
        list.insert(Ea::ascii("Alpha", "a")).unwrap();
        list.insert(Ea::new("mid", vec![1, 2], EaType::Binary, 0x80)).unwrap();
        list
    }

    #[test]
    fn test_sorted_by_name() {
        let list = sample();
        let names: Vec<_> = list.iter().map(Ea::name).collect();
        assert_eq!(names, ["ALPHA", "MID", "ZETA"]);
        assert_eq!(list.get("mid").unwrap().ea_type(), EaType::Binary);
    }

    #[test]
    fn test_insert_replaces() {
        let mut list = sample();
        let old = list.insert(Ea::ascii("ALPHA", "new")).unwrap().unwrap();
        assert_eq!(old.value(), b"a");
        assert_eq!(list.len(), 3);
        assert_eq!(list.get("alpha").unwrap().value(), b"new");
    }

    #[test]
    fn test_insert_rejects_empty_name() {
        let mut list = sample();
        let err = list.insert(Ea::named("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingName);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_apply_tombstones() {
        let mut list = sample();
        list.apply_fea_list(vec![
            Ea::named("ZETA"),
            Ea::ascii("NEW", "n"),
            Ea::named("NEVER_THERE"),
        ])
        .unwrap();

        let names: Vec<_> = list.iter().map(Ea::name).collect();
        assert_eq!(names, ["ALPHA", "MID", "NEW"]);
    }

    #[test]
    fn test_apply_rejects_nameless_entry() {
        let mut list = sample();
        let err = list
            .apply_fea_list(vec![Ea::named("ALPHA"), Ea::named("")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Corrupted);
        assert!(list.contains("ALPHA"));
    }

    #[test]
    fn test_assign_and_clone_copy_cache() {
        let mut source = sample();
        source.cache = Some(vec![4, 0, 0, 0]);

        let copy = source.clone();
        assert_eq!(copy.cached_record(), Some(&[4u8, 0, 0, 0][..]));

        let mut target = EaList::new();
        target.insert(Ea::ascii("OTHER", "o")).unwrap();
        target.assign_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.cached_record(), source.cached_record());
    }

    #[test]
    fn test_mutation_drops_cache() {
        let mut list = sample();
        list.cache = Some(vec![4, 0, 0, 0]);
        list.remove_key("nothing");
        assert!(list.cached_record().is_some());

        list.remove_key("alpha");
        assert!(list.cached_record().is_none());

        list.cache = Some(vec![4, 0, 0, 0]);
        list.clear();
        assert!(list.is_empty());
        assert!(list.cached_record().is_none());
    }
}
