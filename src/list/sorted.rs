//! 按键排序的集合
//!
//! 有序 `Vec` 加二分查找，键的比较方式由 [`KeyOrder`] 决定。

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::marker::PhantomData;

/// 可从元素中取出字符串键
pub trait Keyed {
    /// 排序与查找用的键
    fn key(&self) -> &str;
}

/// 键的比较规则
pub trait KeyOrder {
    /// 比较两个键
    fn compare(a: &str, b: &str) -> Ordering;
}

/// 不区分大小写的字典序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl KeyOrder for CaseInsensitive {
    fn compare(a: &str, b: &str) -> Ordering {
        a.chars()
            .flat_map(char::to_uppercase)
            .cmp(b.chars().flat_map(char::to_uppercase))
    }
}

/// 键唯一、按键排序的集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedKeySet<T, O = CaseInsensitive> {
    items: Vec<T>,
    _order: PhantomData<O>,
}

impl<T, O> Default for SortedKeySet<T, O> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            _order: PhantomData,
        }
    }
}

impl<T: Keyed, O: KeyOrder> SortedKeySet<T, O> {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 元素个数
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, key: &str) -> Result<usize, usize> {
        self.items.binary_search_by(|item| O::compare(item.key(), key))
    }

    /// 是否包含该键
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_ok()
    }

    /// 按键查找
    pub fn get(&self, key: &str) -> Option<&T> {
        self.position(key).ok().map(|index| &self.items[index])
    }

    /// 插入元素；同键元素已存在时替换并返回旧值
    pub fn add_or_replace(&mut self, item: T) -> Option<T> {
        match self.position(item.key()) {
            Ok(index) => Some(core::mem::replace(&mut self.items[index], item)),
            Err(index) => {
                self.items.insert(index, item);
                None
            }
        }
    }

    /// 按键移除，返回被移除的元素
    pub fn remove(&mut self, key: &str) -> Option<T> {
        self.position(key).ok().map(|index| self.items.remove(index))
    }

    /// 清空
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 按键顺序遍历
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// 按顺序排列的全部元素
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// 按键顺序可变遍历；调用者不得修改键
    pub(crate) fn values_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
}

impl<'a, T, O> IntoIterator for &'a SortedKeySet<T, O> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
