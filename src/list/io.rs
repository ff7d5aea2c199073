//! EA 集合与属性存储之间的读写

use super::EaList;
use crate::{
    codec::{
        dena::{fea_list_capacity, gea_list_from_dena},
        decode_dena, decode_fea_list, encode_fea_list, encode_gea_list,
    },
    error::Result,
    store::{enumerate_capacity, query_capacity, AttributeStore, FileRef},
};

impl EaList {
    /// 按集合中现有成员的名称从文件读取
    ///
    /// 文件上不存在的成员从集合中移除。集合为空时不访问存储。
    /// 存储的原始回复成为新的缓存。
    pub fn read<S>(&mut self, store: &S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        if self.is_empty() {
            return Ok(());
        }

        let query = encode_gea_list(self.iter().map(|ea| ea.name()))?;
        let size = store.query_size(file)?;
        let reply = store.query_by_names(file, &query, query_capacity(size, &query))?;
        let eas = decode_fea_list(&reply)?;

        self.apply_fea_list(eas)?;
        log::debug!("[EALIST] read {} EAs from {}", self.len(), file);
        self.cache = Some(reply);
        Ok(())
    }

    /// 读取文件的全部 EA，替换集合内容
    ///
    /// 文件没有 EA 时集合被清空。
    pub fn read_all<S>(&mut self, store: &S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        let size = store.query_size(file)?;
        let dena = store.enumerate_all(file, enumerate_capacity(size))?;
        let entries = decode_dena(&dena)?;
        if entries.is_empty() {
            log::debug!("[EALIST] {} has no EAs", file);
            self.clear();
            return Ok(());
        }

        let query = gea_list_from_dena(&entries)?;
        let reply = store.query_by_names(file, &query, fea_list_capacity(&entries))?;
        let eas = decode_fea_list(&reply)?;

        let mut fresh = EaList::new();
        fresh.apply_fea_list(eas)?;
        self.set = fresh.set;
        self.cache = Some(reply);
        log::debug!("[EALIST] read all {} EAs from {}", self.len(), file);
        Ok(())
    }

    /// 把集合重新编码后写入文件；集合为空时不访问存储
    ///
    /// 编码结果成为新的缓存。
    pub fn write<S>(&mut self, store: &mut S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        if self.is_empty() {
            return Ok(());
        }

        let record = encode_fea_list(self.iter())?;
        store.set_by_record(file, &record)?;
        log::debug!("[EALIST] wrote {} EAs to {}", self.len(), file);
        self.cache = Some(record);
        Ok(())
    }

    /// 原样写入缓存的批量记录
    ///
    /// 没有缓存时等同于 [`EaList::write`]。
    pub fn write_cached<S>(&mut self, store: &mut S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        match &self.cache {
            Some(record) => {
                store.set_by_record(file, record)?;
                log::debug!("[EALIST] wrote cached record to {} ({} bytes)", file, record.len());
                Ok(())
            }
            None => self.write(store, file),
        }
    }

    /// 从文件删除集合中的全部成员，集合自身不变
    pub fn remove<S>(&self, store: &mut S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        let mut tombstones = self.clone();
        tombstones.write_tombstones(store, file)
    }

    /// 删除文件上的全部 EA，集合自身不变
    ///
    /// 先完整读取文件的 EA，再把它们全部以空值写回。
    pub fn remove_all<S>(&self, store: &mut S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        let mut tombstones = EaList::new();
        tombstones.read_all(&*store, file)?;
        tombstones.write_tombstones(store, file)
    }

    fn write_tombstones<S>(&mut self, store: &mut S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        for ea in self.values_mut() {
            ea.set_value(Vec::new());
        }
        self.write(store, file)
    }
}
