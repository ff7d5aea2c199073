//! 单个 EA 与属性存储之间的读写

use super::Ea;
use crate::{
    codec::{decode_fea_list, encode_fea_list, encode_gea_list},
    error::{Error, ErrorKind, Result},
    store::{query_capacity, AttributeStore, FileRef},
};

impl Ea {
    /// 从文件读取同名 EA
    ///
    /// 文件上不存在该 EA 时，值为空、类型为 ASCII。
    /// 名称为空返回 [`ErrorKind::MissingName`]，不访问存储。
    pub fn read<S>(&mut self, store: &S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        if self.name.is_empty() {
            return Err(Error::new(ErrorKind::MissingName, "EA has no name"));
        }

        let query = encode_gea_list([self.name()])?;
        let size = store.query_size(file)?;
        let reply = store.query_by_names(file, &query, query_capacity(size, &query))?;

        let mut eas = decode_fea_list(&reply)?;
        if eas.is_empty() {
            return Err(Error::new(ErrorKind::Corrupted, "store returned an empty EA list"));
        }
        *self = eas.swap_remove(0);

        log::debug!(
            "[EA] read {} from {}: type={} len={}",
            self.name,
            file,
            self.ea_type,
            self.value.len()
        );
        Ok(())
    }

    /// 把 EA 写入文件
    ///
    /// 值为空时存储会删除该 EA。
    pub fn write<S>(&self, store: &mut S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        let record = encode_fea_list([self])?;
        store.set_by_record(file, &record)?;

        log::debug!("[EA] wrote {} to {} ({} bytes)", self.name, file, record.len());
        Ok(())
    }

    /// 从文件删除同名 EA
    ///
    /// 实现为写入一个空值的副本，自身不变。
    pub fn remove<S>(&self, store: &mut S, file: FileRef<'_>) -> Result<()>
    where
        S: AttributeStore + ?Sized,
    {
        let mut tombstone = self.clone();
        tombstone.value.clear();
        tombstone.write(store, file)
    }
}
