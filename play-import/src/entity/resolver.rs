//! # 用户解析
//!
//! 角色名 → 用户标识。标识由名字确定性派生，存储里没有就创建。
//!
//! 查找走 [`Lookup`]：`NotFound` 时创建是显式分支。
//! 后端查找出错也按"不存在"处理（记一条警告），不会传给调用方；
//! 写入失败则属于不可恢复的 IO 错误，照常返回。

use std::collections::HashMap;

use crate::error::StoreError;
use crate::model::{NARRATOR, User, UserId};
use crate::store::{EntityStore, Lookup};

/// 用户解析器
///
/// 在一次导入内缓存已解析的名字，同名重复解析不会再次访问存储。
#[derive(Debug, Default)]
pub struct EntityResolver {
    resolved: HashMap<String, UserId>,
    warnings: Vec<String>,
}

impl EntityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析角色名
    pub fn resolve<S>(&mut self, store: &mut S, name: &str) -> Result<UserId, StoreError>
    where
        S: EntityStore + ?Sized,
    {
        if let Some(id) = self.resolved.get(name) {
            return Ok(*id);
        }

        let id = UserId::from_name(name);
        let lookup = store.find_user(&id).unwrap_or_else(|e| {
            self.warnings
                .push(format!("查找用户 '{}' 失败，按新用户处理: {}", name, e));
            Lookup::NotFound
        });

        if let Lookup::NotFound = lookup {
            store.add_user(User::new(name))?;
        }

        self.resolved.insert(name.to_string(), id);
        Ok(id)
    }

    /// 解析旁白
    pub fn resolve_narrator<S>(&mut self, store: &mut S) -> Result<UserId, StoreError>
    where
        S: EntityStore + ?Sized,
    {
        self.resolve(store, NARRATOR)
    }

    /// 本次已解析的不同名字数量
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// 解析过程中的警告
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// 取走警告
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}
