//! # StoreFile 模块
//!
//! 存储文件管理：把 [`MemoryStore`] 整体读写为一个 JSON 文件。
//!
//! ## 文件布局
//!
//! ```text
//! data/
//! └── store.json   { "users": [...], "conversations": [...], "messages": [...] }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use play_import::{MemoryStore, StoreError};
use thiserror::Error;
use tracing::{debug, info};

/// 存储文件错误
#[derive(Error, Debug)]
pub enum StoreFileError {
    /// 文件读写失败
    #[error("存储文件 {path:?} 读写失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 内容无法解析
    #[error("存储文件 {path:?} 内容无效: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
}

/// 存储文件
pub struct StoreFile {
    path: PathBuf,
}

impl StoreFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// 读取存储
    ///
    /// 文件不存在时返回空存储。
    pub fn load(&self) -> Result<MemoryStore, StoreFileError> {
        if !self.path.exists() {
            debug!(path = ?self.path, "存储文件不存在，使用空存储");
            return Ok(MemoryStore::new());
        }

        let json = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        let store = MemoryStore::from_json(&json).map_err(|source| StoreFileError::Invalid {
            path: self.path.clone(),
            source,
        })?;

        info!(
            path = ?self.path,
            users = store.num_users(),
            conversations = store.num_conversations(),
            messages = store.num_messages(),
            "存储读取成功"
        );
        Ok(store)
    }

    /// 写入存储（必要时创建目录）
    pub fn save(&self, store: &MemoryStore) -> Result<(), StoreFileError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let json = store.to_json().map_err(|source| StoreFileError::Invalid {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| self.io_error(source))?;

        info!(path = ?self.path, "存储保存成功");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreFileError {
        StoreFileError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use play_import::{EntityStore, User};

    #[test]
    fn test_missing_file_loads_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let file = StoreFile::new(dir.path().join("store.json"));
        assert!(!file.exists());
        assert_eq!(file.load().unwrap().num_users(), 0);
    }

    #[test]
    fn test_save_creates_directories_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let file = StoreFile::new(dir.path().join("nested/data/store.json"));

        let mut store = MemoryStore::new();
        store.add_user(User::new("ROMEO")).unwrap();
        file.save(&store).unwrap();

        assert!(file.exists());
        let loaded = file.load().unwrap();
        assert_eq!(loaded.users(), store.users());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let err = StoreFile::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreFileError::Invalid { .. }));
    }
}
