use std::io;
use std::path::{Path, PathBuf};
use tokio::fs as tokio_fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

/// Local storage rooted at an export directory
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create new local storage instance
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get full path for a key
    pub fn full_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// 列出目录中指定扩展名的文件，返回不含扩展名的文件名（按名称排序）
    pub async fn list_stems(&self, key: &str, extension: &str) -> io::Result<Vec<String>> {
        let mut entries = tokio_fs::read_dir(self.full_path(key)).await?;
        let mut stems = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                stems.push(stem.to_string());
            }
        }

        stems.sort();
        Ok(stems)
    }

    /// 使用walkdir递归查找指定文件名的文件 - 通过队列返回路径作为生产者
    pub fn find_files(&self, key: &str, file_name: &str) -> mpsc::Receiver<PathBuf> {
        use walkdir::WalkDir;
        let (tx, rx) = mpsc::channel(1000);
        let path = self.full_path(key);
        let file_name = file_name.to_string();

        tokio::task::spawn_blocking(move || {
            let walker = WalkDir::new(&path).follow_links(false).max_open(100);

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        log::warn!("Failed to list {}: {}", path.display(), e);
                        continue;
                    }
                };

                if !entry.file_type().is_file() || entry.file_name() != file_name.as_str() {
                    continue;
                }

                if tx.blocking_send(entry.into_path()).is_err() {
                    // 接收端已关闭
                    break;
                }
            }
        });

        rx
    }

    /// Read a whole file as UTF-8 text
    pub async fn read_file(path: &Path) -> io::Result<String> {
        tokio_fs::read_to_string(path).await
    }

    /// 覆盖文件 - 先写入同目录下的临时文件，再重命名替换原文件
    pub async fn write_file(path: &Path, content: &[u8]) -> io::Result<()> {
        let tmp_path = temp_path(path);

        if let Err(e) = Self::write_new(&tmp_path, content).await {
            let _ = tokio_fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        if let Err(e) = tokio_fs::rename(&tmp_path, path).await {
            let _ = tokio_fs::remove_file(&tmp_path).await;
            return Err(e);
        }

        Ok(())
    }

    async fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
        let mut file = tokio_fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .await?;

        file.write_all(content).await?;
        file.flush().await?;
        file.sync_all().await?;

        Ok(())
    }
}

/// Sibling path used while a file is being rewritten, e.g. `Rights.xml.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut file_name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    file_name.push(".tmp");
    path.with_file_name(file_name)
}
