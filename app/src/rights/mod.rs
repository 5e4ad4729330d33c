use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use storage::LocalStorage;
use tokio::task::{self, JoinError, JoinSet};
use utils::app_config::LayoutConfig;
use utils::error::Result;

pub mod catalog;
pub mod classify;
pub mod driver;
pub mod error;
pub mod inject;
pub mod reconcile;
pub mod tree;


pub use catalog::{ObjectKind, CATALOG_PERMISSIONS, DOCUMENT_PERMISSIONS};
pub use classify::{classify, Classification};
pub use driver::{patch_document, process_file, FileReport, Inventory, SeenInstances};
pub use error::RightsError;
pub use inject::{disabled_object, inject_missing};
pub use reconcile::{disabled_right, reconcile, Reconciled};
pub use tree::{Document, Element, Node};

// ============================================================================
// 类型定义
// ============================================================================

/// 补丁参数 - 来自CLI的输入参数
#[derive(Debug, Clone)]
pub struct PatchParams {
    /// 导出根目录（--dirPath）
    pub dir_path: PathBuf,

    /// 导出目录布局
    pub layout: LayoutConfig,
}

impl PatchParams {
    pub fn new(dir_path: impl Into<PathBuf>) -> Self {
        Self {
            dir_path: dir_path.into(),
            layout: LayoutConfig::default(),
        }
    }
}

/// 单个失败的角色文件
#[derive(Debug, Clone)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// 运行统计 - 所有角色文件的汇总
#[derive(Debug, Clone, Default)]
pub struct PatchSummary {
    pub documents: usize,
    pub catalogs: usize,
    pub role_files: usize,
    pub patched: usize,
    pub failed: Vec<FailedFile>,
    pub totals: FileReport,
    pub total_time: String,
}

impl PatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn record_success(&mut self, report: &FileReport) {
        self.patched += 1;
        self.totals.reconciled_documents += report.reconciled_documents;
        self.totals.reconciled_catalogs += report.reconciled_catalogs;
        self.totals.injected_documents += report.injected_documents;
        self.totals.injected_catalogs += report.injected_catalogs;
        self.totals.rights_disabled += report.rights_disabled;
        self.totals.rights_appended += report.rights_appended;
    }

    fn record_failure(&mut self, path: PathBuf, reason: String) {
        self.failed.push(FailedFile { path, reason });
    }
}

impl fmt::Display for PatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inventory          : {} documents, {} catalogs", self.documents, self.catalogs)?;
        writeln!(f, "Role files         : {}", self.role_files)?;
        writeln!(f, "Patched            : {}", self.patched)?;
        writeln!(f, "Failed             : {}", self.failed.len())?;
        writeln!(
            f,
            "Objects reconciled : {} documents, {} catalogs",
            self.totals.reconciled_documents, self.totals.reconciled_catalogs
        )?;
        writeln!(
            f,
            "Objects injected   : {} documents, {} catalogs",
            self.totals.injected_documents, self.totals.injected_catalogs
        )?;
        writeln!(
            f,
            "Rights             : {} disabled, {} appended",
            self.totals.rights_disabled, self.totals.rights_appended
        )?;
        for failed in &self.failed {
            writeln!(f, "  failed: {} ({})", failed.path.display(), failed.reason)?;
        }
        write!(f, "Total time         : {}", self.total_time)
    }
}

/// 角色文件任务集合 - 按任务ID记录每个任务处理的文件
struct RoleFileTasks<T> {
    tasks: JoinSet<T>,
    paths: HashMap<task::Id, PathBuf>,
}

impl<T: Send + 'static> RoleFileTasks<T> {
    fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            paths: HashMap::new(),
        }
    }

    fn spawn<F>(&mut self, path: PathBuf, future: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        let handle = self.tasks.spawn(future);
        self.paths.insert(handle.id(), path);
    }

    /// Next finished task with its role file, also when the task panicked.
    async fn join_next(&mut self) -> Option<(PathBuf, std::result::Result<T, JoinError>)> {
        let joined = self.tasks.join_next_with_id().await?;
        let (id, result) = match joined {
            Ok((id, value)) => (id, Ok(value)),
            Err(e) => (e.id(), Err(e)),
        };
        let path = self.paths.remove(&id).unwrap_or_default();
        Some((path, result))
    }
}

// ============================================================================
// 核心函数实现
// ============================================================================

/// 主函数 - 处理导出目录中的所有角色文件
pub async fn patch(params: PatchParams) -> Result<PatchSummary> {
    log::info!("Starting rights patch with params: {:?}", params);
    let start_time = Instant::now();

    let storage = LocalStorage::new(&params.dir_path);
    let inventory = Arc::new(load_inventory(&storage, &params.layout).await);

    let mut summary = PatchSummary {
        documents: inventory.documents.len(),
        catalogs: inventory.catalogs.len(),
        ..Default::default()
    };

    // 每个角色文件一个任务，发现即启动
    let mut role_files = storage.find_files(&params.layout.roles_dir, &params.layout.rights_file_name);
    let mut tasks = RoleFileTasks::new();

    while let Some(path) = role_files.recv().await {
        summary.role_files += 1;
        let inventory = Arc::clone(&inventory);
        let task_path = path.clone();
        tasks.spawn(path, async move { process_file(&task_path, &inventory).await });
    }

    if summary.role_files == 0 {
        log::warn!(
            "No {} files found under {}",
            params.layout.rights_file_name,
            storage.full_path(&params.layout.roles_dir).display()
        );
    }

    while let Some((path, joined)) = tasks.join_next().await {
        match joined {
            Ok(Ok(report)) => {
                log::info!("Patched {}: {:?}", path.display(), report);
                summary.record_success(&report);
            }
            Ok(Err(e)) => {
                log::error!("Failed to patch {}: {}", path.display(), e);
                summary.record_failure(path, e.to_string());
            }
            Err(e) => {
                log::error!("Role file task for {} failed: {}", path.display(), e);
                summary.record_failure(path, e.to_string());
            }
        }
    }

    summary.total_time = format!("{:.2}s", start_time.elapsed().as_secs_f64());
    log::info!("Rights patch completed: {:?}", summary);

    Ok(summary)
}

/// 读取文档和目录清单；目录无法列出时记录日志并视为空清单
pub async fn load_inventory(storage: &LocalStorage, layout: &LayoutConfig) -> Inventory {
    let (documents, catalogs) = tokio::join!(
        list_instances(storage, &layout.documents_dir, &layout.instance_extension),
        list_instances(storage, &layout.catalogs_dir, &layout.instance_extension),
    );

    Inventory { documents, catalogs }
}

async fn list_instances(storage: &LocalStorage, key: &str, extension: &str) -> Vec<String> {
    match storage.list_stems(key, extension).await {
        Ok(instances) => {
            log::debug!("Found {} instances in {}", instances.len(), key);
            instances
        }
        Err(e) => {
            log::warn!("Failed to list {}: {}", storage.full_path(key).display(), e);
            Vec::new()
        }
    }
}
