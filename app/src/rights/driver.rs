use std::collections::HashSet;
use std::path::Path;
use storage::LocalStorage;

use super::catalog::ObjectKind;
use super::classify::{classify, Classification};
use super::error::Result;
use super::inject::inject_missing;
use super::reconcile::reconcile;
use super::tree::{Document, Node};

/// 外部清单 - 导出目录中已知的文档和目录实例
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    pub documents: Vec<String>,
    pub catalogs: Vec<String>,
}

impl Inventory {
    pub fn instances(&self, kind: ObjectKind) -> &[String] {
        match kind {
            ObjectKind::Document => &self.documents,
            ObjectKind::Catalog => &self.catalogs,
        }
    }
}

/// Instances that already have a root-level object entry in the file being patched.
#[derive(Debug, Default)]
pub struct SeenInstances {
    documents: HashSet<String>,
    catalogs: HashSet<String>,
}

impl SeenInstances {
    pub fn record(&mut self, classification: &Classification) {
        self.for_kind_mut(classification.kind)
            .insert(classification.instance.clone());
    }

    pub fn for_kind(&self, kind: ObjectKind) -> &HashSet<String> {
        match kind {
            ObjectKind::Document => &self.documents,
            ObjectKind::Catalog => &self.catalogs,
        }
    }

    fn for_kind_mut(&mut self, kind: ObjectKind) -> &mut HashSet<String> {
        match kind {
            ObjectKind::Document => &mut self.documents,
            ObjectKind::Catalog => &mut self.catalogs,
        }
    }
}

/// 单个角色文件的处理结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileReport {
    pub reconciled_documents: usize,
    pub reconciled_catalogs: usize,
    pub injected_documents: usize,
    pub injected_catalogs: usize,
    pub rights_disabled: usize,
    pub rights_appended: usize,
}

impl FileReport {
    fn count_reconciled(&mut self, kind: ObjectKind) {
        match kind {
            ObjectKind::Document => self.reconciled_documents += 1,
            ObjectKind::Catalog => self.reconciled_catalogs += 1,
        }
    }

    fn count_injected(&mut self, kind: ObjectKind, injected: usize) {
        match kind {
            ObjectKind::Document => self.injected_documents += injected,
            ObjectKind::Catalog => self.injected_catalogs += injected,
        }
    }
}

/// Disable the fixed permissions on every root-level document/catalog entry and
/// append fully disabled entries for inventory instances the file does not list.
pub fn patch_document(document: &mut Document, inventory: &Inventory) -> FileReport {
    let mut report = FileReport::default();
    let mut seen = SeenInstances::default();

    for object in document
        .root
        .children
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .filter(|element| element.name == "object" && !element.children.is_empty())
    {
        let Some(classification) = classify(object) else {
            continue;
        };
        seen.record(&classification);

        let reconciled = reconcile(object, classification.kind.permissions());
        report.count_reconciled(classification.kind);
        report.rights_disabled += reconciled.disabled;
        report.rights_appended += reconciled.appended;
    }

    for kind in ObjectKind::ALL {
        let injected = inject_missing(
            &mut document.root,
            inventory.instances(kind),
            seen.for_kind(kind),
            kind,
        );
        report.count_injected(kind, injected);
    }

    report
}

/// Read, patch and overwrite one role file.
pub async fn process_file(path: &Path, inventory: &Inventory) -> Result<FileReport> {
    log::debug!("Processing {}", path.display());

    let xml = LocalStorage::read_file(path).await?;
    let mut document = Document::parse(&xml)?;

    let report = patch_document(&mut document, inventory);

    let patched = document.to_xml()?;
    LocalStorage::write_file(path, patched.as_bytes()).await?;

    Ok(report)
}
