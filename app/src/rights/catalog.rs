use std::fmt;

pub const DOCUMENT_PERMISSIONS: &[&str] = &["InteractiveDelete", "InteractiveDeleteMarked"];

pub const CATALOG_PERMISSIONS: &[&str] = &[
    "InteractiveDelete",
    "InteractiveDeleteMarked",
    "InteractiveDeletePredefinedData",
    "InteractiveDeleteMarkedPredefinedData",
];

/// 对象类型 - 文档或目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Document,
    Catalog,
}

impl ObjectKind {
    /// Processing order: documents before catalogs.
    pub const ALL: [ObjectKind; 2] = [ObjectKind::Document, ObjectKind::Catalog];

    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Document => "Document",
            ObjectKind::Catalog => "Catalog",
        }
    }

    /// Prefix of a qualifying object name, including the trailing dot.
    pub fn prefix(&self) -> &'static str {
        match self {
            ObjectKind::Document => "Document.",
            ObjectKind::Catalog => "Catalog.",
        }
    }

    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            ObjectKind::Document => DOCUMENT_PERMISSIONS,
            ObjectKind::Catalog => CATALOG_PERMISSIONS,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
