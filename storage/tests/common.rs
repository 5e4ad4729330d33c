use std::fs;
use tempfile::TempDir;

/// 创建测试用的导出目录结构
pub fn create_export_structure() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("Documents/Invoice/Ext")).unwrap();
    fs::create_dir_all(root.join("Catalogs")).unwrap();
    fs::create_dir_all(root.join("Roles/Admin/Ext")).unwrap();
    fs::create_dir_all(root.join("Roles/Clerk/Ext")).unwrap();
    fs::create_dir_all(root.join("Roles/Empty")).unwrap();

    fs::write(root.join("Documents/Order.xml"), b"<Document/>").unwrap();
    fs::write(root.join("Documents/Invoice.xml"), b"<Document/>").unwrap();
    fs::write(root.join("Documents/Invoice/Ext/Form.xml"), b"<Form/>").unwrap();
    fs::write(root.join("Documents/readme.txt"), b"not an instance").unwrap();
    fs::write(root.join("Catalogs/Currency.xml"), b"<Catalog/>").unwrap();

    fs::write(root.join("Roles/Admin.xml"), b"<Role/>").unwrap();
    fs::write(root.join("Roles/Admin/Ext/Rights.xml"), b"<Rights/>").unwrap();
    fs::write(root.join("Roles/Clerk/Ext/Rights.xml"), b"<Rights/>").unwrap();
    fs::write(root.join("Roles/Empty/Rights.txt"), b"").unwrap();

    temp_dir
}
