// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、源文件生成等功能
// ==========================================

#![allow(dead_code)]

use food_catalog_import::db::{init_schema, open_sqlite_connection};
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 源文件表头
pub const CATALOG_HEADER: &str = "category|brand|product_name|grade|ingredients";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入目录源文件（自动加表头）
///
/// # 参数
/// - rows: 数据行（不含表头）
pub fn write_catalog_file(rows: &[&str]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "{}", CATALOG_HEADER)?;
    for row in rows {
        writeln!(file, "{}", row)?;
    }
    file.flush()?;
    Ok(file)
}

/// 文件路径转字符串
pub fn path_str(file: &NamedTempFile) -> String {
    file.path().display().to_string()
}
