// ==========================================
// 产品目录导入 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 文本规范化 → 配料拆分 → 引用解析 → 产品组装 → 落库
// ==========================================

use crate::domain::{ImportReport, RawCatalogRow};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;

// ==========================================
// CatalogImporter Trait
// ==========================================
// 用途: 目录导入主接口
// 实现者: CatalogImporterImpl
#[async_trait]
pub trait CatalogImporter: Send + Sync {
    /// 从分隔符文件导入目录数据
    ///
    /// # 参数
    /// - file_path: 源文件路径（首行为表头，直接丢弃）
    ///
    /// # 返回
    /// - Ok(ImportReport): 批次报告（已提交）
    /// - Err: 文件读取错误、持久化错误等（整个批次已回滚）
    ///
    /// # 导入流程
    /// 1. 打开文件，逐行读取
    /// 2. 开启工作单元
    /// 3. 逐行: 字段提取 → 规范化 → 拆分 → 引用解析 → 写入产品
    /// 4. 写入批次报告并提交；任一致命错误则回滚
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: DelimitedFileParser
pub trait FileParser: Send + Sync {
    /// 打开文件，返回按文件顺序产出数据行的迭代器（表头已丢弃）
    ///
    /// # 返回
    /// - Ok(RowStream): 行迭代器（读取失败在迭代中以 Err 产出）
    /// - Err: 文件不存在或无法打开
    fn open_rows(&self, file_path: &Path) -> ImportResult<RowStream>;
}

/// 数据行迭代器
pub type RowStream = Box<dyn Iterator<Item = ImportResult<RawCatalogRow>> + Send>;

// ==========================================
// TextNormalizer Trait
// ==========================================
// 用途: 字段文本清洗接口
// 实现者: TextNormalizer
// 红线: 不抛错，始终返回字符串；幂等
pub trait TextNormalizer: Send + Sync {
    /// 清洗配料字段: 去除噪声字符、去除末尾句点
    fn normalize(&self, raw: &str) -> String;

    /// 清洗产品名称: 去除末尾逗号
    fn strip_trailing_comma(&self, raw: &str) -> String;
}

// ==========================================
// IngredientSplitter Trait
// ==========================================
// 用途: 配料字段拆分接口
// 实现者: IngredientSplitter
pub trait IngredientSplitter: Send + Sync {
    /// 将配料字段拆分为去重后的非空名称集合
    fn split(&self, field: &str) -> BTreeSet<String>;
}
