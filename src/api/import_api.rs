// ==========================================
// 目录导入API
// ==========================================
// 职责: 封装目录导入与目录统计查询
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ImportConfig;
use crate::domain::{EntityKind, SkippedRow};
use crate::importer::{CatalogImporter, CatalogImporterImpl};
use crate::repository::{CatalogRepository, SqliteCatalogRepository};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 批次ID
    pub batch_id: String,
    /// 数据行数（不含表头）
    pub total_rows: usize,
    /// 新建产品数量
    pub imported: usize,
    /// 字段不足被跳过的行数
    pub malformed_rows: usize,
    /// 品牌/类别为空被跳过的行
    pub missing_reference_rows: Vec<SkippedRow>,
    /// 新建品牌数量
    pub brands_created: usize,
    /// 新建类别数量
    pub categories_created: usize,
    /// 新建配料数量
    pub ingredients_created: usize,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 目录统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCounts {
    pub brands: usize,
    pub categories: usize,
    pub ingredients: usize,
    pub allergens: usize,
    pub products: usize,
}

/// 导入API
pub struct ImportApi {
    config: ImportConfig,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// 导入目录文件
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果（已提交）
    /// - Err(ApiError): 错误信息（批次已回滚）
    pub async fn import_catalog(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        if file_path.trim().is_empty() {
            return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
        }

        let repo = self.open_repository()?;
        let importer = CatalogImporterImpl::with_defaults(repo, self.config.clone());

        let report = importer.import_file(Path::new(file_path)).await?;
        info!(batch_id = %report.batch_id, imported = report.imported_products, "导入API调用完成");

        Ok(ImportApiResponse {
            batch_id: report.batch_id,
            total_rows: report.total_rows,
            imported: report.imported_products,
            malformed_rows: report.malformed_rows,
            missing_reference_rows: report.missing_reference_rows,
            brands_created: report.resolution.brands_created,
            categories_created: report.resolution.categories_created,
            ingredients_created: report.resolution.ingredients_created,
            elapsed_ms: report.elapsed_ms,
        })
    }

    /// 查询目录统计
    pub fn catalog_counts(&self) -> ApiResult<CatalogCounts> {
        let repo = self.open_repository()?;
        Ok(CatalogCounts {
            brands: repo.count(EntityKind::Brand)?,
            categories: repo.count(EntityKind::Category)?,
            ingredients: repo.count(EntityKind::Ingredient)?,
            allergens: repo.count(EntityKind::Allergen)?,
            products: repo.count_products()?,
        })
    }

    fn open_repository(&self) -> ApiResult<SqliteCatalogRepository> {
        Ok(SqliteCatalogRepository::new(&self.config.db_path)?)
    }
}
