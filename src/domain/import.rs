// ==========================================
// 产品目录导入 - 导入过程模型
// ==========================================
// 原始行 / 单行导入结果 / 引用解析统计 / 批次报告
// ==========================================

use crate::domain::types::{EntityId, EntityKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// RawCatalogRow - 源文件原始行
// ==========================================
// 字段位置: 0=类别 1=品牌 2=产品名 3=未使用 4=配料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCatalogRow {
    pub row_number: usize,   // 文件行号（表头为第 1 行）
    pub fields: Vec<String>, // 按分隔符拆分后的字段（未 trim）
}

impl RawCatalogRow {
    pub fn new(row_number: usize, fields: Vec<String>) -> Self {
        Self { row_number, fields }
    }

    /// 取指定位置字段（trim 后），缺失时为 None
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|f| f.trim())
    }
}

// ==========================================
// ImportedProduct - 单行导入结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedProduct {
    pub row_number: usize,
    pub product_id: EntityId,
    pub name: String,
    pub brand_id: EntityId,
    pub category_id: EntityId,
    pub ingredient_ids: BTreeSet<EntityId>,
}

// ==========================================
// SkippedRow - 被跳过的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row_number: usize,
    pub reason: String,
}

// ==========================================
// ResolutionStats - 引用解析统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub brands_created: usize,
    pub categories_created: usize,
    pub ingredients_created: usize,
    pub allergens_created: usize,
    pub cache_hits: usize,   // 本批次缓存命中
    pub storage_hits: usize, // 命中已持久化的实体
}

impl ResolutionStats {
    pub fn record_created(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Brand => self.brands_created += 1,
            EntityKind::Category => self.categories_created += 1,
            EntityKind::Ingredient => self.ingredients_created += 1,
            EntityKind::Allergen => self.allergens_created += 1,
        }
    }
}

// ==========================================
// ImportReport - 批次导入报告
// ==========================================
// 用途: 导入接口返回值，同时写入 import_batch 表
// 红线: 仅在批次提交成功时落库
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,                  // 批次 ID（UUID）
    pub file_path: String,                 // 源文件路径
    pub started_at: DateTime<Utc>,         // 开始时间
    pub finished_at: Option<DateTime<Utc>>, // 完成时间
    pub total_rows: usize,                 // 数据行数（不含表头）
    pub imported_products: usize,          // 新建产品数
    pub malformed_rows: usize,             // 字段不足被静默跳过的行
    pub missing_reference_rows: Vec<SkippedRow>, // 品牌/类别为空被跳过的行
    pub resolution: ResolutionStats,       // 引用解析统计
    pub elapsed_ms: u64,                   // 耗时（毫秒）
}

impl ImportReport {
    pub fn new(batch_id: String, file_path: String, started_at: DateTime<Utc>) -> Self {
        Self {
            batch_id,
            file_path,
            started_at,
            finished_at: None,
            total_rows: 0,
            imported_products: 0,
            malformed_rows: 0,
            missing_reference_rows: Vec::new(),
            resolution: ResolutionStats::default(),
            elapsed_ms: 0,
        }
    }

    /// 跳过的总行数
    pub fn skipped_rows(&self) -> usize {
        self.malformed_rows + self.missing_reference_rows.len()
    }
}
