// ==========================================
// 产品目录导入 - 单行导入器
// ==========================================
// 流程: 字段提取 → 校验必填引用 → 规范化/拆分 → 引用解析 → 写入产品
// 字段: 0=类别 1=品牌 2=产品名 3=未使用 4=配料
// 红线: 行被拒绝时不得创建任何实体（先校验，后解析）
// ==========================================

use crate::domain::{
    EntityKind, ImportedProduct, NewProduct, RawCatalogRow, ResolutionStats,
};
use crate::importer::catalog_importer_trait::{IngredientSplitter, TextNormalizer};
use crate::importer::error::{ImportResult, ReferenceField, RowError};
use crate::importer::ingredient_splitter::IngredientSplitter as IngredientSplitterImpl;
use crate::importer::reference_resolver::ReferenceResolver;
use crate::importer::text_normalizer::TextNormalizer as TextNormalizerImpl;
use crate::repository::CatalogRepository;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// 有效行的最少字段数
pub const MIN_FIELD_COUNT: usize = 3;

pub const FIELD_CATEGORY: usize = 0;
pub const FIELD_BRAND: usize = 1;
pub const FIELD_PRODUCT_NAME: usize = 2;
pub const FIELD_INGREDIENTS: usize = 4;

// ==========================================
// RowImporter - 批次上下文
// ==========================================
// 持有本批次的引用解析器（身份缓存），随批次结束丢弃
pub struct RowImporter<'a, R>
where
    R: CatalogRepository + ?Sized,
{
    repo: &'a R,
    normalizer: &'a dyn TextNormalizer,
    splitter: &'a dyn IngredientSplitter,
    resolver: ReferenceResolver,
}

impl<'a, R> RowImporter<'a, R>
where
    R: CatalogRepository + ?Sized,
{
    pub fn new(
        repo: &'a R,
        normalizer: &'a dyn TextNormalizer,
        splitter: &'a dyn IngredientSplitter,
    ) -> Self {
        Self {
            repo,
            normalizer,
            splitter,
            resolver: ReferenceResolver::new(),
        }
    }

    /// 使用默认的规范化器与拆分器
    pub fn with_defaults(repo: &'a R) -> Self {
        Self::new(repo, &TextNormalizerImpl, &IngredientSplitterImpl)
    }

    /// 导入单行
    ///
    /// # 返回
    /// - Ok(ImportedProduct): 产品已写入当前工作单元
    /// - Err(Row(MalformedRow)): 字段不足 3 个
    /// - Err(Row(MissingRequiredReference)): 类别或品牌为空
    /// - Err(其他): 持久化失败（调用方负责回滚）
    pub fn import_row(&mut self, row: &RawCatalogRow) -> ImportResult<ImportedProduct> {
        if row.fields.len() < MIN_FIELD_COUNT {
            return Err(RowError::MalformedRow {
                row: row.row_number,
                field_count: row.fields.len(),
            }
            .into());
        }

        // === 字段提取与校验 ===
        let category_name = required_field(row, FIELD_CATEGORY, ReferenceField::Category)?;
        let brand_name = required_field(row, FIELD_BRAND, ReferenceField::Brand)?;

        let product_name = self
            .normalizer
            .strip_trailing_comma(row.field(FIELD_PRODUCT_NAME).unwrap_or_default());
        if product_name.trim().is_empty() {
            warn!(row = row.row_number, "产品名称为空");
        }

        // 缺失配料列视为无配料
        let ingredient_names = self
            .splitter
            .split(row.field(FIELD_INGREDIENTS).unwrap_or_default());

        // === 引用解析 ===
        let category_id = self
            .resolver
            .resolve(self.repo, EntityKind::Category, category_name)?;
        let brand_id = self
            .resolver
            .resolve(self.repo, EntityKind::Brand, brand_name)?;

        let mut ingredient_ids = BTreeSet::new();
        for name in &ingredient_names {
            ingredient_ids.insert(self.resolver.resolve(self.repo, EntityKind::Ingredient, name)?);
        }

        // === 组装并写入产品 ===
        let product = NewProduct {
            name: product_name,
            brand_id,
            category_id,
            ingredient_ids,
            allergen_ids: BTreeSet::new(),
        };
        let product_id = self.repo.insert_product(&product)?;

        debug!(
            row = row.row_number,
            product_id = %product_id,
            ingredients = product.ingredient_ids.len(),
            "产品已写入"
        );

        Ok(ImportedProduct {
            row_number: row.row_number,
            product_id,
            name: product.name,
            brand_id,
            category_id,
            ingredient_ids: product.ingredient_ids,
        })
    }

    /// 结束批次，丢弃身份缓存
    pub fn finish(self) -> ResolutionStats {
        self.resolver.finish()
    }
}

/// 读取必填引用字段（trim 后非空）
fn required_field(row: &RawCatalogRow, index: usize, field: ReferenceField) -> Result<&str, RowError> {
    match row.field(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RowError::MissingRequiredReference {
            row: row.row_number,
            field,
        }),
    }
}
