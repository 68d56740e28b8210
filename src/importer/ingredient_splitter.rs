// ==========================================
// 产品目录导入 - 配料拆分实现
// ==========================================
// 规则:
// 1. 先经 TextNormalizer 清洗
// 2. ',' 与 ';' 等价视为分隔符
// 3. 逐项 trim，丢弃空项
// 4. 完全相同的名称合并（大小写敏感）
// ==========================================

use crate::importer::catalog_importer_trait::{
    IngredientSplitter as IngredientSplitterTrait, TextNormalizer as _,
};
use crate::importer::text_normalizer::TextNormalizer;
use std::collections::BTreeSet;

/// 配料分隔符
pub const INGREDIENT_SEPARATORS: [char; 2] = [',', ';'];

pub struct IngredientSplitter;

impl IngredientSplitterTrait for IngredientSplitter {
    fn split(&self, field: &str) -> BTreeSet<String> {
        TextNormalizer
            .normalize(field)
            .split(&INGREDIENT_SEPARATORS[..])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}
