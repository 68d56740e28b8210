// ==========================================
// 产品目录导入 - 目录领域模型
// ==========================================
// 实体: Brand / Category / Ingredient / Allergen / Product
// 关系: Product → Brand (1), Category (1), Ingredient (N:N), Allergen (N:N)
// ==========================================

use crate::domain::types::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// ReferenceEntity - 引用实体
// ==========================================
// Brand / Category / Ingredient / Allergen 共用同一形状 { id, name }
// 红线: name 在同一种类内唯一
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEntity {
    pub kind: EntityKind,
    pub id: EntityId,
    pub name: String,
}

pub type Brand = ReferenceEntity;
pub type Category = ReferenceEntity;
pub type Ingredient = ReferenceEntity;
pub type Allergen = ReferenceEntity;

// ==========================================
// NewProduct - 待写入的产品记录
// ==========================================
// 用途: 行导入器组装，仓储层写入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub brand_id: EntityId,                // 必填
    pub category_id: EntityId,             // 必填
    pub ingredient_ids: BTreeSet<EntityId>, // 集合语义，可为空
    pub allergen_ids: BTreeSet<EntityId>,   // 当前数据源无过敏原数据
}

// ==========================================
// Product - 已持久化的产品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    pub brand: Brand,
    pub category: Category,
    pub ingredients: Vec<Ingredient>, // 按 name 排序
    pub allergens: Vec<Allergen>,     // 按 name 排序
}

impl Product {
    /// 配料名称集合
    pub fn ingredient_names(&self) -> BTreeSet<&str> {
        self.ingredients.iter().map(|i| i.name.as_str()).collect()
    }
}
