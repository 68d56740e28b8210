// ==========================================
// 产品目录导入 - 领域类型定义
// ==========================================
// 引用实体种类 / 实体标识 / 缺失引用处理策略
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 引用实体种类 (Entity Kind)
// ==========================================
// 红线: 同一种类内 name 唯一
// Product 不属于引用实体（每行新建，不去重）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Brand,      // 品牌
    Category,   // 类别
    Ingredient, // 配料
    Allergen,   // 过敏原（导入路径不填充）
}

impl EntityKind {
    /// 全部引用实体种类
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Brand,
        EntityKind::Category,
        EntityKind::Ingredient,
        EntityKind::Allergen,
    ];

    /// 对应的数据库表名
    ///
    /// 表名来自固定枚举，拼接进 SQL 不存在注入风险
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Brand => "brand",
            EntityKind::Category => "category",
            EntityKind::Ingredient => "ingredient",
            EntityKind::Allergen => "allergen",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Brand => write!(f, "BRAND"),
            EntityKind::Category => write!(f, "CATEGORY"),
            EntityKind::Ingredient => write!(f, "INGREDIENT"),
            EntityKind::Allergen => write!(f, "ALLERGEN"),
        }
    }
}

// ==========================================
// 实体标识 (Entity Id)
// ==========================================
// 关系图以整数键表达，不嵌入对象图
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// 缺失引用处理策略 (Missing Reference Policy)
// ==========================================
// 品牌或类别为空时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissingReferencePolicy {
    #[default]
    Skip,  // 跳过该行，继续导入
    Abort, // 中止整个批次并回滚
}

impl MissingReferencePolicy {
    /// 从配置字符串解析（大小写不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SKIP" => Some(MissingReferencePolicy::Skip),
            "ABORT" => Some(MissingReferencePolicy::Abort),
            _ => None,
        }
    }
}

impl fmt::Display for MissingReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingReferencePolicy::Skip => write!(f, "SKIP"),
            MissingReferencePolicy::Abort => write!(f, "ABORT"),
        }
    }
}
