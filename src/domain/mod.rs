// ==========================================
// 产品目录导入 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含导入逻辑
// ==========================================

pub mod catalog;
pub mod import;
pub mod types;

// 重导出核心类型
pub use catalog::{Allergen, Brand, Category, Ingredient, NewProduct, Product, ReferenceEntity};
pub use import::{ImportReport, ImportedProduct, RawCatalogRow, ResolutionStats, SkippedRow};
pub use types::{EntityId, EntityKind, MissingReferencePolicy};
