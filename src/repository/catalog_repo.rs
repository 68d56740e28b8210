// ==========================================
// 产品目录导入 - 目录仓储 Trait
// ==========================================
// 职责: 定义目录持久化接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 红线: 所有写操作参与同一个工作单元（begin → commit/rollback）
// ==========================================

use crate::domain::{EntityId, EntityKind, ImportReport, NewProduct, Product, ReferenceEntity};
use crate::repository::error::RepositoryResult;

// ==========================================
// CatalogRepository Trait
// ==========================================
// 用途: 导入核心消费的持久化协作方
// 实现者: SqliteCatalogRepository（使用 rusqlite）
pub trait CatalogRepository: Send + Sync {
    // ===== 引用实体 =====

    /// 按名称精确查找引用实体
    ///
    /// # 返回
    /// - Ok(Some(entity)): 已存在
    /// - Ok(None): 不存在
    fn find_by_name(&self, kind: EntityKind, name: &str) -> RepositoryResult<Option<ReferenceEntity>>;

    /// 新建引用实体（name 唯一约束由存储层保证）
    fn create_reference(&self, kind: EntityKind, name: &str) -> RepositoryResult<ReferenceEntity>;

    // ===== 产品 =====

    /// 写入产品及其配料/过敏原关联
    ///
    /// # 返回
    /// - Ok(EntityId): 新产品 ID
    fn insert_product(&self, product: &NewProduct) -> RepositoryResult<EntityId>;

    // ===== 工作单元 =====

    /// 开启工作单元（一个导入批次对应一个工作单元）
    fn begin_unit_of_work(&self) -> RepositoryResult<()>;

    /// 提交工作单元
    fn commit(&self) -> RepositoryResult<()>;

    /// 回滚工作单元（无进行中的工作单元时为空操作）
    fn rollback(&self) -> RepositoryResult<()>;

    // ===== 批次审计 =====

    /// 写入批次报告（与批次数据同一工作单元）
    fn insert_import_batch(&self, report: &ImportReport) -> RepositoryResult<()>;

    // ===== 查询 =====

    /// 统计指定种类的引用实体数量
    fn count(&self, kind: EntityKind) -> RepositoryResult<usize>;

    /// 统计产品数量
    fn count_products(&self) -> RepositoryResult<usize>;

    /// 按 ID 读取产品（含品牌/类别/配料/过敏原）
    fn find_product(&self, id: EntityId) -> RepositoryResult<Option<Product>>;

    /// 查询引用了指定配料的产品 ID（配料 → 产品 反向关系为派生查询）
    fn find_products_by_ingredient(&self, ingredient_id: EntityId) -> RepositoryResult<Vec<EntityId>>;
}
