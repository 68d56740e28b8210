// ==========================================
// 产品目录导入 - 核心库
// ==========================================
// 输入: '|' 分隔的产品目录文件（首行表头）
// 输出: 品牌 / 类别 / 产品 / 配料 规范化关系图（SQLite）
// 红线: 引用实体按名称唯一；产品每行新建；整文件单一工作单元
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 规范化与去重
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 对外接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    EntityId, EntityKind, ImportReport, ImportedProduct, MissingReferencePolicy, NewProduct,
    Product, RawCatalogRow, ReferenceEntity,
};

// 导入层
pub use importer::{
    CatalogImporter, CatalogImporterImpl, ImportError, ImportResult, ReferenceResolver,
    RowError, RowImporter,
};

// 仓储层
pub use repository::{CatalogRepository, RepositoryError, SqliteCatalogRepository};

// 配置
pub use config::{ImportConfig, ImportConfigReader};

// API
pub use api::{ApiError, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "food-catalog-import";
