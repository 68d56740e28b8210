// ==========================================
// 产品目录导入 - 配置层
// ==========================================
// 职责: 导入运行配置（数据源 / 文件 / 策略）
// 存储: 环境变量
// ==========================================

pub mod import_config;
pub mod import_config_trait;

// 重导出核心配置
pub use import_config::{get_default_db_path, ImportConfig};
pub use import_config_trait::ImportConfigReader;
