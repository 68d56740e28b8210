// ==========================================
// 产品目录导入 - 导入配置
// ==========================================
// 来源: 环境变量（缺省回退到默认值）
// 职责: 数据库路径 / 源文件路径 / 分隔符 / 缺失引用策略
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::domain::MissingReferencePolicy;
use crate::importer::error::{ImportError, ImportResult};
use std::path::PathBuf;

/// 环境变量: 数据库路径
pub const ENV_DB_PATH: &str = "FOOD_CATALOG_DB_PATH";
/// 环境变量: 源文件路径
pub const ENV_FILE_PATH: &str = "FOOD_CATALOG_FILE";
/// 环境变量: 字段分隔符（单字节）
pub const ENV_DELIMITER: &str = "FOOD_CATALOG_DELIMITER";
/// 环境变量: 缺失引用策略（skip / abort）
pub const ENV_ON_MISSING_REFERENCE: &str = "FOOD_CATALOG_ON_MISSING_REFERENCE";

/// 默认字段分隔符
pub const DEFAULT_DELIMITER: u8 = b'|';

/// 默认数据库文件名
pub const DEFAULT_DB_FILE_NAME: &str = "food_catalog.db";

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub db_path: String,
    pub file_path: Option<PathBuf>,
    pub delimiter: u8,
    pub missing_reference_policy: MissingReferencePolicy,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            file_path: None,
            delimiter: DEFAULT_DELIMITER,
            missing_reference_policy: MissingReferencePolicy::default(),
        }
    }
}

impl ImportConfig {
    /// 指定数据库路径，其余取默认值
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            file_path: None,
            delimiter: DEFAULT_DELIMITER,
            missing_reference_policy: MissingReferencePolicy::default(),
        }
    }

    /// 设置缺失引用策略
    pub fn policy(mut self, policy: MissingReferencePolicy) -> Self {
        self.missing_reference_policy = policy;
        self
    }

    /// 从环境变量加载
    ///
    /// # 错误
    /// - 分隔符不是单个 ASCII 字符
    /// - 策略值不是 skip / abort
    pub fn from_env() -> ImportResult<Self> {
        let mut config = Self::default();

        if let Some(path) = read_env(ENV_FILE_PATH) {
            config.file_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = read_env(ENV_DELIMITER) {
            config.delimiter = parse_delimiter(&raw).ok_or_else(|| ImportError::ConfigValueError {
                key: ENV_DELIMITER.to_string(),
                value: raw.clone(),
                message: "分隔符必须为单个 ASCII 字符".to_string(),
            })?;
        }

        if let Some(raw) = read_env(ENV_ON_MISSING_REFERENCE) {
            config.missing_reference_policy =
                MissingReferencePolicy::parse(&raw).ok_or_else(|| ImportError::ConfigValueError {
                    key: ENV_ON_MISSING_REFERENCE.to_string(),
                    value: raw.clone(),
                    message: "仅支持 skip / abort".to_string(),
                })?;
        }

        Ok(config)
    }
}

impl ImportConfigReader for ImportConfig {
    fn field_delimiter(&self) -> u8 {
        self.delimiter
    }

    fn missing_reference_policy(&self) -> MissingReferencePolicy {
        self.missing_reference_policy
    }
}

/// 读取非空环境变量（trim 后）
fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_delimiter(raw: &str) -> Option<u8> {
    let bytes = raw.as_bytes();
    if bytes.len() == 1 && bytes[0].is_ascii() {
        Some(bytes[0])
    } else {
        None
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Some(path) = read_env(ENV_DB_PATH) {
        return path;
    }

    let mut path = PathBuf::from(".").join(DEFAULT_DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join(crate::APP_NAME);
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DEFAULT_DB_FILE_NAME);
        }
    }

    path.to_string_lossy().to_string()
}
