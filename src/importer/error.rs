// ==========================================
// 产品目录导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类:
// - RowError: 行级错误（可局部恢复：跳过该行）
// - ImportError: 批次级错误（中止并回滚）
// ==========================================

use crate::domain::EntityKind;
use crate::repository::RepositoryError;
use std::fmt;
use thiserror::Error;

/// 必填引用字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceField {
    Category,
    Brand,
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceField::Category => write!(f, "类别"),
            ReferenceField::Brand => write!(f, "品牌"),
        }
    }
}

/// 行级错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("行格式错误 (行 {row}): 仅 {field_count} 个字段，至少需要 3 个")]
    MalformedRow { row: usize, field_count: usize },

    #[error("必填引用缺失 (行 {row}): {field}为空")]
    MissingRequiredReference { row: usize, field: ReferenceField },
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("分隔符文件解析失败: {0}")]
    CsvParseError(String),

    // ===== 行级错误 =====
    #[error(transparent)]
    Row(#[from] RowError),

    // ===== 引用解析错误 =====
    #[error("引用名称无效 ({kind}): 名称为空")]
    EmptyReferenceName { kind: EntityKind },

    // ===== 数据库错误 =====
    #[error("持久化失败: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 配置错误 =====
    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_err) = err.kind() {
            return ImportError::FileReadError(io_err.to_string());
        }
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
