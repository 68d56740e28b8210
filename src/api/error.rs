// ==========================================
// 产品目录导入 - API层错误类型
// ==========================================
// 职责: 将导入/仓储错误归为调用方可处理的几类
// 源文件问题 / 数据行被拒绝 / 配置问题 / 目录存储问题
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ===== 源文件 =====
    #[error("源文件不存在: {0}")]
    SourceNotFound(String),

    #[error("源文件读取失败: {0}")]
    SourceUnreadable(String),

    // ===== 数据 / 配置 =====
    #[error("数据行被拒绝，批次已回滚: {0}")]
    RowRejected(String),

    #[error("导入配置错误: {0}")]
    Config(String),

    // ===== 目录存储 =====
    #[error("目录存储失败: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::SourceNotFound(path),
            ImportError::FileReadError(_) | ImportError::CsvParseError(_) => {
                ApiError::SourceUnreadable(err.to_string())
            }
            ImportError::Row(_) | ImportError::EmptyReferenceName { .. } => {
                ApiError::RowRejected(err.to_string())
            }
            ImportError::ConfigValueError { .. } => ApiError::Config(err.to_string()),
            ImportError::Repository(repo_err) => ApiError::Storage(repo_err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
