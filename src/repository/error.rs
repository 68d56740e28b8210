// ==========================================
// 产品目录导入 - 仓储层错误类型
// ==========================================
// 约束错误按 SQLite 扩展错误码区分，不解析错误消息文本
// 红线: 引用实体名称唯一 → DuplicateName 携带种类与名称
// ==========================================

use crate::domain::EntityKind;
use rusqlite::ffi;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 连接 / 工作单元 =====
    #[error("数据库连接失败: {0}")]
    ConnectionFailed(String),

    #[error("数据库连接锁已失效: {0}")]
    LockPoisoned(String),

    #[error("工作单元状态错误: {0}")]
    UnitOfWork(String),

    // ===== 目录约束 =====
    #[error("{kind} 名称已存在: {name}")]
    DuplicateName { kind: EntityKind, name: String },

    #[error("{kind} 名称不能为空")]
    EmptyName { kind: EntityKind },

    #[error("产品引用了不存在的品牌/类别/配料: {0}")]
    DanglingReference(String),

    // ===== 其他 =====
    #[error("批次报告序列化失败: {0}")]
    ReportEncoding(#[from] serde_json::Error),

    #[error("SQLite 执行失败: {0}")]
    Sqlite(#[source] rusqlite::Error),
}

impl RepositoryError {
    /// 写入引用实体失败时的错误归类（唯一约束 → DuplicateName）
    pub(crate) fn from_reference_insert(err: rusqlite::Error, kind: EntityKind, name: &str) -> Self {
        if constraint_code(&err) == Some(ffi::SQLITE_CONSTRAINT_UNIQUE) {
            return RepositoryError::DuplicateName {
                kind,
                name: name.to_string(),
            };
        }
        RepositoryError::from(err)
    }
}

/// 约束类错误的扩展错误码
fn constraint_code(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        if constraint_code(&err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
            return RepositoryError::DanglingReference(err.to_string());
        }
        RepositoryError::Sqlite(err)
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
