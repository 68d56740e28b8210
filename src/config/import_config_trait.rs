// ==========================================
// 产品目录导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::MissingReferencePolicy;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ImportConfig（环境变量）
pub trait ImportConfigReader: Send + Sync {
    /// 获取源文件字段分隔符
    ///
    /// # 默认值
    /// - b'|'
    fn field_delimiter(&self) -> u8;

    /// 获取品牌/类别为空时的处理策略
    ///
    /// # 默认值
    /// - MissingReferencePolicy::Skip
    fn missing_reference_policy(&self) -> MissingReferencePolicy;
}
