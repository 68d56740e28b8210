// ==========================================
// 产品目录导入 - 导入层
// ==========================================
// 职责: 分隔符文件 → 品牌/类别/产品/配料 关系图
// 核心: 文本规范化 / 配料拆分 / 引用解析（去重） / 单行导入
// ==========================================

// 模块声明
pub mod catalog_importer_impl;
pub mod catalog_importer_trait;
pub mod error;
pub mod file_parser;
pub mod ingredient_splitter;
pub mod reference_resolver;
pub mod row_importer;
pub mod text_normalizer;

// 重导出核心类型
pub use catalog_importer_impl::CatalogImporterImpl;
pub use error::{ImportError, ImportResult, ReferenceField, RowError};
pub use file_parser::DelimitedFileParser;
pub use ingredient_splitter::IngredientSplitter as IngredientSplitterImpl;
pub use reference_resolver::ReferenceResolver;
pub use row_importer::RowImporter;
pub use text_normalizer::TextNormalizer as TextNormalizerImpl;

// 重导出 Trait 接口
pub use catalog_importer_trait::{
    CatalogImporter, FileParser, IngredientSplitter, RowStream, TextNormalizer,
};
