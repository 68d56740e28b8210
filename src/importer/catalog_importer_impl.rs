// ==========================================
// 产品目录导入 - 目录导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到数据库
// 流程: 解析 → 开启工作单元 → 逐行导入 → 批次报告 → 提交
// 红线: 整个文件为一个工作单元，任一致命错误回滚全部（无部分提交）
// 红线: 严格按文件顺序单线程处理，“首次出现”决定规范实体
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{ImportReport, MissingReferencePolicy, SkippedRow};
use crate::importer::catalog_importer_trait::{
    CatalogImporter, FileParser, IngredientSplitter, RowStream, TextNormalizer,
};
use crate::importer::error::{ImportError, ImportResult, RowError};
use crate::importer::file_parser::DelimitedFileParser;
use crate::importer::ingredient_splitter::IngredientSplitter as IngredientSplitterImpl;
use crate::importer::row_importer::RowImporter;
use crate::importer::text_normalizer::TextNormalizer as TextNormalizerImpl;
use crate::repository::CatalogRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// CatalogImporterImpl - 目录导入器实现
// ==========================================
pub struct CatalogImporterImpl<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    repo: R,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    normalizer: Box<dyn TextNormalizer>,
    splitter: Box<dyn IngredientSplitter>,
}

impl<R, C> CatalogImporterImpl<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    /// 创建新的 CatalogImporter 实例
    ///
    /// # 参数
    /// - repo: 目录仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - normalizer: 文本规范化器
    /// - splitter: 配料拆分器
    pub fn new(
        repo: R,
        config: C,
        file_parser: Box<dyn FileParser>,
        normalizer: Box<dyn TextNormalizer>,
        splitter: Box<dyn IngredientSplitter>,
    ) -> Self {
        Self {
            repo,
            config,
            file_parser,
            normalizer,
            splitter,
        }
    }

    /// 使用默认组件（分隔符取自配置）
    pub fn with_defaults(repo: R, config: C) -> Self {
        let delimiter = config.field_delimiter();
        Self::new(
            repo,
            config,
            Box::new(DelimitedFileParser::new(delimiter)),
            Box::new(TextNormalizerImpl),
            Box::new(IngredientSplitterImpl),
        )
    }

    /// 数据访问层（只读查询）
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// 同步执行一次完整导入
    pub fn run_import(&self, file_path: &Path) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let mut report = ImportReport::new(
            Uuid::new_v4().to_string(),
            file_path.display().to_string(),
            Utc::now(),
        );
        info!(batch_id = %report.batch_id, file_path = %report.file_path, "开始导入目录数据");

        // === 步骤 1: 打开文件 ===
        let rows = self.file_parser.open_rows(file_path).map_err(|e| {
            error!(error = %e, "文件打开失败");
            e
        })?;

        // === 步骤 2: 开启工作单元 ===
        self.repo.begin_unit_of_work()?;

        // === 步骤 3: 逐行导入 ===
        if let Err(e) = self.process_rows(rows, &mut report) {
            self.abort(&e);
            return Err(e);
        }

        // === 步骤 4: 批次报告 + 提交 ===
        report.finished_at = Some(Utc::now());
        report.elapsed_ms = u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX);

        let committed = self
            .repo
            .insert_import_batch(&report)
            .and_then(|_| self.repo.commit())
            .map_err(ImportError::from);
        if let Err(e) = committed {
            self.abort(&e);
            return Err(e);
        }

        info!(
            batch_id = %report.batch_id,
            total = report.total_rows,
            imported = report.imported_products,
            malformed = report.malformed_rows,
            missing_reference = report.missing_reference_rows.len(),
            brands_created = report.resolution.brands_created,
            categories_created = report.resolution.categories_created,
            ingredients_created = report.resolution.ingredients_created,
            elapsed_ms = report.elapsed_ms,
            "目录数据导入完成"
        );

        Ok(report)
    }

    /// 逐行处理（按文件顺序）
    fn process_rows(&self, rows: RowStream, report: &mut ImportReport) -> ImportResult<()> {
        let policy = self.config.missing_reference_policy();
        let mut row_importer =
            RowImporter::new(&self.repo, self.normalizer.as_ref(), self.splitter.as_ref());

        for row in rows {
            // 读取失败为致命错误
            let row = row?;
            report.total_rows += 1;

            match row_importer.import_row(&row) {
                Ok(_) => report.imported_products += 1,
                Err(ImportError::Row(RowError::MalformedRow { field_count, .. })) => {
                    debug!(row = row.row_number, field_count, "字段不足，跳过");
                    report.malformed_rows += 1;
                }
                Err(ImportError::Row(err @ RowError::MissingRequiredReference { .. })) => {
                    match policy {
                        MissingReferencePolicy::Skip => {
                            warn!(row = row.row_number, error = %err, "必填引用缺失，跳过该行");
                            report.missing_reference_rows.push(SkippedRow {
                                row_number: row.row_number,
                                reason: err.to_string(),
                            });
                        }
                        MissingReferencePolicy::Abort => return Err(err.into()),
                    }
                }
                Err(e) => return Err(e),
            }
        }

        report.resolution = row_importer.finish();
        Ok(())
    }

    /// 中止批次并回滚
    fn abort(&self, cause: &ImportError) {
        error!(error = %cause, "导入失败，回滚整个批次");
        if let Err(e) = self.repo.rollback() {
            error!(error = %e, "回滚失败");
        }
    }
}

#[async_trait]
impl<R, C> CatalogImporter for CatalogImporterImpl<R, C>
where
    R: CatalogRepository,
    C: ImportConfigReader,
{
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportReport> {
        self.run_import(file_path)
    }
}
