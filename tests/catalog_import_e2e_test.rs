// ==========================================
// 目录导入端到端测试
// ==========================================
// 覆盖: 文件 → 规范化 → 去重解析 → 持久化 → 提交/回滚
// ==========================================

use food_catalog_import::domain::{
    EntityId, EntityKind, ImportReport, MissingReferencePolicy, NewProduct, Product,
    RawCatalogRow, ReferenceEntity,
};
use food_catalog_import::importer::{
    CatalogImporter, CatalogImporterImpl, FileParser, ImportError, ImportResult,
    IngredientSplitterImpl, RowError, RowStream, TextNormalizerImpl,
};
use food_catalog_import::repository::{
    CatalogRepository, RepositoryError, RepositoryResult, SqliteCatalogRepository,
};
use food_catalog_import::{logging, ImportConfig};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

mod test_helpers;
use test_helpers::{create_test_db, write_catalog_file};

// ==========================================
// FailingRepository - 第 N 次写产品时失败的仓储
// ==========================================
struct FailingRepository {
    inner: SqliteCatalogRepository,
    fail_on_insert: usize,
    inserts: AtomicUsize,
}

impl FailingRepository {
    fn new(inner: SqliteCatalogRepository, fail_on_insert: usize) -> Self {
        Self {
            inner,
            fail_on_insert,
            inserts: AtomicUsize::new(0),
        }
    }
}

impl CatalogRepository for FailingRepository {
    fn find_by_name(&self, kind: EntityKind, name: &str) -> RepositoryResult<Option<ReferenceEntity>> {
        self.inner.find_by_name(kind, name)
    }

    fn create_reference(&self, kind: EntityKind, name: &str) -> RepositoryResult<ReferenceEntity> {
        self.inner.create_reference(kind, name)
    }

    fn insert_product(&self, product: &NewProduct) -> RepositoryResult<EntityId> {
        let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on_insert {
            let full = rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_FULL);
            return Err(RepositoryError::from(rusqlite::Error::SqliteFailure(full, None)));
        }
        self.inner.insert_product(product)
    }

    fn begin_unit_of_work(&self) -> RepositoryResult<()> {
        self.inner.begin_unit_of_work()
    }

    fn commit(&self) -> RepositoryResult<()> {
        self.inner.commit()
    }

    fn rollback(&self) -> RepositoryResult<()> {
        self.inner.rollback()
    }

    fn insert_import_batch(&self, report: &ImportReport) -> RepositoryResult<()> {
        self.inner.insert_import_batch(report)
    }

    fn count(&self, kind: EntityKind) -> RepositoryResult<usize> {
        self.inner.count(kind)
    }

    fn count_products(&self) -> RepositoryResult<usize> {
        self.inner.count_products()
    }

    fn find_product(&self, id: EntityId) -> RepositoryResult<Option<Product>> {
        self.inner.find_product(id)
    }

    fn find_products_by_ingredient(&self, ingredient_id: EntityId) -> RepositoryResult<Vec<EntityId>> {
        self.inner.find_products_by_ingredient(ingredient_id)
    }
}

// ==========================================
// TruncatedFileParser - 读到第 N 行后 I/O 失败
// ==========================================
struct TruncatedFileParser {
    rows: Vec<&'static str>,
}

impl FileParser for TruncatedFileParser {
    fn open_rows(&self, _file_path: &Path) -> ImportResult<RowStream> {
        let mut items: Vec<ImportResult<RawCatalogRow>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let fields = line.split('|').map(str::to_string).collect();
                Ok(RawCatalogRow::new(idx + 2, fields))
            })
            .collect();
        items.push(Err(ImportError::FileReadError("连接被重置".to_string())));
        Ok(Box::new(items.into_iter()))
    }
}

fn sqlite_importer(
    db_path: &str,
    policy: MissingReferencePolicy,
) -> CatalogImporterImpl<SqliteCatalogRepository, ImportConfig> {
    let repo = SqliteCatalogRepository::new(db_path).expect("打开数据库失败");
    CatalogImporterImpl::with_defaults(repo, ImportConfig::with_db_path(db_path).policy(policy))
}

fn assert_catalog_empty<R: CatalogRepository>(repo: &R) {
    for kind in EntityKind::ALL {
        assert_eq!(repo.count(kind).unwrap(), 0, "{} 应为空", kind);
    }
    assert_eq!(repo.count_products().unwrap(), 0);
}

/// 两行乳品数据: 类别/品牌各一个，配料 milk 被两个产品共享
#[tokio::test]
async fn test_import_dairy_rows_builds_shared_graph() {
    logging::init_test();

    let (_db, db_path) = create_test_db().expect("创建测试数据库失败");
    let file = write_catalog_file(&[
        "Dairy|Acme|Whole Milk,|x|milk, sugar*",
        "Dairy|Acme|Cheese|x|milk;salt_",
    ])
    .unwrap();

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);
    let report = importer.import_file(file.path()).await.expect("导入失败");

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.imported_products, 2);
    assert_eq!(report.skipped_rows(), 0);
    assert_eq!(report.resolution.categories_created, 1);
    assert_eq!(report.resolution.brands_created, 1);
    assert_eq!(report.resolution.ingredients_created, 3);

    let repo = importer.repository();
    assert_eq!(repo.count(EntityKind::Category).unwrap(), 1);
    assert_eq!(repo.count(EntityKind::Brand).unwrap(), 1);
    assert_eq!(repo.count(EntityKind::Ingredient).unwrap(), 3);
    assert_eq!(repo.count_products().unwrap(), 2);

    let whole_milk = repo.find_product(EntityId(1)).unwrap().expect("产品 1 不存在");
    assert_eq!(whole_milk.name, "Whole Milk");
    assert_eq!(whole_milk.brand.name, "Acme");
    assert_eq!(whole_milk.category.name, "Dairy");
    assert_eq!(
        whole_milk.ingredient_names(),
        BTreeSet::from(["milk", "sugar"])
    );

    let cheese = repo.find_product(EntityId(2)).unwrap().expect("产品 2 不存在");
    assert_eq!(cheese.name, "Cheese");
    assert_eq!(cheese.brand.id, whole_milk.brand.id);
    assert_eq!(cheese.ingredient_names(), BTreeSet::from(["milk", "salt"]));

    let milk = repo
        .find_by_name(EntityKind::Ingredient, "milk")
        .unwrap()
        .expect("配料 milk 不存在");
    let mut users = repo.find_products_by_ingredient(milk.id).unwrap();
    users.sort();
    assert_eq!(users, vec![whole_milk.id, cheese.id]);
}

/// 字段不足的行被静默跳过，不产生任何实体
#[tokio::test]
async fn test_malformed_row_is_skipped() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let file = write_catalog_file(&["Dairy|Acme", "Snacks|Crunchy|Chips|x|potato,salt"]).unwrap();

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);
    let report = importer.import_file(file.path()).await.unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.malformed_rows, 1);
    assert_eq!(report.imported_products, 1);

    let repo = importer.repository();
    assert!(repo.find_by_name(EntityKind::Category, "Dairy").unwrap().is_none());
    assert!(repo.find_by_name(EntityKind::Brand, "Acme").unwrap().is_none());
    assert_eq!(repo.count(EntityKind::Category).unwrap(), 1);
}

/// 缺少配料列（3~4 个字段）的行导入为无配料产品
#[tokio::test]
async fn test_row_without_ingredient_column_has_no_ingredients() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let file = write_catalog_file(&["Water|Springs|Still Water", "Water|Springs|Sparkling|x"]).unwrap();

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);
    let report = importer.import_file(file.path()).await.unwrap();

    assert_eq!(report.imported_products, 2);
    let repo = importer.repository();
    assert_eq!(repo.count(EntityKind::Ingredient).unwrap(), 0);
    let product = repo.find_product(EntityId(1)).unwrap().unwrap();
    assert!(product.ingredients.is_empty());
}

/// 第 3 行持久化失败: 前两行的写入一并回滚
#[tokio::test]
async fn test_persistence_failure_rolls_back_whole_batch() {
    logging::init_test();

    let repo = FailingRepository::new(SqliteCatalogRepository::in_memory().unwrap(), 3);
    let importer = CatalogImporterImpl::with_defaults(repo, ImportConfig::with_db_path(":memory:"));
    let file = write_catalog_file(&[
        "Dairy|Acme|Whole Milk|x|milk",
        "Dairy|Acme|Cheese|x|milk,salt",
        "Bakery|Oven|Bread|x|flour,water",
        "Bakery|Oven|Bagel|x|flour",
        "Snacks|Crunchy|Chips|x|potato",
    ])
    .unwrap();

    let result = importer.import_file(file.path()).await;

    assert!(matches!(
        result,
        Err(ImportError::Repository(RepositoryError::Sqlite(_)))
    ));
    assert_catalog_empty(importer.repository());
}

/// Abort 策略: 品牌为空时整批回滚
#[tokio::test]
async fn test_abort_policy_on_missing_brand() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let file = write_catalog_file(&["Dairy|Acme|Cheese|x|milk", "Dairy||Yogurt|x|milk"]).unwrap();

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Abort);
    let result = importer.import_file(file.path()).await;

    match result {
        Err(ImportError::Row(RowError::MissingRequiredReference { row, .. })) => {
            assert_eq!(row, 3);
        }
        other => panic!("应为缺失引用错误，实际: {:?}", other),
    }
    assert_catalog_empty(importer.repository());
}

/// Skip 策略: 类别为空的行被记录，其余行照常提交
#[tokio::test]
async fn test_skip_policy_records_missing_category() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let file = write_catalog_file(&["|Acme|Mystery|x|milk", "Dairy|Acme|Cheese|x|milk"]).unwrap();

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);
    let report = importer.import_file(file.path()).await.unwrap();

    assert_eq!(report.imported_products, 1);
    assert_eq!(report.missing_reference_rows.len(), 1);
    assert_eq!(report.missing_reference_rows[0].row_number, 2);
    // 被拒绝的行不创建任何实体
    assert_eq!(importer.repository().count(EntityKind::Brand).unwrap(), 1);
    assert_eq!(importer.repository().count(EntityKind::Ingredient).unwrap(), 1);
}

/// 再次导入: 引用实体复用已持久化的记录，产品重复新建
#[tokio::test]
async fn test_reimport_reuses_persisted_entities() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let file = write_catalog_file(&[
        "Dairy|Acme|Whole Milk,|x|milk, sugar*",
        "Dairy|Acme|Cheese|x|milk;salt_",
    ])
    .unwrap();

    let first = sqlite_importer(&db_path, MissingReferencePolicy::Skip)
        .import_file(file.path())
        .await
        .unwrap();
    assert_eq!(first.resolution.ingredients_created, 3);

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);
    let second = importer.import_file(file.path()).await.unwrap();

    assert_ne!(first.batch_id, second.batch_id);
    assert_eq!(second.imported_products, 2);
    assert_eq!(second.resolution.brands_created, 0);
    assert_eq!(second.resolution.categories_created, 0);
    assert_eq!(second.resolution.ingredients_created, 0);
    assert!(second.resolution.storage_hits > 0);

    let repo = importer.repository();
    assert_eq!(repo.count(EntityKind::Ingredient).unwrap(), 3);
    assert_eq!(repo.count_products().unwrap(), 4);
}

/// 大小写不同的名称视为不同实体
#[tokio::test]
async fn test_names_are_case_sensitive() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let file = write_catalog_file(&["Dairy|Acme|Milk|x|Milk", "dairy|ACME|Milk|x|milk"]).unwrap();

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);
    let report = importer.import_file(file.path()).await.unwrap();

    assert_eq!(report.resolution.categories_created, 2);
    assert_eq!(report.resolution.brands_created, 2);
    assert_eq!(report.resolution.ingredients_created, 2);
}

/// 文件不存在: 返回 FileNotFound，数据库不受影响
#[tokio::test]
async fn test_missing_file_is_reported() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);

    let result = importer
        .import_file(std::path::Path::new("/nonexistent/catalog.csv"))
        .await;

    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    assert_catalog_empty(importer.repository());
}

/// 工作单元开启后读取源文件失败: 已写入的行一并回滚
#[tokio::test]
async fn test_read_failure_mid_file_rolls_back_whole_batch() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    let repo = SqliteCatalogRepository::new(&db_path).unwrap();
    let parser = TruncatedFileParser {
        rows: vec!["Dairy|Acme|Whole Milk|x|milk", "Dairy|Acme|Cheese|x|milk,salt"],
    };
    let importer = CatalogImporterImpl::new(
        repo,
        ImportConfig::with_db_path(db_path.as_str()),
        Box::new(parser),
        Box::new(TextNormalizerImpl),
        Box::new(IngredientSplitterImpl),
    );

    let result = importer.import_file(Path::new("catalog.csv")).await;

    assert!(matches!(result, Err(ImportError::FileReadError(_))));
    assert_catalog_empty(importer.repository());

    // 回滚后连接回到可用状态，可再次导入
    let file = write_catalog_file(&["Dairy|Acme|Cheese|x|milk"]).unwrap();
    let retry = sqlite_importer(&db_path, MissingReferencePolicy::Skip)
        .import_file(file.path())
        .await
        .unwrap();
    assert_eq!(retry.imported_products, 1);
}

/// 空行不计入数据行，但跳过行的行号仍为文件物理行号
#[tokio::test]
async fn test_skipped_row_number_is_physical_line_after_blank_lines() {
    logging::init_test();

    let (_db, db_path) = create_test_db().unwrap();
    // 行 1 表头，行 2 Cheese，行 3 空，行 4 缺品牌
    let file = write_catalog_file(&["Dairy|Acme|Cheese|x|milk", "", "Dairy||Butter|x|cream"]).unwrap();

    let importer = sqlite_importer(&db_path, MissingReferencePolicy::Skip);
    let report = importer.import_file(file.path()).await.unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.imported_products, 1);
    assert_eq!(report.missing_reference_rows.len(), 1);
    assert_eq!(report.missing_reference_rows[0].row_number, 4);
    assert!(report.missing_reference_rows[0].reason.contains("行 4"));
}
