// ==========================================
// 产品目录导入 - 目录仓储实现
// ==========================================
// 职责: 实现目录数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// 约束: 所有查询使用参数化（表名来自固定枚举）
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::{
    EntityId, EntityKind, ImportReport, NewProduct, Product, ReferenceEntity,
};
use crate::repository::catalog_repo::CatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

// ==========================================
// SqliteCatalogRepository
// ==========================================
pub struct SqliteCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogRepository {
    /// 打开数据库文件并确保 schema 存在
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 内存数据库（测试/演练用）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;
        configure_sqlite_connection(&conn)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockPoisoned(e.to_string()))
    }

    /// 读取产品关联的引用实体（按 name 排序）
    fn load_linked(
        conn: &Connection,
        kind: EntityKind,
        product_id: EntityId,
    ) -> RepositoryResult<Vec<ReferenceEntity>> {
        let table = kind.table_name();
        let sql = format!(
            "SELECT r.id, r.name FROM product_{table} l \
             JOIN {table} r ON r.id = l.{table}_id \
             WHERE l.product_id = ?1 ORDER BY r.name"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![product_id.value()], |row| {
            Ok(ReferenceEntity {
                kind,
                id: EntityId(row.get(0)?),
                name: row.get(1)?,
            })
        })?;

        let mut entities = Vec::new();
        for row in rows {
            entities.push(row?);
        }
        Ok(entities)
    }
}

impl CatalogRepository for SqliteCatalogRepository {
    fn find_by_name(&self, kind: EntityKind, name: &str) -> RepositoryResult<Option<ReferenceEntity>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT id, name FROM {} WHERE name = ?1", kind.table_name());

        let entity = conn
            .query_row(&sql, params![name], |row| {
                Ok(ReferenceEntity {
                    kind,
                    id: EntityId(row.get(0)?),
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(entity)
    }

    fn create_reference(&self, kind: EntityKind, name: &str) -> RepositoryResult<ReferenceEntity> {
        if name.trim().is_empty() {
            return Err(RepositoryError::EmptyName { kind });
        }

        let conn = self.get_conn()?;
        let sql = format!("INSERT INTO {} (name) VALUES (?1)", kind.table_name());
        conn.execute(&sql, params![name])
            .map_err(|e| RepositoryError::from_reference_insert(e, kind, name))?;
        let id = EntityId(conn.last_insert_rowid());

        debug!(kind = %kind, id = %id, name = %name, "引用实体已写入");
        Ok(ReferenceEntity {
            kind,
            id,
            name: name.to_string(),
        })
    }

    fn insert_product(&self, product: &NewProduct) -> RepositoryResult<EntityId> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO product (name, brand_id, category_id) VALUES (?1, ?2, ?3)",
            params![
                product.name,
                product.brand_id.value(),
                product.category_id.value()
            ],
        )?;
        let product_id = EntityId(conn.last_insert_rowid());

        {
            let mut stmt = conn.prepare(
                "INSERT INTO product_ingredient (product_id, ingredient_id) VALUES (?1, ?2)",
            )?;
            for ingredient_id in &product.ingredient_ids {
                stmt.execute(params![product_id.value(), ingredient_id.value()])?;
            }
        }

        {
            let mut stmt = conn.prepare(
                "INSERT INTO product_allergen (product_id, allergen_id) VALUES (?1, ?2)",
            )?;
            for allergen_id in &product.allergen_ids {
                stmt.execute(params![product_id.value(), allergen_id.value()])?;
            }
        }

        Ok(product_id)
    }

    fn begin_unit_of_work(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        if !conn.is_autocommit() {
            return Err(RepositoryError::UnitOfWork(
                "已存在进行中的工作单元".to_string(),
            ));
        }
        conn.execute_batch("BEGIN IMMEDIATE")
            .map_err(|e| RepositoryError::UnitOfWork(e.to_string()))?;
        Ok(())
    }

    fn commit(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        if conn.is_autocommit() {
            return Err(RepositoryError::UnitOfWork(
                "无进行中的工作单元可提交".to_string(),
            ));
        }
        conn.execute_batch("COMMIT")
            .map_err(|e| RepositoryError::UnitOfWork(e.to_string()))?;
        Ok(())
    }

    fn rollback(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        if conn.is_autocommit() {
            warn!("回滚请求时无进行中的工作单元");
            return Ok(());
        }
        conn.execute_batch("ROLLBACK")
            .map_err(|e| RepositoryError::UnitOfWork(e.to_string()))?;
        Ok(())
    }

    fn insert_import_batch(&self, report: &ImportReport) -> RepositoryResult<()> {
        let report_json = serde_json::to_string(report)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO import_batch (
                batch_id, file_path, total_rows, imported_products, skipped_rows,
                brands_created, categories_created, ingredients_created,
                started_at, elapsed_ms, report_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                report.batch_id,
                report.file_path,
                report.total_rows as i64,
                report.imported_products as i64,
                report.skipped_rows() as i64,
                report.resolution.brands_created as i64,
                report.resolution.categories_created as i64,
                report.resolution.ingredients_created as i64,
                report.started_at.to_rfc3339(),
                report.elapsed_ms as i64,
                report_json,
            ],
        )?;
        Ok(())
    }

    fn count(&self, kind: EntityKind) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn count_products(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM product", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn find_product(&self, id: EntityId) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;

        let header = conn
            .query_row(
                r#"
                SELECT p.id, p.name, b.id, b.name, c.id, c.name
                FROM product p
                JOIN brand b ON b.id = p.brand_id
                JOIN category c ON c.id = p.category_id
                WHERE p.id = ?1
                "#,
                params![id.value()],
                |row| {
                    Ok((
                        EntityId(row.get(0)?),
                        row.get::<_, String>(1)?,
                        ReferenceEntity {
                            kind: EntityKind::Brand,
                            id: EntityId(row.get(2)?),
                            name: row.get(3)?,
                        },
                        ReferenceEntity {
                            kind: EntityKind::Category,
                            id: EntityId(row.get(4)?),
                            name: row.get(5)?,
                        },
                    ))
                },
            )
            .optional()?;

        let Some((product_id, name, brand, category)) = header else {
            return Ok(None);
        };

        let ingredients = Self::load_linked(&conn, EntityKind::Ingredient, product_id)?;
        let allergens = Self::load_linked(&conn, EntityKind::Allergen, product_id)?;

        Ok(Some(Product {
            id: product_id,
            name,
            brand,
            category,
            ingredients,
            allergens,
        }))
    }

    fn find_products_by_ingredient(&self, ingredient_id: EntityId) -> RepositoryResult<Vec<EntityId>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT product_id FROM product_ingredient WHERE ingredient_id = ?1 ORDER BY product_id",
        )?;
        let rows = stmt.query_map(params![ingredient_id.value()], |row| {
            Ok(EntityId(row.get(0)?))
        })?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }
}
