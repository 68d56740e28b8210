// ==========================================
// 产品目录导入 - 引用解析器
// ==========================================
// 职责: (种类, 名称) → 唯一规范实体；首次出现时创建
// 红线: 同一批次内相同 (种类, 名称) 必须解析到同一实体，
//       不依赖“创建后立即回读存储”的可见性
// 缓存: 批次级身份缓存，命中/未命中两条路径都写入；批次结束即丢弃
// ==========================================

use crate::domain::{EntityId, EntityKind, ResolutionStats};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::CatalogRepository;
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// ReferenceResolver
// ==========================================
// 并发说明: 缓存仅由导入线程修改；若改为多 worker，
// 需将 cache 换成加锁结构或预先分配规范 ID
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    // 按种类分桶，查找时可直接以 &str 借用
    cache: HashMap<EntityKind, HashMap<String, EntityId>>,
    stats: ResolutionStats,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析引用实体
    ///
    /// # 参数
    /// - repo: 持久化协作方（参与当前工作单元）
    /// - kind: 引用实体种类
    /// - name: 已由调用方清洗过的名称（此处不再清洗）
    ///
    /// # 返回
    /// - Ok(EntityId): 规范实体 ID（可能尚未提交）
    /// - Err(EmptyReferenceName): 名称为空或全空白（调用方错误）
    /// - Err(Repository): 查找/创建失败
    pub fn resolve<R>(&mut self, repo: &R, kind: EntityKind, name: &str) -> ImportResult<EntityId>
    where
        R: CatalogRepository + ?Sized,
    {
        if name.trim().is_empty() {
            return Err(ImportError::EmptyReferenceName { kind });
        }

        // 1. 批次缓存
        if let Some(id) = self.cache.get(&kind).and_then(|names| names.get(name)) {
            self.stats.cache_hits += 1;
            return Ok(*id);
        }

        // 2. 已持久化实体
        let id = match repo.find_by_name(kind, name)? {
            Some(existing) => {
                self.stats.storage_hits += 1;
                debug!(kind = %kind, id = %existing.id, name = %name, "命中已有引用实体");
                existing.id
            }
            // 3. 首次出现，创建
            None => {
                let created = repo.create_reference(kind, name)?;
                self.stats.record_created(kind);
                debug!(kind = %kind, id = %created.id, name = %name, "新建引用实体");
                created.id
            }
        };

        self.cache.entry(kind).or_default().insert(name.to_string(), id);
        Ok(id)
    }

    /// 已缓存的 (种类, 名称) 数量
    pub fn cached_len(&self) -> usize {
        self.cache.values().map(HashMap::len).sum()
    }

    /// 解析统计
    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    /// 结束批次，丢弃缓存并返回统计
    pub fn finish(self) -> ResolutionStats {
        self.stats
    }
}
