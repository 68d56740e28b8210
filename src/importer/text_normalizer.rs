// ==========================================
// 产品目录导入 - 文本规范化实现
// ==========================================
// 职责: 去除编码噪声字符 / 去除悬挂的末尾分隔符
// ==========================================

use crate::importer::catalog_importer_trait::TextNormalizer as TextNormalizerTrait;

/// 源编码遗留的噪声字符（非语义分隔符）
pub const NOISE_CHARS: [char; 2] = ['*', '_'];

pub struct TextNormalizer;

impl TextNormalizerTrait for TextNormalizer {
    fn normalize(&self, raw: &str) -> String {
        let cleaned: String = raw.chars().filter(|c| !NOISE_CHARS.contains(c)).collect();

        // 连续的末尾句点一并去除，保证幂等；内部缩写不受影响
        cleaned.trim_end_matches('.').to_string()
    }

    fn strip_trailing_comma(&self, raw: &str) -> String {
        raw.trim_end_matches(',').to_string()
    }
}
