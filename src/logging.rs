// ==========================================
// 产品目录导入 - 日志初始化
// ==========================================
// RUST_LOG 优先；未设置时本 crate 为 info，依赖库仅输出 warn
// FOOD_CATALOG_LOG_FORMAT=json 时输出 JSON 行（批处理采集用）
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const ENV_LOG_FORMAT: &str = "FOOD_CATALOG_LOG_FORMAT";

/// 默认过滤规则
pub const DEFAULT_FILTER: &str = "warn,food_catalog_import=info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// 解析格式名（大小写不敏感），未知值回退为 Text
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_FORMAT)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 初始化命令行日志
///
/// ```no_run
/// use food_catalog_import::logging::{self, LogFormat};
/// logging::init(LogFormat::from_env());
/// ```
pub fn init(format: LogFormat) {
    let builder = fmt().with_env_filter(env_filter()).with_target(true);
    match format {
        LogFormat::Text => builder.with_line_number(true).init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

/// 测试日志：debug 级别写入测试输出，重复调用安全
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("food_catalog_import=debug"))
        .with_test_writer()
        .try_init();
}
