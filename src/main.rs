// ==========================================
// 产品目录导入 - 命令行入口
// ==========================================
// 用法:
//   food-catalog-import [FILE] [DB_PATH]
//
// 参数缺省时取环境变量:
//   FOOD_CATALOG_FILE / FOOD_CATALOG_DB_PATH
//   FOOD_CATALOG_DELIMITER / FOOD_CATALOG_ON_MISSING_REFERENCE
//   FOOD_CATALOG_LOG_FORMAT=json 时输出 JSON 行日志
// ==========================================

use anyhow::{bail, Context};
use food_catalog_import::api::ImportApi;
use food_catalog_import::config::ImportConfig;
use food_catalog_import::logging::{self, LogFormat};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(LogFormat::from_env());

    tracing::info!("==================================================");
    tracing::info!("{}", food_catalog_import::APP_NAME);
    tracing::info!("系统版本: {}", food_catalog_import::VERSION);
    tracing::info!("==================================================");

    let mut config = ImportConfig::from_env().context("读取导入配置失败")?;

    let mut args = std::env::args().skip(1);
    if let Some(file) = args.next() {
        config.file_path = Some(PathBuf::from(file));
    }
    if let Some(db_path) = args.next() {
        config.db_path = db_path;
    }

    let Some(file_path) = config.file_path.clone() else {
        bail!("未指定源文件（参数 FILE 或环境变量 FOOD_CATALOG_FILE）");
    };

    tracing::info!(
        db_path = %config.db_path,
        file = %file_path.display(),
        policy = %config.missing_reference_policy,
        "导入配置已加载"
    );

    let api = ImportApi::new(config);
    let response = api
        .import_catalog(&file_path.to_string_lossy())
        .await
        .context("目录导入失败，批次已回滚")?;

    let counts = api.catalog_counts().context("读取目录统计失败")?;
    tracing::info!(
        brands = counts.brands,
        categories = counts.categories,
        ingredients = counts.ingredients,
        products = counts.products,
        "目录当前规模"
    );

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
