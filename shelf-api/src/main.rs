use std::sync::Arc;

use shelf_api::infrastructure::database::mysql::init_mysql;
use shelf_api::infrastructure::database::product_store::MySqlProductStore;
use shelf_api::logging::init_logging;
use shelf_api::server::shutdown_signal;
use shelf_api::{create_app, AppResult, AppState, Config};

#[tokio::main]
async fn main() -> AppResult<()> {
    // 加载环境变量
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    init_logging(&config.logging)?;

    tracing::info!("Starting shelf-api");

    // 初始化数据库连接，数据库不可达时直接退出而不是继续监听
    let pool = init_mysql(&config).await?;
    let store = MySqlProductStore::new(pool);
    store.ensure_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to prepare products table");
        shelf_api::AppError::Internal(e.to_string())
    })?;

    let app = create_app(AppState::new(Arc::new(store)));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on {}", &addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
