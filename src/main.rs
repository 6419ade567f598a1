use axum::{
    routing::{get, post},
    Router,
};
use gst_itc_rust::{api, create_pool, AppConfig, CreditOptimizer, ExtractionClient, IngestionService};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::from_env();
    info!("Starting server on {}:{}", config.server.host, config.server.port);

    // 创建数据库连接池
    let pool = create_pool(&config.database.url).await?;
    info!("Database pool created");

    // 服务实例
    let ingestion = Arc::new(IngestionService::new(pool.clone()));
    let credit = Arc::new(CreditOptimizer::new(pool));
    let extraction = Arc::new(ExtractionClient::new(&config.extraction));

    // 发票相关路由 (入账 / 判定 / 对账)
    let invoice_routes = Router::new()
        .route("/api/invoices/ingest", post(api::ingest_invoice))
        .route("/api/invoices/:id/eligibility", get(api::check_eligibility))
        .route("/api/invoices/:id/reconcile", post(api::reconcile_invoice))
        .with_state(ingestion);

    // 报表路由
    let credit_routes = Router::new()
        .route("/api/credits/optimize", get(api::credit_optimize))
        .with_state(credit);

    // 票据识别路由
    let extract_routes = Router::new()
        .route("/api/extract", post(api::extract_invoice))
        .with_state(extraction);

    let app = Router::new()
        .route("/health", get(api::health_check))
        .merge(invoice_routes)
        .merge(credit_routes)
        .merge(extract_routes)
        .layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/invoices/ingest           - ingest extracted invoice fields");
    info!("  GET  /api/invoices/:id/eligibility  - ITC eligibility check");
    info!("  POST /api/invoices/:id/reconcile    - GSTR-2B reconciliation");
    info!("  GET  /api/credits/optimize          - credit optimization report");
    info!("  POST /api/extract                   - document field extraction");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
