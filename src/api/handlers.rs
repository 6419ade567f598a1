use crate::error::EngineError;
use crate::extraction::{ExtractedInvoice, ExtractionClient};
use crate::models::{
    CreditReport, EligibilityResult, IngestionOutcome, NewInvoice, ReconciliationStatus,
};
use crate::service::{CreditOptimizer, IngestionService};
use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 入账响应体
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub outcome: IngestionOutcome,
}

/// 可抵扣判定响应体
#[derive(Debug, Serialize)]
pub struct EligibilityResponse {
    pub success: bool,
    pub result: EligibilityResult,
}

/// 对账响应体
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub status: ReconciliationStatus,
}

/// 识别响应体
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub fields: ExtractedInvoice,
}

#[derive(Debug, Deserialize)]
pub struct CreditQuery {
    pub user_id: Uuid,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 发票入账接口 (识别字段 → 保存 → 判定 → 对账 → 申报记录)
pub async fn ingest_invoice(
    State(service): State<Arc<IngestionService>>,
    Json(fields): Json<NewInvoice>,
) -> Result<Response, EngineError> {
    let outcome = service.ingest_invoice(fields).await?;
    let response = IngestResponse {
        success: true,
        message: format!(
            "Invoice {} ingested: eligibility {}, reconciliation {}",
            outcome.invoice.invoice_number,
            if outcome.eligibility.is_eligible { "eligible" } else { "not eligible" },
            outcome.reconciliation
        ),
        outcome,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// 按发票 ID 查可抵扣判定
pub async fn check_eligibility(
    State(service): State<Arc<IngestionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<EligibilityResponse>, EngineError> {
    let result = service.eligibility_for(id).await?;
    Ok(Json(EligibilityResponse {
        success: true,
        result,
    }))
}

/// 按发票 ID 触发对账
pub async fn reconcile_invoice(
    State(service): State<Arc<IngestionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReconcileResponse>, EngineError> {
    let status = service.reconcile_for(id).await?;
    Ok(Json(ReconcileResponse {
        success: true,
        status,
    }))
}

/// 抵扣优化报表
pub async fn credit_optimize(
    State(optimizer): State<Arc<CreditOptimizer>>,
    Query(query): Query<CreditQuery>,
) -> Result<Json<CreditReport>, EngineError> {
    let report = optimizer.optimization_report(query.user_id).await?;
    Ok(Json(report))
}

/// 上传票据文件并识别字段
pub async fn extract_invoice(
    State(client): State<Arc<ExtractionClient>>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, EngineError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| EngineError::Extraction(e.to_string()))?
    {
        if field.name() != Some("document") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("invoice.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| EngineError::Extraction(e.to_string()))?;

        let fields = client.extract(&file_name, bytes.to_vec()).await?;
        return Ok(Json(ExtractResponse {
            success: true,
            fields,
        }));
    }

    Err(EngineError::InvalidInput("document field is missing"))
}
