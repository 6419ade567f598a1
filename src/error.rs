use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// 决策引擎错误分类
///
/// GSTR-2B 中查无记录不是错误, 而是正常的判定输入 (`Gstr2bMatch::NotFound`);
/// 这里的 `NotFound` 仅指按 ID 查发票不存在。
#[derive(Debug, Error)]
pub enum EngineError {
    /// 调用方缺少必填的识别字段, 不重试
    #[error("invalid invoice data: {0}")]
    InvalidInput(&'static str),

    /// 存储读取失败 (临时性, 调用方可整体重试)
    #[error("store lookup failed: {0}")]
    LookupFailed(#[source] sqlx::Error),

    /// 存储写入失败, 携带出错步骤名
    #[error("persistence failed at step {step}: {source}")]
    PersistenceFailed {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// 按 ID 查发票不存在
    #[error("invoice {0} not found")]
    NotFound(Uuid),

    /// 票据识别服务调用失败
    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::LookupFailed(_) | Self::PersistenceFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Extraction(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));
        (self.status_code(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_error_names_the_step() {
        let err = EngineError::PersistenceFailed {
            step: "insert_claim",
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(err.to_string().contains("insert_claim"));
    }

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            EngineError::InvalidInput("invoice_number is empty").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EngineError::NotFound(Uuid::nil()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EngineError::Extraction("job failed".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}
