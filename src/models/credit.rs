use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 抵扣台账快照 (credit_utilization)
///
/// 只追加, 每次入账写入一行, 报表取最新一行。
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CreditUtilization {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// 申报记录统计行 (仅报表用的列)
#[derive(Debug, Clone, FromRow)]
pub struct ClaimStat {
    pub eligible_amount: BigDecimal,
    pub status: bool,
}

/// 抵扣优化建议
#[derive(Debug, Clone, Serialize)]
pub struct CreditSuggestion {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub severity: &'static str,
    pub message: String,
    pub action: &'static str,
}

/// 抵扣优化报表
#[derive(Debug, Clone, Serialize)]
pub struct CreditReport {
    pub credits: Option<CreditUtilization>,
    pub suggestions: Vec<CreditSuggestion>,
}
