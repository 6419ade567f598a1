use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// ITC 申报记录 (itc_claims)
///
/// 每次入账流程成功后生成一条, 之后不再更新。
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ItcClaim {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_number: String,
    pub supplier_gstin: String,
    /// 申报金额 = 建档时的发票总额
    pub amount: BigDecimal,
    /// 建档时固定为 0, 审核通过后另行更新
    pub eligible_amount: BigDecimal,
    /// 可抵扣判定结果
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
