use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// 进项发票主表 (invoices)
///
/// `invoice_number + supplier_gstin` 是对账用的自然键, 不做唯一约束,
/// 重复上传的发票各自独立判定。
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub buyer_gstin: String,
    pub supplier_gstin: String,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub total_amount: BigDecimal,
    /// PENDING / MATCHED / PARTIAL / UNMATCHED, 见 `ReconciliationStatus`
    pub reconciliation_status: String,
    pub itc_eligible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 入账请求字段 (识别结果或人工录入)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub user_id: Uuid,
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub buyer_gstin: String,
    pub supplier_gstin: String,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub total_amount: BigDecimal,
}
