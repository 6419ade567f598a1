use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Invoice, ItcClaim};

/// 对账状态
///
/// `Pending` 仅作为发票建档时的初始值; 判定结果只会是后三种。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationStatus {
    Pending,
    /// 有参照记录且总额、开票日期都一致
    Matched,
    /// 有参照记录但总额或日期不一致
    Partial,
    /// 无参照记录
    Unmatched,
}

impl ReconciliationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconciliationStatus::Pending => "PENDING",
            ReconciliationStatus::Matched => "MATCHED",
            ReconciliationStatus::Partial => "PARTIAL",
            ReconciliationStatus::Unmatched => "UNMATCHED",
        }
    }
}

impl fmt::Display for ReconciliationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 核验状态 (两态)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Verified,
    NotFound,
}

/// 可抵扣判定结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub is_eligible: bool,
    pub verification_status: VerificationStatus,
    /// 可抵扣额 = 发票 cgst + sgst + igst, 不可抵扣时为 0
    pub eligible_amount: BigDecimal,
    /// 不可抵扣原因, 可多条
    pub reasons: Vec<String>,
}

/// 入账流程产出
#[derive(Debug, Clone, Serialize)]
pub struct IngestionOutcome {
    pub invoice: Invoice,
    pub eligibility: EligibilityResult,
    pub reconciliation: ReconciliationStatus,
    pub claim: ItcClaim,
}
