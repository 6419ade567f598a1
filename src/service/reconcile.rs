use crate::db::queries;
use crate::error::EngineError;
use crate::models::{Gstr2bEntry, Gstr2bMatch, Invoice, ReconciliationStatus};
use crate::service::Gstr2bMatcher;
use chrono::Utc;
use sqlx::PgPool;

/// 对账服务
pub struct ReconcileService {
    pool: PgPool,
    matcher: Gstr2bMatcher,
}

/// 全匹配 = 总额精确相等且开票日期相等 (无容差, 无舍入)
pub fn is_full_match(invoice: &Invoice, entry: &Gstr2bEntry) -> bool {
    entry.total_amount == invoice.total_amount && entry.invoice_date == invoice.invoice_date
}

/// 纯分类: 有参照记录时的三态收敛到 MATCHED / PARTIAL
pub fn classify(invoice: &Invoice, entry: &Gstr2bEntry) -> ReconciliationStatus {
    if is_full_match(invoice, entry) {
        ReconciliationStatus::Matched
    } else {
        ReconciliationStatus::Partial
    }
}

impl ReconcileService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            matcher: Gstr2bMatcher::new(pool.clone()),
            pool,
        }
    }

    /// 对账并回写发票
    ///
    /// 有参照记录时把对账状态和全匹配结果写回发票行 (itc_eligible 会被
    /// 全匹配结果覆盖, 与可抵扣判定是两套口径, 见 DESIGN.md);
    /// 无参照记录时返回 UNMATCHED 且不落库。
    /// 输入不变时重复执行结果一致, 无累积副作用。
    pub async fn reconcile_invoice(
        &self,
        invoice: &Invoice,
    ) -> Result<ReconciliationStatus, EngineError> {
        let reference = self
            .matcher
            .find_reference(&invoice.invoice_number, &invoice.supplier_gstin)
            .await?;

        let Gstr2bMatch::Found(entry) = reference else {
            return Ok(ReconciliationStatus::Unmatched);
        };

        let full_match = is_full_match(invoice, &entry);
        let status = classify(invoice, &entry);

        let rows = queries::update_reconciliation(
            &self.pool,
            &invoice.invoice_number,
            &invoice.supplier_gstin,
            status.as_str(),
            full_match,
            Utc::now(),
        )
        .await
        .map_err(|e| EngineError::PersistenceFailed {
            step: "update_reconciliation",
            source: e,
        })?;

        tracing::info!(
            "Invoice {} reconciled: status={}, rows_updated={}",
            invoice.invoice_number,
            status,
            rows
        );

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn invoice(total: &str, date: (i32, u32, u32)) -> Invoice {
        let now = Utc::now();
        Invoice {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            invoice_number: "INV-1".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            buyer_gstin: "29AAAAA0000A1Z5".to_string(),
            supplier_gstin: "GSTIN1".to_string(),
            cgst: BigDecimal::from(90),
            sgst: BigDecimal::from(90),
            igst: BigDecimal::from(0),
            total_amount: BigDecimal::from_str(total).unwrap(),
            reconciliation_status: "PENDING".to_string(),
            itc_eligible: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn entry(total: &str, date: (i32, u32, u32)) -> Gstr2bEntry {
        Gstr2bEntry {
            invoice_number: "INV-1".to_string(),
            supplier_gstin: "GSTIN1".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            cgst: BigDecimal::from(90),
            sgst: BigDecimal::from(90),
            igst: BigDecimal::from(0),
            total_amount: BigDecimal::from_str(total).unwrap(),
        }
    }

    #[test]
    fn equal_amount_and_date_is_matched() {
        // 场景 A
        let inv = invoice("1000", (2024, 1, 1));
        let ref_entry = entry("1000", (2024, 1, 1));

        assert!(is_full_match(&inv, &ref_entry));
        assert_eq!(classify(&inv, &ref_entry), ReconciliationStatus::Matched);
    }

    #[test]
    fn date_mismatch_is_partial() {
        // 场景 B: 金额一致但日期差一天
        let inv = invoice("1000", (2024, 1, 1));
        let ref_entry = entry("1000", (2024, 1, 2));

        assert!(!is_full_match(&inv, &ref_entry));
        assert_eq!(classify(&inv, &ref_entry), ReconciliationStatus::Partial);
    }

    #[test]
    fn amount_mismatch_is_partial() {
        let inv = invoice("1000", (2024, 1, 1));
        let ref_entry = entry("999.99", (2024, 1, 1));

        assert_eq!(classify(&inv, &ref_entry), ReconciliationStatus::Partial);
    }

    #[test]
    fn amount_comparison_has_no_tolerance() {
        // 差 0.01 也算不匹配
        let inv = invoice("1000.00", (2024, 1, 1));
        let ref_entry = entry("1000.01", (2024, 1, 1));

        assert_eq!(classify(&inv, &ref_entry), ReconciliationStatus::Partial);
    }

    #[test]
    fn trailing_zeros_do_not_break_equality() {
        // BigDecimal 按数值比较, 1000 与 1000.00 相等
        let inv = invoice("1000", (2024, 1, 1));
        let ref_entry = entry("1000.00", (2024, 1, 1));

        assert_eq!(classify(&inv, &ref_entry), ReconciliationStatus::Matched);
    }

    #[test]
    fn classification_is_deterministic() {
        let inv = invoice("1000", (2024, 1, 1));
        let ref_entry = entry("1000", (2024, 1, 2));

        let first = classify(&inv, &ref_entry);
        let second = classify(&inv, &ref_entry);
        assert_eq!(first, second);
    }
}
