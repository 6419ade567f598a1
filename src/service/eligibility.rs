use crate::error::EngineError;
use crate::models::{EligibilityResult, Gstr2bMatch, Invoice, VerificationStatus};
use crate::service::Gstr2bMatcher;
use bigdecimal::{BigDecimal, Zero};
use sqlx::PgPool;

/// 可抵扣判定服务
pub struct EligibilityService {
    matcher: Gstr2bMatcher,
}

/// 纯判定: GSTR-2B 中有参照记录即可抵扣
///
/// 可抵扣额取自发票本身 (cgst + sgst + igst), 不取参照记录, 不做舍入。
pub fn evaluate(invoice: &Invoice, reference: &Gstr2bMatch) -> EligibilityResult {
    match reference {
        Gstr2bMatch::Found(_) => EligibilityResult {
            is_eligible: true,
            verification_status: VerificationStatus::Verified,
            eligible_amount: &invoice.cgst + &invoice.sgst + &invoice.igst,
            reasons: Vec::new(),
        },
        Gstr2bMatch::NotFound => EligibilityResult {
            is_eligible: false,
            verification_status: VerificationStatus::NotFound,
            eligible_amount: BigDecimal::zero(),
            reasons: vec!["Invoice not found in GSTR-2B".to_string()],
        },
    }
}

impl EligibilityService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            matcher: Gstr2bMatcher::new(pool),
        }
    }

    /// 查参照记录并判定; `LookupFailed` 原样向上传递
    pub async fn check_itc_eligibility(
        &self,
        invoice: &Invoice,
    ) -> Result<EligibilityResult, EngineError> {
        let reference = self
            .matcher
            .find_reference(&invoice.invoice_number, &invoice.supplier_gstin)
            .await?;

        Ok(evaluate(invoice, &reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gstr2bEntry;
    use chrono::{NaiveDate, Utc};
    use std::str::FromStr;
    use uuid::Uuid;

    fn invoice(cgst: i64, sgst: i64, igst: i64) -> Invoice {
        let now = Utc::now();
        Invoice {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            invoice_number: "INV-1".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            buyer_gstin: "29AAAAA0000A1Z5".to_string(),
            supplier_gstin: "GSTIN1".to_string(),
            cgst: BigDecimal::from(cgst),
            sgst: BigDecimal::from(sgst),
            igst: BigDecimal::from(igst),
            total_amount: BigDecimal::from(1000),
            reconciliation_status: "PENDING".to_string(),
            itc_eligible: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn reference_entry() -> Gstr2bEntry {
        Gstr2bEntry {
            invoice_number: "INV-1".to_string(),
            supplier_gstin: "GSTIN1".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            cgst: BigDecimal::from(90),
            sgst: BigDecimal::from(90),
            igst: BigDecimal::from(0),
            total_amount: BigDecimal::from(1000),
        }
    }

    #[test]
    fn found_reference_is_eligible_with_invoice_tax_sum() {
        // 场景 A: cgst 90 + sgst 90 + igst 0 = 180
        let result = evaluate(
            &invoice(90, 90, 0),
            &Gstr2bMatch::Found(reference_entry()),
        );

        assert!(result.is_eligible);
        assert_eq!(result.verification_status, VerificationStatus::Verified);
        assert_eq!(result.eligible_amount, BigDecimal::from(180));
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn eligible_amount_comes_from_invoice_not_reference() {
        // 参照记录税额与发票不同, 取发票侧
        let mut entry = reference_entry();
        entry.cgst = BigDecimal::from(500);

        let result = evaluate(&invoice(10, 20, 30), &Gstr2bMatch::Found(entry));
        assert_eq!(result.eligible_amount, BigDecimal::from(60));
    }

    #[test]
    fn eligible_amount_is_exact_decimal_sum() {
        let mut inv = invoice(0, 0, 0);
        inv.cgst = BigDecimal::from_str("90.05").unwrap();
        inv.sgst = BigDecimal::from_str("90.05").unwrap();
        inv.igst = BigDecimal::from_str("0.01").unwrap();

        let result = evaluate(&inv, &Gstr2bMatch::Found(reference_entry()));
        assert_eq!(
            result.eligible_amount,
            BigDecimal::from_str("180.11").unwrap()
        );
    }

    #[test]
    fn missing_reference_is_not_eligible() {
        // 场景 C
        let result = evaluate(&invoice(90, 90, 0), &Gstr2bMatch::NotFound);

        assert!(!result.is_eligible);
        assert_eq!(result.verification_status, VerificationStatus::NotFound);
        assert_eq!(result.eligible_amount, BigDecimal::zero());
        assert_eq!(result.reasons, vec!["Invoice not found in GSTR-2B"]);
    }
}
