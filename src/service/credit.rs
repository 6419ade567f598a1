use crate::db::queries;
use crate::error::EngineError;
use crate::models::{ClaimStat, CreditReport, CreditSuggestion, CreditUtilization};
use bigdecimal::{BigDecimal, Zero};
use sqlx::PgPool;
use uuid::Uuid;

/// 抵扣优化报表服务
///
/// 取最新台账快照 + 申报记录统计, 生成三类规则建议; 只读, 不落库。
pub struct CreditOptimizer {
    pool: PgPool,
}

/// 根据最新快照和申报统计生成优化建议
pub fn build_suggestions(
    snapshot: &CreditUtilization,
    claims: &[ClaimStat],
) -> Vec<CreditSuggestion> {
    let mut suggestions = Vec::new();

    // CGST/SGST 失衡: 差额超过 1000
    let gap = (&snapshot.cgst - &snapshot.sgst).abs();
    if gap > BigDecimal::from(1000) {
        suggestions.push(CreditSuggestion {
            kind: "Balance CGST-SGST",
            severity: "warning",
            message: format!(
                "There's a {} difference between CGST and SGST credits",
                gap
            ),
            action: "Consider transferring credits to balance utilization",
        });
    }

    // IGST 偏高: igst > (cgst + sgst) * 1.2, 用整数放大避免除法
    let igst_scaled = &snapshot.igst * BigDecimal::from(10);
    let cs_scaled = (&snapshot.cgst + &snapshot.sgst) * BigDecimal::from(12);
    if igst_scaled > cs_scaled {
        suggestions.push(CreditSuggestion {
            kind: "Excess IGST",
            severity: "info",
            message: "IGST credits are significantly higher than CGST+SGST".to_string(),
            action: "Utilize IGST credits first for better optimization",
        });
    }

    // 利用率不足 30%: 已利用额 = 判定通过的申报记录 eligible_amount 之和
    let total = &snapshot.cgst + &snapshot.sgst + &snapshot.igst;
    if total > BigDecimal::zero() {
        let utilized: BigDecimal = claims
            .iter()
            .filter(|c| c.status)
            .map(|c| c.eligible_amount.clone())
            .sum();
        if &utilized * BigDecimal::from(10) < &total * BigDecimal::from(3) {
            suggestions.push(CreditSuggestion {
                kind: "Low Utilization",
                severity: "alert",
                message: "Credit utilization rate is below 30%".to_string(),
                action: "Review and plan credit utilization strategy",
            });
        }
    }

    suggestions
}

impl CreditOptimizer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 生成抵扣优化报表
    pub async fn optimization_report(&self, user_id: Uuid) -> Result<CreditReport, EngineError> {
        let snapshot = queries::latest_credit_utilization(&self.pool, user_id)
            .await
            .map_err(EngineError::LookupFailed)?;

        let Some(snapshot) = snapshot else {
            // 还没有任何入账, 报表为空
            return Ok(CreditReport {
                credits: None,
                suggestions: Vec::new(),
            });
        };

        let claims = queries::list_claim_stats(&self.pool, user_id)
            .await
            .map_err(EngineError::LookupFailed)?;

        let suggestions = build_suggestions(&snapshot, &claims);
        Ok(CreditReport {
            credits: Some(snapshot),
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(cgst: i64, sgst: i64, igst: i64) -> CreditUtilization {
        CreditUtilization {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            cgst: BigDecimal::from(cgst),
            sgst: BigDecimal::from(sgst),
            igst: BigDecimal::from(igst),
            created_at: Utc::now(),
        }
    }

    fn approved(amount: i64) -> ClaimStat {
        ClaimStat {
            eligible_amount: BigDecimal::from(amount),
            status: true,
        }
    }

    #[test]
    fn flags_cgst_sgst_imbalance_over_1000() {
        let suggestions = build_suggestions(&snapshot(5000, 2000, 0), &[approved(5000)]);
        assert!(suggestions.iter().any(|s| s.kind == "Balance CGST-SGST"));
    }

    #[test]
    fn balanced_credits_produce_no_imbalance_warning() {
        let suggestions = build_suggestions(&snapshot(5000, 4500, 0), &[approved(5000)]);
        assert!(!suggestions.iter().any(|s| s.kind == "Balance CGST-SGST"));
    }

    #[test]
    fn flags_excess_igst() {
        // igst 3000 > (1000 + 1000) * 1.2
        let suggestions = build_suggestions(&snapshot(1000, 1000, 3000), &[approved(5000)]);
        assert!(suggestions.iter().any(|s| s.kind == "Excess IGST"));
    }

    #[test]
    fn igst_at_threshold_is_not_flagged() {
        // igst 2400 == (1000 + 1000) * 1.2, 不超过即不提示
        let suggestions = build_suggestions(&snapshot(1000, 1000, 2400), &[approved(5000)]);
        assert!(!suggestions.iter().any(|s| s.kind == "Excess IGST"));
    }

    #[test]
    fn flags_low_utilization() {
        // 已利用 100 / 总额 3000 < 30%
        let suggestions = build_suggestions(&snapshot(1000, 1000, 1000), &[approved(100)]);
        assert!(suggestions.iter().any(|s| s.kind == "Low Utilization"));
    }

    #[test]
    fn rejected_claims_do_not_count_as_utilized() {
        let rejected = ClaimStat {
            eligible_amount: BigDecimal::from(5000),
            status: false,
        };
        let suggestions = build_suggestions(&snapshot(1000, 1000, 1000), &[rejected]);
        assert!(suggestions.iter().any(|s| s.kind == "Low Utilization"));
    }

    #[test]
    fn zero_credit_total_produces_no_utilization_rule() {
        let suggestions = build_suggestions(&snapshot(0, 0, 0), &[]);
        assert!(!suggestions.iter().any(|s| s.kind == "Low Utilization"));
    }
}
