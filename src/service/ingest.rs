use crate::db::queries;
use crate::error::EngineError;
use crate::models::{
    CreditUtilization, EligibilityResult, IngestionOutcome, Invoice, ItcClaim, NewInvoice,
    ReconciliationStatus,
};
use crate::service::matcher::validate_natural_key;
use crate::service::{EligibilityService, ReconcileService};
use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// 发票入账流程
///
/// 保存发票 → 记台账 → 可抵扣判定 → 对账 → 生成申报记录, 严格顺序执行。
/// 五步不在同一事务里: 任一步失败即中止, 已提交的步骤不回滚,
/// "发票已存但申报记录缺失"是允许出现的终态, 由错误里的步骤名向用户交代。
pub struct IngestionService {
    pool: PgPool,
    eligibility: EligibilityService,
    reconcile: ReconcileService,
}

impl IngestionService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            eligibility: EligibilityService::new(pool.clone()),
            reconcile: ReconcileService::new(pool.clone()),
            pool,
        }
    }

    /// 单张发票入账
    pub async fn ingest_invoice(
        &self,
        fields: NewInvoice,
    ) -> Result<IngestionOutcome, EngineError> {
        validate_natural_key(&fields.invoice_number, &fields.supplier_gstin)?;

        let now = Utc::now();

        // 1. 保存发票, 初始态 PENDING / 不可抵扣; GSTIN 统一大写
        let mut invoice = Invoice {
            id: Uuid::new_v4(),
            user_id: fields.user_id,
            invoice_number: fields.invoice_number,
            invoice_date: fields.invoice_date,
            buyer_gstin: fields.buyer_gstin.to_uppercase(),
            supplier_gstin: fields.supplier_gstin.to_uppercase(),
            cgst: fields.cgst,
            sgst: fields.sgst,
            igst: fields.igst,
            total_amount: fields.total_amount,
            reconciliation_status: ReconciliationStatus::Pending.as_str().to_string(),
            itc_eligible: false,
            created_at: now,
            updated_at: now,
        };
        queries::insert_invoice(&self.pool, &invoice)
            .await
            .map_err(|e| EngineError::PersistenceFailed {
                step: "insert_invoice",
                source: e,
            })?;

        // 2. 抵扣台账快照
        let snapshot = CreditUtilization {
            id: Uuid::new_v4(),
            user_id: invoice.user_id,
            cgst: invoice.cgst.clone(),
            sgst: invoice.sgst.clone(),
            igst: invoice.igst.clone(),
            created_at: now,
        };
        queries::insert_credit_utilization(&self.pool, &snapshot)
            .await
            .map_err(|e| EngineError::PersistenceFailed {
                step: "insert_credit_utilization",
                source: e,
            })?;

        // 3. 可抵扣判定
        let eligibility = self.eligibility.check_itc_eligibility(&invoice).await?;

        // 4. 对账 (命中参照记录时会回写发票行)
        let reconciliation = self.reconcile.reconcile_invoice(&invoice).await?;
        if reconciliation != ReconciliationStatus::Unmatched {
            // 同步内存副本, 与第 4 步落库的值保持一致
            invoice.reconciliation_status = reconciliation.as_str().to_string();
            invoice.itc_eligible = reconciliation == ReconciliationStatus::Matched;
        }

        // 5. 申报记录; eligible_amount 建档时固定为 0, 审核通过后另行更新
        let claim = build_claim(&invoice, &eligibility);
        queries::insert_claim(&self.pool, &claim)
            .await
            .map_err(|e| EngineError::PersistenceFailed {
                step: "insert_claim",
                source: e,
            })?;

        tracing::info!(
            "Invoice {} ingested: eligible={}, reconciliation={}",
            invoice.invoice_number,
            eligibility.is_eligible,
            reconciliation
        );

        Ok(IngestionOutcome {
            invoice,
            eligibility,
            reconciliation,
            claim,
        })
    }

    /// 按 ID 重新判定可抵扣 (查询接口用)
    pub async fn eligibility_for(&self, id: Uuid) -> Result<EligibilityResult, EngineError> {
        let invoice = self.load_invoice(id).await?;
        self.eligibility.check_itc_eligibility(&invoice).await
    }

    /// 按 ID 重新对账 (查询接口用)
    pub async fn reconcile_for(&self, id: Uuid) -> Result<ReconciliationStatus, EngineError> {
        let invoice = self.load_invoice(id).await?;
        self.reconcile.reconcile_invoice(&invoice).await
    }

    async fn load_invoice(&self, id: Uuid) -> Result<Invoice, EngineError> {
        queries::get_invoice(&self.pool, id)
            .await
            .map_err(EngineError::LookupFailed)?
            .ok_or(EngineError::NotFound(id))
    }
}

fn build_claim(invoice: &Invoice, eligibility: &EligibilityResult) -> ItcClaim {
    let now = Utc::now();
    ItcClaim {
        id: Uuid::new_v4(),
        user_id: invoice.user_id,
        invoice_number: invoice.invoice_number.clone(),
        supplier_gstin: invoice.supplier_gstin.clone(),
        amount: invoice.total_amount.clone(),
        eligible_amount: BigDecimal::zero(),
        status: eligibility.is_eligible,
        created_at: now,
        updated_at: now,
    }
}
