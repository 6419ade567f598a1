use crate::models::{ClaimStat, CreditUtilization, Gstr2bEntry, Invoice, ItcClaim};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// 按自然键查 GSTR-2B 参照记录 (零或一条, 大小写敏感的精确匹配)
pub async fn find_gstr2b(
    pool: &PgPool,
    invoice_number: &str,
    supplier_gstin: &str,
) -> Result<Option<Gstr2bEntry>, sqlx::Error> {
    sqlx::query_as::<_, Gstr2bEntry>(
        r#"
        SELECT invoice_number, supplier_gstin, invoice_date,
               cgst, sgst, igst, total_amount
        FROM gstr_2b
        WHERE invoice_number = $1
          AND supplier_gstin = $2
        "#,
    )
    .bind(invoice_number)
    .bind(supplier_gstin)
    .fetch_optional(pool)
    .await
}

/// 按 ID 查发票
pub async fn get_invoice(pool: &PgPool, id: Uuid) -> Result<Option<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, user_id, invoice_number, invoice_date,
               buyer_gstin, supplier_gstin,
               cgst, sgst, igst, total_amount,
               reconciliation_status, itc_eligible,
               created_at, updated_at
        FROM invoices
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// 保存发票
pub async fn insert_invoice(pool: &PgPool, invoice: &Invoice) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO invoices (
            id, user_id, invoice_number, invoice_date,
            buyer_gstin, supplier_gstin,
            cgst, sgst, igst, total_amount,
            reconciliation_status, itc_eligible,
            created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(invoice.id)
    .bind(invoice.user_id)
    .bind(&invoice.invoice_number)
    .bind(invoice.invoice_date)
    .bind(&invoice.buyer_gstin)
    .bind(&invoice.supplier_gstin)
    .bind(invoice.cgst.clone())
    .bind(invoice.sgst.clone())
    .bind(invoice.igst.clone())
    .bind(invoice.total_amount.clone())
    .bind(&invoice.reconciliation_status)
    .bind(invoice.itc_eligible)
    .bind(invoice.created_at)
    .bind(invoice.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 回写对账结果
///
/// 按完整自然键 (发票号 + 供应商GSTIN) 过滤, 避免不同供应商撞号时误更新。
pub async fn update_reconciliation(
    pool: &PgPool,
    invoice_number: &str,
    supplier_gstin: &str,
    status: &str,
    itc_eligible: bool,
    updated_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE invoices
        SET reconciliation_status = $3,
            itc_eligible = $4,
            updated_at = $5
        WHERE invoice_number = $1
          AND supplier_gstin = $2
        "#,
    )
    .bind(invoice_number)
    .bind(supplier_gstin)
    .bind(status)
    .bind(itc_eligible)
    .bind(updated_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// 保存申报记录
pub async fn insert_claim(pool: &PgPool, claim: &ItcClaim) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO itc_claims (
            id, user_id, invoice_number, supplier_gstin,
            amount, eligible_amount, status,
            created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(claim.id)
    .bind(claim.user_id)
    .bind(&claim.invoice_number)
    .bind(&claim.supplier_gstin)
    .bind(claim.amount.clone())
    .bind(claim.eligible_amount.clone())
    .bind(claim.status)
    .bind(claim.created_at)
    .bind(claim.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 保存抵扣台账快照
pub async fn insert_credit_utilization(
    pool: &PgPool,
    snapshot: &CreditUtilization,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO credit_utilization (id, user_id, cgst, sgst, igst, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(snapshot.id)
    .bind(snapshot.user_id)
    .bind(snapshot.cgst.clone())
    .bind(snapshot.sgst.clone())
    .bind(snapshot.igst.clone())
    .bind(snapshot.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// 取最新一条抵扣台账快照
pub async fn latest_credit_utilization(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CreditUtilization>, sqlx::Error> {
    sqlx::query_as::<_, CreditUtilization>(
        r#"
        SELECT id, user_id, cgst, sgst, igst, created_at
        FROM credit_utilization
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// 查申报记录的统计列
pub async fn list_claim_stats(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ClaimStat>, sqlx::Error> {
    sqlx::query_as::<_, ClaimStat>(
        r#"
        SELECT eligible_amount, status
        FROM itc_claims
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
