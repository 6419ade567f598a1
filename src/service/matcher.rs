use crate::db::queries;
use crate::error::EngineError;
use crate::models::Gstr2bMatch;
use sqlx::PgPool;

/// GSTR-2B 参照记录查找
///
/// 纯查询, 无副作用; 查无记录返回 `Gstr2bMatch::NotFound`,
/// 只有存储本身出错才返回 `LookupFailed`。
pub struct Gstr2bMatcher {
    pool: PgPool,
}

/// 自然键校验: 两个字段都不能为空
pub fn validate_natural_key(
    invoice_number: &str,
    supplier_gstin: &str,
) -> Result<(), EngineError> {
    if invoice_number.is_empty() {
        return Err(EngineError::InvalidInput("invoice_number is empty"));
    }
    if supplier_gstin.is_empty() {
        return Err(EngineError::InvalidInput("supplier_gstin is empty"));
    }
    Ok(())
}

impl Gstr2bMatcher {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 按自然键 (发票号 + 供应商GSTIN) 精确查找, 零或一条
    pub async fn find_reference(
        &self,
        invoice_number: &str,
        supplier_gstin: &str,
    ) -> Result<Gstr2bMatch, EngineError> {
        validate_natural_key(invoice_number, supplier_gstin)?;

        let entry = queries::find_gstr2b(&self.pool, invoice_number, supplier_gstin)
            .await
            .map_err(EngineError::LookupFailed)?;

        Ok(match entry {
            Some(entry) => Gstr2bMatch::Found(entry),
            None => Gstr2bMatch::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_invoice_number() {
        let err = validate_natural_key("", "29ABCDE1234F1Z5").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn rejects_empty_supplier_gstin() {
        let err = validate_natural_key("INV-1", "").unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn accepts_complete_key() {
        assert!(validate_natural_key("INV-1", "29ABCDE1234F1Z5").is_ok());
    }
}
