use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// GSTR-2B 参照记录 (gstr_2b)
///
/// 供应商侧申报的发票事实, 由外部导入流程维护, 本服务只读。
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Gstr2bEntry {
    pub invoice_number: String,
    pub supplier_gstin: String,
    pub invoice_date: NaiveDate,
    pub cgst: BigDecimal,
    pub sgst: BigDecimal,
    pub igst: BigDecimal,
    pub total_amount: BigDecimal,
}

/// GSTR-2B 查找结果
///
/// 显式两态, 强制调用方处理"查无记录"; 查无记录是正常判定输入, 不是错误。
#[derive(Debug, Clone)]
pub enum Gstr2bMatch {
    Found(Gstr2bEntry),
    NotFound,
}

impl Gstr2bMatch {
    pub fn is_found(&self) -> bool {
        matches!(self, Gstr2bMatch::Found(_))
    }

    pub fn entry(&self) -> Option<&Gstr2bEntry> {
        match self {
            Gstr2bMatch::Found(entry) => Some(entry),
            Gstr2bMatch::NotFound => None,
        }
    }
}
