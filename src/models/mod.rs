pub mod claim;
pub mod credit;
pub mod gstr2b;
pub mod invoice;
pub mod result;

pub use claim::ItcClaim;
pub use credit::{ClaimStat, CreditReport, CreditSuggestion, CreditUtilization};
pub use gstr2b::{Gstr2bEntry, Gstr2bMatch};
pub use invoice::{Invoice, NewInvoice};
pub use result::{EligibilityResult, IngestionOutcome, ReconciliationStatus, VerificationStatus};
