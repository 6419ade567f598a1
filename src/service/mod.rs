pub mod credit;
pub mod eligibility;
pub mod ingest;
pub mod matcher;
pub mod reconcile;

pub use credit::CreditOptimizer;
pub use eligibility::EligibilityService;
pub use ingest::IngestionService;
pub use matcher::Gstr2bMatcher;
pub use reconcile::ReconcileService;
