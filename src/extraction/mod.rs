pub mod client;

pub use client::{ExtractedInvoice, ExtractionClient, PollState};
