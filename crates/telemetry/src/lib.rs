//! Cost and usage accounting for chorus.
//!
//! [`PricingTable`] turns a token count and a model id into an estimated
//! USD cost (a fixed 50/50 input/output split of the total). Unknown models
//! are priced as the table's default model. [`UsageLedger`] accumulates
//! per-backend calls, tokens and cost across requests.

pub mod ledger;
pub mod pricing;

pub use ledger::{UsageLedger, UsageRow, UsageTotals};
pub use pricing::{CostEstimate, DEFAULT_PRICING_MODEL, ModelPricing, PricingTable};
