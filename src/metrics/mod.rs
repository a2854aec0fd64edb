pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::{BranchContext, BranchMetricsAggregator};
pub use exec::exec;
pub use output::{output_json, print_summary};
