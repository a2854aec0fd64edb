pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::TimeBucketAggregator;
pub use exec::exec;
pub use output::{output_json, output_text, print_statistics};
