pub mod types;
pub mod grouping;
pub mod archive;
pub mod orchestrator;

pub use types::*;
pub use grouping::{group_pairs, parse_role, sanitize_filename, save_upload};
pub use orchestrator::{LabelOrchestrator, LabelOutcome};
