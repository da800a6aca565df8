pub mod types;
mod table_memo;

// Re-export cache types
pub use types::*;
// Re-export the per-run table memo
pub use table_memo::*;
