//! Identity resolution, biography building and dataset assembly.

pub mod assembler;
pub mod biography;
pub mod identity;
pub mod range;

pub use assembler::{Assembler, MasterTables, PlayerTables};
pub use biography::build_biography;
pub use identity::{IDENTITY_COLUMNS, resolve_identities};
pub use range::{SeasonRange, latest_completed_season};
