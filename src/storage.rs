pub mod directory;
pub mod record;

pub use directory::{CheckReport, Criterion, Directory, StoreError};
pub use record::{LoadError, SaveError};
