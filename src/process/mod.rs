pub mod age;
pub mod classify;
pub mod clean;

pub use classify::{classify, ContentKind};
pub use clean::{clean, write_cleaned, CleanOutcome, CleanedRow};
