//! Flat files kept between runs

pub mod codes;
pub mod dump;
pub mod preferences;

pub use codes::CodeRegistry;
pub use dump::DebugDump;
pub use preferences::PreferenceStore;

pub const CODES_FILE: &str = "codes.csv";
pub const DEFAULT_PAIR_FILE: &str = "default_currencies.csv";
