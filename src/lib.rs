pub mod codec;
pub mod config;
pub mod error;
pub mod output;
pub mod sanitize;
pub mod split;
pub mod summary;
pub mod tracker;

// Re-export main types for convenient access
pub use codec::{Row, RowReader, RowWriter};
pub use config::{parse_delimiter, LineTerminator, SplitConfig};
pub use error::{Result, SplitError};
pub use sanitize::{output_filename, sanitize};
pub use split::Splitter;
pub use summary::{GroupSummary, SplitSummary};
pub use tracker::{GroupTracker, GroupTransition};
