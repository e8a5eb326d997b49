//! javscraper-common: shared record types and errors.
//!
//! - **Records**: [`VideoRecord`], the raw result a provider returns for one title
//! - **Error Handling**: common error type and result alias
//!
//! # Examples
//!
//! ```
//! use javscraper_common::{Error, Result, VideoRecord};
//!
//! let mut record = VideoRecord::new("ABC-123", "local");
//! record.date = Some("2020-04-01".to_string());
//! assert_eq!(record.year(), Some(2020));
//!
//! fn decode(raw: &str) -> Result<VideoRecord> {
//!     if raw.trim().is_empty() {
//!         return Err(Error::invalid_token("empty token"));
//!     }
//!     Ok(serde_json::from_str(raw)?)
//! }
//! assert!(matches!(decode(""), Err(Error::InvalidToken(_))));
//! assert!(matches!(decode("{"), Err(Error::Serialization(_))));
//! ```

pub mod error;
pub mod record;

pub use error::{Error, Result};
pub use record::VideoRecord;
