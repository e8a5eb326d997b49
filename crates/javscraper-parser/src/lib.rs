//! # javscraper-parser
//!
//! Recognizes canonical video identifiers (`ABC-123`, `FC2-1234567`,
//! `HEYZO-1234`, date serials, ...) in filenames and free-form titles.
//!
//! ## Quick Start
//!
//! ```
//! use javscraper_parser::{parse, IdKind};
//!
//! let id = parse("hhd800.com@SSIS-001-C.mp4").unwrap();
//! assert_eq!(id.id, "SSIS-001");
//! assert_eq!(id.kind, IdKind::Censored);
//! ```
//!
//! When nothing is recognized, [`search_key`] decides whether the raw text is
//! still worth sending to metadata providers:
//!
//! ```
//! use javscraper_parser::search_key;
//!
//! assert_eq!(search_key("abc123").as_deref(), Some("ABC-123"));
//! assert_eq!(search_key("Summer Holiday 2019 Part Two"), None);
//! ```

mod filter;
mod model;
mod recognizer;

pub use filter::{is_plausible_key, search_key, MAX_RAW_KEY_LEN};
pub use model::{IdKind, Identifier};

/// Parse `text` into a canonical [`Identifier`], or `None` if no known
/// format is present.
///
/// This is a pure function: the same input always yields the same result.
pub fn parse(text: &str) -> Option<Identifier> {
    recognizer::recognize(text)
}

/// The part of `text` identifiers are recognized in: file extensions,
/// site-name prefixes and resolution/codec tags removed.
///
/// ```
/// assert_eq!(javscraper_parser::clean_name("hhd800.com@STARS-120-C.mkv"), "STARS-120-C");
/// ```
pub fn clean_name(text: &str) -> String {
    recognizer::clean(text)
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .to_string()
}
