//! Quality-value negotiation for HTTP `Accept*` headers
//!
//! This crate picks the best value a server supports for the preferences a client
//! sends in `Accept`, `Accept-Language`, `Accept-Encoding` and `Accept-Charset`,
//! following the quality-value rules of RFC 7231.
//!
//! # Example
//!
//! ```
//! use micro_negotiator::{HeaderNegotiator, MediaTypeNegotiator};
//!
//! let supported = vec!["text/html".to_string(), "application/json".to_string()];
//! let best = MediaTypeNegotiator
//!     .negotiate("application/json, text/html;q=0.9", &supported)
//!     .unwrap();
//!
//! assert_eq!(best, Some(1));
//! ```
//!
//! # Selection rules
//!
//! - every header item may carry a weight `;q=<value>` in `[0, 1]`, defaulting to `1`
//! - for each candidate the most specific matching item decides its weight, so
//!   `gzip;q=0, *` rejects `gzip` while accepting everything else
//! - candidates with a weight of zero are never selected
//! - the highest weight wins, and on a tie the candidate listed first wins
//!
//! Negotiators report malformed headers as [`NegotiationError`]. Callers that treat
//! a broken header like a missing one can simply map the error to "no match".

mod error;
mod language;
mod media;
mod negotiator;
mod token;

pub mod header;

pub use error::NegotiationError;
pub use header::{AcceptItem, Quality};
pub use language::LanguageNegotiator;
pub use media::{MediaTypeNegotiator, PreparedMediaTypeNegotiator};
pub use negotiator::HeaderNegotiator;
pub use token::{CharsetNegotiator, EncodingNegotiator};
