//! A CSS 2.1 / CSS 3 parser, AST, and serializer.
//!
//! Reads CSS source into a strongly-typed tree of rules, selectors,
//! declarations, and expressions; supports traversal and in-place
//! modification; and serializes the tree back to CSS with configurable
//! formatting. Parsing is grammatical only: no cascade, no specificity, no
//! URL resolution. Numeric literals, quote styles, hex colors, and escape
//! sequences round-trip byte-identically.
//!
//! # Example
//!
//! ```
//! use csstree::printer::PrinterOptions;
//! use csstree::stylesheet::{ParserOptions, StyleSheet};
//! use csstree::traits::ToCss;
//!
//! let sheet = StyleSheet::parse(".greeting { color: #1a2b3c; }", &ParserOptions::default()).unwrap();
//! let minified = sheet.to_css_string(&PrinterOptions::minified()).unwrap();
//! assert_eq!(minified, ".greeting{color:#1a2b3c}");
//! ```
//!
//! Malformed input is handled per the configured mode: strict parsing
//! reports recoverable errors to a handler and fails when no
//! synchronization point exists, while browser-compliant parsing
//! ([`stylesheet::ParserOptions::browser_compliant`]) drops the malformed
//! construct and continues, the way browsers do.

pub mod charset;
pub mod declaration;
pub mod error;
pub mod lexer;
pub mod location;
pub mod media_query;
mod parser;
pub mod printer;
pub mod properties;
mod reader;
pub mod rules;
pub mod selector;
pub mod stylesheet;
pub mod traits;
pub mod values;
pub mod vendor_prefix;
pub mod visitor;
