//! The stylesheet container and the read entry points.

use crate::charset;
use crate::error::{default_error_handler, Error, ParseErrorHandler, ParserErrorKind, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::reader::DEFAULT_TAB_SIZE;
use crate::rules::{CssRule, CssRuleList};
use crate::traits::ToCss;
use encoding_rs::{Encoding, UTF_8};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The CSS version the parser and serializer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CssVersion {
  /// CSS 2.1. The CSS 3 at-rules parse as unknown rules, and serializing
  /// CSS 3 constructs fails.
  Css21,
  /// CSS 3, the default.
  #[default]
  Css30,
}

/// Options that control parsing.
#[derive(Clone)]
pub struct ParserOptions {
  pub version: CssVersion,
  /// Browser-compliant mode: recover from malformed input by skipping to
  /// the next synchronization point, the way browsers do.
  pub browser_compliant: bool,
  /// The charset used for byte sources when neither a BOM nor an
  /// `@charset` rule decides.
  pub fallback_encoding: &'static Encoding,
  /// Tab width used for column counting in source locations.
  pub tab_size: u32,
  /// Receives recoverable parse events. `None` uses the process-wide
  /// default.
  pub error_handler: Option<Arc<dyn ParseErrorHandler>>,
}

impl Default for ParserOptions {
  fn default() -> ParserOptions {
    ParserOptions {
      version: CssVersion::default(),
      browser_compliant: false,
      fallback_encoding: UTF_8,
      tab_size: DEFAULT_TAB_SIZE,
      error_handler: None,
    }
  }
}

impl fmt::Debug for ParserOptions {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("ParserOptions")
      .field("version", &self.version)
      .field("browser_compliant", &self.browser_compliant)
      .field("fallback_encoding", &self.fallback_encoding.name())
      .field("tab_size", &self.tab_size)
      .field("error_handler", &self.error_handler.as_ref().map(|_| "…"))
      .finish()
  }
}

impl ParserOptions {
  /// Browser-compliant options with everything else at its default.
  pub fn browser_compliant() -> ParserOptions {
    ParserOptions {
      browser_compliant: true,
      ..ParserOptions::default()
    }
  }

  pub(crate) fn handler(&self) -> Arc<dyn ParseErrorHandler> {
    match &self.error_handler {
      Some(handler) => handler.clone(),
      None => default_error_handler(),
    }
  }
}

/// A parsed stylesheet: an ordered list of top-level rules.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleSheet {
  pub rules: CssRuleList,
  pub loc: SourceSpan,
}

impl StyleSheet {
  pub fn new() -> StyleSheet {
    StyleSheet::default()
  }

  /// Parses a stylesheet from an already-decoded string.
  ///
  /// Any `@charset` directive in the content is consumed and ignored, since
  /// the text is already decoded.
  pub fn parse(code: &str, options: &ParserOptions) -> Result<StyleSheet, Error<ParserErrorKind>> {
    crate::parser::parse_stylesheet(code, options)
  }

  /// Parses a stylesheet from bytes, applying charset detection
  /// (BOM, then `@charset`, then `options.fallback_encoding`).
  pub fn parse_bytes(bytes: &[u8], options: &ParserOptions) -> Result<StyleSheet, Error<ParserErrorKind>> {
    let code = charset::decode(bytes, options.fallback_encoding)?;
    StyleSheet::parse(&code, options)
  }

  /// Reads and parses a file. I/O failures surface as
  /// [`ParserErrorKind::Io`].
  pub fn parse_file(path: impl AsRef<Path>, options: &ParserOptions) -> Result<StyleSheet, Error<ParserErrorKind>> {
    let bytes = std::fs::read(path).map_err(|e| Error {
      kind: ParserErrorKind::Io(e.to_string()),
      loc: None,
    })?;
    StyleSheet::parse_bytes(&bytes, options)
  }

  pub fn add_rule(&mut self, rule: CssRule) {
    self.rules.0.push(rule);
  }

  pub fn remove_rule(&mut self, index: usize) -> Option<CssRule> {
    if index < self.rules.0.len() {
      Some(self.rules.0.remove(index))
    } else {
      None
    }
  }
}

impl ToCss for StyleSheet {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    if let Some(header) = &dest.options.header {
      dest.write_str("/* ")?;
      // Keep the banner from closing itself early.
      dest.write_str(&header.replace("*/", "* /"))?;
      dest.write_str(" */")?;
      dest.newline()?;
    }
    self.rules.to_css(dest)
  }
}

impl fmt::Display for StyleSheet {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let css = self
      .to_css_string(&crate::printer::PrinterOptions::minified())
      .map_err(|_| fmt::Error)?;
    f.write_str(&css)
  }
}
