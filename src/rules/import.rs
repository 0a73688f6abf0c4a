//! The `@import` rule.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::media_query::MediaList;
use crate::printer::Printer;
use crate::traits::ToCss;
use crate::values::url::UrlValue;

/// An `@import` rule: a URL plus an optional media query list.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRule {
  pub url: UrlValue,
  pub media: MediaList,
  pub loc: SourceSpan,
}

impl ToCss for ImportRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str("@import ")?;
    self.url.to_css(dest)?;
    if !self.media.is_empty() {
      dest.write_char(' ')?;
      self.media.to_css(dest)?;
    }
    dest.write_char(';')
  }
}
