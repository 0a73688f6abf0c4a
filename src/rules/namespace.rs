//! The `@namespace` rule.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;
use crate::values::url::UrlValue;

/// An `@namespace` rule: an optional prefix plus the namespace URL.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceRule {
  pub prefix: Option<String>,
  pub url: UrlValue,
  pub loc: SourceSpan,
}

impl ToCss for NamespaceRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str("@namespace ")?;
    if let Some(prefix) = &self.prefix {
      dest.write_str(prefix)?;
      dest.write_char(' ')?;
    }
    self.url.to_css(dest)?;
    dest.write_char(';')
  }
}
