//! The `@media` rule.

use super::CssRuleList;
use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::media_query::MediaList;
use crate::printer::Printer;
use crate::traits::ToCss;

/// An `@media` rule: a query list plus nested top-level rules.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
  pub query: MediaList,
  pub rules: CssRuleList,
  pub loc: SourceSpan,
}

impl ToCss for MediaRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str("@media ")?;
    self.query.to_css(dest)?;
    dest.whitespace()?;
    dest.write_char('{')?;
    dest.indent();
    dest.newline()?;
    self.rules.to_css(dest)?;
    dest.dedent();
    dest.newline()?;
    dest.write_char('}')
  }
}
