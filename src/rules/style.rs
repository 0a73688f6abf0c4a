//! Style rules.

use crate::declaration::DeclarationBlock;
use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::selector::SelectorList;
use crate::traits::ToCss;

/// A selector list plus a declaration block.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
  pub selectors: SelectorList,
  pub declarations: DeclarationBlock,
  pub loc: SourceSpan,
}

impl ToCss for StyleRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    self.selectors.to_css(dest)?;
    self.declarations.to_css_block(dest)
  }
}
