//! The `@viewport` rule.

use crate::declaration::DeclarationBlock;
use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;
use crate::vendor_prefix::VendorPrefix;

/// An `@viewport` or `@-ms-viewport` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportRule {
  pub vendor_prefix: VendorPrefix,
  pub declarations: DeclarationBlock,
  pub loc: SourceSpan,
}

impl ToCss for ViewportRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.require_css3("@viewport")?;
    dest.write_char('@')?;
    self.vendor_prefix.to_css(dest)?;
    dest.write_str("viewport")?;
    self.declarations.to_css_block(dest)
  }
}
