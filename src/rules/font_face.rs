//! The `@font-face` rule.

use crate::declaration::DeclarationBlock;
use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;

#[derive(Debug, Clone, PartialEq)]
pub struct FontFaceRule {
  pub declarations: DeclarationBlock,
  pub loc: SourceSpan,
}

impl ToCss for FontFaceRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str("@font-face")?;
    self.declarations.to_css_block(dest)
  }
}
