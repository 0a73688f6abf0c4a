//! The `@keyframes` rule.

use crate::declaration::DeclarationBlock;
use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;
use crate::vendor_prefix::VendorPrefix;

/// An `@keyframes` rule, possibly vendor-prefixed.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
  pub vendor_prefix: VendorPrefix,
  /// The animation name as written, identifier or string.
  pub name: String,
  pub blocks: Vec<KeyframesBlock>,
  pub loc: SourceSpan,
}

/// One block within `@keyframes`: its selectors (`from`, `to`, or
/// percentages) and declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesBlock {
  /// Selectors in their textual form: `from`, `to`, `50%`.
  pub selectors: Vec<String>,
  pub declarations: DeclarationBlock,
  pub loc: SourceSpan,
}

/// Whether `text` is a valid keyframe selector.
pub fn is_valid_keyframe_selector(text: &str) -> bool {
  text.eq_ignore_ascii_case("from") || text.eq_ignore_ascii_case("to") || text.ends_with('%')
}

impl ToCss for KeyframesRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.require_css3("@keyframes")?;
    dest.write_char('@')?;
    self.vendor_prefix.to_css(dest)?;
    dest.write_str("keyframes ")?;
    dest.write_str(&self.name)?;
    dest.whitespace()?;
    dest.write_char('{')?;
    dest.indent();
    for block in &self.blocks {
      dest.newline()?;
      block.to_css(dest)?;
    }
    dest.dedent();
    dest.newline()?;
    dest.write_char('}')
  }
}

impl ToCss for KeyframesBlock {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for selector in &self.selectors {
      if first {
        first = false;
      } else {
        dest.delim(',', false)?;
      }
      dest.write_str(selector)?;
    }
    self.declarations.to_css_block(dest)
  }
}
