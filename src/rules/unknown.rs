//! Unrecognized at-rules, captured literally.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;

/// An at-rule whose name the grammar does not know. The parameter text and
/// body text are kept literally and re-emitted as captured, regardless of
/// the printer mode.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownRule {
  /// The at-keyword name, without the `@`.
  pub name: String,
  /// The text between the name and the `{` or `;`, whitespace-normalized.
  pub prelude: String,
  /// The literal body between the braces, or `None` for `@name …;` forms.
  pub block: Option<String>,
  pub loc: SourceSpan,
}

impl ToCss for UnknownRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_char('@')?;
    dest.write_str(&self.name)?;
    if !self.prelude.is_empty() {
      dest.write_char(' ')?;
      dest.write_str(&self.prelude)?;
    }
    match &self.block {
      Some(block) => {
        dest.whitespace()?;
        dest.write_char('{')?;
        dest.write_str(block)?;
        dest.write_char('}')
      }
      None => dest.write_char(';'),
    }
  }
}
