//! The `@page` rule and its margin at-blocks.

use crate::declaration::{Declaration, DeclarationBlock};
use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;

/// The sixteen page-margin at-block names.
pub const PAGE_MARGIN_BOXES: [&str; 16] = [
  "top-left-corner",
  "top-left",
  "top-center",
  "top-right",
  "top-right-corner",
  "bottom-left-corner",
  "bottom-left",
  "bottom-center",
  "bottom-right",
  "bottom-right-corner",
  "left-top",
  "left-middle",
  "left-bottom",
  "right-top",
  "right-middle",
  "right-bottom",
];

pub fn is_page_margin_box(name: &str) -> bool {
  PAGE_MARGIN_BOXES.iter().any(|m| name.eq_ignore_ascii_case(m))
}

/// An `@page` rule: optional selectors plus a body mixing declarations and
/// margin at-blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRule {
  /// Page selectors in their textual form, e.g. `:first` or
  /// `LandscapeTable:first`.
  pub selectors: Vec<String>,
  pub body: Vec<PageBodyMember>,
  pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBodyMember {
  Declaration(Declaration),
  MarginBlock(PageMarginRule),
}

/// A page-margin at-block such as `@top-left-corner { … }`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMarginRule {
  /// The margin box name, without the `@`.
  pub name: String,
  pub declarations: DeclarationBlock,
  pub loc: SourceSpan,
}

impl ToCss for PageRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str("@page")?;
    let mut first = true;
    for selector in &self.selectors {
      if first {
        first = false;
        dest.write_char(' ')?;
      } else {
        dest.delim(',', false)?;
      }
      dest.write_str(selector)?;
    }
    dest.whitespace()?;
    dest.write_char('{')?;
    dest.indent();
    let len = self.body.len();
    for (i, member) in self.body.iter().enumerate() {
      dest.newline()?;
      match member {
        PageBodyMember::Declaration(declaration) => {
          declaration.to_css(dest)?;
          if !dest.minify() || i + 1 < len {
            dest.write_char(';')?;
          }
        }
        PageBodyMember::MarginBlock(margin) => margin.to_css(dest)?,
      }
    }
    dest.dedent();
    dest.newline()?;
    dest.write_char('}')
  }
}

impl ToCss for PageMarginRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_char('@')?;
    dest.write_str(&self.name)?;
    self.declarations.to_css_block(dest)
  }
}
