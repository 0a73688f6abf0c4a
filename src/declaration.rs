//! Declarations and declaration blocks.

use crate::error::{Error, ParserErrorKind, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::stylesheet::ParserOptions;
use crate::traits::ToCss;
use crate::values::expression::Expression;

/// A `property: value` pair with an optional `!important`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
  /// The property name with its source casing preserved. Matching is
  /// ASCII-case-insensitive; see [`Declaration::is_property`].
  pub property: String,
  pub value: Expression,
  pub important: bool,
  pub loc: SourceSpan,
}

impl Declaration {
  pub fn new(property: impl Into<String>, value: Expression) -> Declaration {
    Declaration {
      property: property.into(),
      value,
      important: false,
      loc: SourceSpan::default(),
    }
  }

  pub fn is_property(&self, name: &str) -> bool {
    self.property.eq_ignore_ascii_case(name)
  }
}

impl ToCss for Declaration {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str(&self.property)?;
    dest.delim(':', false)?;
    self.value.to_css(dest)?;
    if self.important {
      dest.whitespace()?;
      dest.write_str("!important")?;
    }
    Ok(())
  }
}

/// The ordered declarations of a style rule body, an at-rule body, or a
/// standalone declaration list (an HTML `style` attribute).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeclarationBlock {
  pub declarations: Vec<Declaration>,
  pub loc: SourceSpan,
}

impl DeclarationBlock {
  pub fn new() -> DeclarationBlock {
    DeclarationBlock::default()
  }

  /// Parses the body-of-a-block grammar: declarations separated by `;`,
  /// without surrounding braces. `";"`, `";;"`, and whitespace-only inputs
  /// parse to an empty block.
  pub fn parse(code: &str, options: &ParserOptions) -> Result<DeclarationBlock, Error<ParserErrorKind>> {
    crate::parser::parse_declaration_list(code, options)
  }

  pub fn push(&mut self, declaration: Declaration) {
    self.declarations.push(declaration);
  }

  pub fn len(&self) -> usize {
    self.declarations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.declarations.is_empty()
  }

  /// The first declaration of the given property, matched
  /// case-insensitively.
  pub fn get(&self, property: &str) -> Option<&Declaration> {
    self.declarations.iter().find(|d| d.is_property(property))
  }

  pub fn get_mut(&mut self, property: &str) -> Option<&mut Declaration> {
    self.declarations.iter_mut().find(|d| d.is_property(property))
  }

  /// Removes every declaration of the given property and returns how many
  /// were removed.
  pub fn remove_property(&mut self, property: &str) -> usize {
    let before = self.declarations.len();
    self.declarations.retain(|d| !d.is_property(property));
    before - self.declarations.len()
  }

  /// Sets or clears `!important` on every declaration.
  pub fn set_important(&mut self, important: bool) {
    for declaration in &mut self.declarations {
      declaration.important = important;
    }
  }

  /// Writes the block including braces, laid out per the printer mode.
  pub(crate) fn to_css_block<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.whitespace()?;
    dest.write_char('{')?;
    dest.indent();
    let len = self.declarations.len();
    for (i, declaration) in self.declarations.iter().enumerate() {
      dest.newline()?;
      declaration.to_css(dest)?;
      if !dest.minify() || i + 1 < len {
        dest.write_char(';')?;
      }
    }
    dest.dedent();
    dest.newline()?;
    dest.write_char('}')
  }
}

impl ToCss for DeclarationBlock {
  /// Serializes the declarations without braces, as in a `style` attribute.
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let len = self.declarations.len();
    for (i, declaration) in self.declarations.iter().enumerate() {
      declaration.to_css(dest)?;
      if !dest.minify() || i + 1 < len {
        dest.write_char(';')?;
      }
      if i + 1 < len {
        dest.whitespace()?;
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::printer::PrinterOptions;

  fn block() -> DeclarationBlock {
    let mut block = DeclarationBlock::new();
    block.push(Declaration::new("color", Expression::ident("red")));
    let mut important = Declaration::new("Margin", Expression::number("0"));
    important.important = true;
    block.push(important);
    block
  }

  #[test]
  fn declarations_serialize_per_mode() {
    let block = block();
    assert_eq!(
      block.to_css_string(&PrinterOptions::default()).unwrap(),
      "color: red; Margin: 0 !important;"
    );
    assert_eq!(
      block.to_css_string(&PrinterOptions::minified()).unwrap(),
      "color:red;Margin:0!important"
    );
  }

  #[test]
  fn property_lookup_ignores_case() {
    let mut block = block();
    assert!(block.get("COLOR").is_some());
    assert!(block.get("margin").is_some());
    assert_eq!(block.remove_property("margin"), 1);
    assert!(block.get("margin").is_none());
    assert_eq!(block.len(), 1);
  }

  #[test]
  fn set_important_sweeps_the_block() {
    let mut block = block();
    block.set_important(true);
    assert!(block.declarations.iter().all(|d| d.important));
  }
}
