//! The `@supports` rule.

use super::CssRuleList;
use crate::declaration::Declaration;
use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;

/// An `@supports` rule: a condition plus nested top-level rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportsRule {
  pub condition: SupportsCondition,
  pub rules: CssRuleList,
  pub loc: SourceSpan,
}

/// A supports condition, kept as the flat member sequence the source used.
/// No precedence is resolved; interpreting `and`/`or` ordering is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SupportsCondition {
  pub members: Vec<SupportsConditionMember>,
  pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SupportsConditionMember {
  /// A `not` marker.
  Not,
  /// An `and` or `or` between members.
  Operator(SupportsOperator),
  /// A parenthesized declaration, e.g. `(display: grid)`.
  Declaration(Declaration),
  /// A nested parenthesized condition.
  Nested(SupportsCondition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportsOperator {
  And,
  Or,
}

impl SupportsOperator {
  pub fn as_str(&self) -> &'static str {
    match self {
      SupportsOperator::And => "and",
      SupportsOperator::Or => "or",
    }
  }
}

impl ToCss for SupportsRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.require_css3("@supports")?;
    dest.write_str("@supports ")?;
    self.condition.to_css(dest)?;
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

impl ToCss for SupportsCondition {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for member in &self.members {
      if first {
        first = false;
      } else {
        // The spaces around `and`/`or`/`not` are part of the grammar.
        dest.write_char(' ')?;
      }
      match member {
        SupportsConditionMember::Not => dest.write_str("not")?,
        SupportsConditionMember::Operator(op) => dest.write_str(op.as_str())?,
        SupportsConditionMember::Declaration(declaration) => {
          dest.write_char('(')?;
          declaration.to_css(dest)?;
          dest.write_char(')')?;
        }
        SupportsConditionMember::Nested(condition) => {
          dest.write_char('(')?;
          condition.to_css(dest)?;
          dest.write_char(')')?;
        }
      }
    }
    Ok(())
  }
}
