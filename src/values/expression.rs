//! Declaration value expressions.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;
use crate::values::math::MathExpression;
use crate::values::url::UrlValue;
use smallvec::SmallVec;

/// The value of a declaration: an ordered list of members.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
  pub members: SmallVec<[ExpressionMember; 2]>,
  pub loc: SourceSpan,
}

/// One member of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionMember {
  /// A textually-preserved simple term: number (with optional sign, unit,
  /// or `%`), identifier, hash color, unicode range, or string.
  Term(Term),
  /// A `url(…)` term.
  Url(UrlValue),
  /// A function call such as `rgb(…)` or `var(…)`.
  Function(FunctionTerm),
  /// A `calc(…)` expression.
  Math(MathExpression),
  /// One of the expression-level operators `/`, `,`, `=`.
  Operator(ExpressionOperator),
}

/// A simple term, stored in its literal source form.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
  /// The literal text, e.g. `+5.12%`, `#AbC`, `"str"`, `u+1234`.
  pub value: String,
  pub loc: SourceSpan,
}

impl Term {
  pub fn new(value: impl Into<String>) -> Term {
    Term {
      value: value.into(),
      loc: SourceSpan::default(),
    }
  }

  pub fn is_string(&self) -> bool {
    self.value.starts_with('"') || self.value.starts_with('\'')
  }

  pub fn is_hash_color(&self) -> bool {
    self.value.starts_with('#')
  }

  pub fn is_numeric(&self) -> bool {
    let v = self.value.strip_prefix(['+', '-']).unwrap_or(&self.value);
    v.starts_with(|c: char| c.is_ascii_digit()) || v.starts_with('.')
  }
}

/// A function member: name plus argument expression. Commas between
/// arguments appear as `Operator` members inside `arguments`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTerm {
  pub name: String,
  pub arguments: Box<Expression>,
  pub loc: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionOperator {
  Slash,
  Comma,
  Equals,
}

impl ExpressionOperator {
  pub fn as_char(&self) -> char {
    match self {
      ExpressionOperator::Slash => '/',
      ExpressionOperator::Comma => ',',
      ExpressionOperator::Equals => '=',
    }
  }
}

impl Expression {
  pub fn new() -> Expression {
    Expression::default()
  }

  pub fn push(&mut self, member: ExpressionMember) {
    self.members.push(member);
  }

  fn single(member: ExpressionMember) -> Expression {
    let mut expression = Expression::new();
    expression.push(member);
    expression
  }

  /// An expression holding a single identifier term.
  pub fn ident(name: &str) -> Expression {
    Expression::single(ExpressionMember::Term(Term::new(name)))
  }

  /// An expression holding a single numeric term in its textual form.
  pub fn number(text: &str) -> Expression {
    Expression::single(ExpressionMember::Term(Term::new(text)))
  }

  /// An expression holding a single double-quoted string term.
  pub fn string(value: &str) -> Expression {
    Expression::single(ExpressionMember::Term(Term::new(format!("\"{}\"", value))))
  }

  /// An expression holding a single unquoted `url(…)` term.
  pub fn url(url: &str) -> Expression {
    Expression::single(ExpressionMember::Url(UrlValue::new(url)))
  }

  pub fn is_empty(&self) -> bool {
    self.members.is_empty()
  }
}

impl From<ExpressionMember> for Expression {
  fn from(member: ExpressionMember) -> Expression {
    Expression::single(member)
  }
}

impl ToCss for Expression {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let mut after_value = false;
    for member in &self.members {
      match member {
        ExpressionMember::Operator(op) => {
          match op {
            ExpressionOperator::Comma => dest.delim(',', false)?,
            op => dest.write_char(op.as_char())?,
          }
          after_value = false;
        }
        member => {
          // Whitespace between two adjacent values is significant.
          if after_value {
            dest.write_char(' ')?;
          }
          match member {
            ExpressionMember::Term(term) => dest.write_str(&term.value)?,
            ExpressionMember::Url(url) => url.to_css(dest)?,
            ExpressionMember::Function(function) => function.to_css(dest)?,
            ExpressionMember::Math(math) => math.to_css(dest)?,
            ExpressionMember::Operator(..) => unreachable!(),
          }
          after_value = true;
        }
      }
    }
    Ok(())
  }
}

impl ToCss for FunctionTerm {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_str(&self.name)?;
    dest.write_char('(')?;
    self.arguments.to_css(dest)?;
    dest.write_char(')')
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::printer::PrinterOptions;

  fn expr(members: Vec<ExpressionMember>) -> Expression {
    Expression {
      members: members.into(),
      loc: SourceSpan::default(),
    }
  }

  #[test]
  fn values_are_space_separated_even_when_minified() {
    let e = expr(vec![
      ExpressionMember::Term(Term::new("1px")),
      ExpressionMember::Term(Term::new("solid")),
      ExpressionMember::Term(Term::new("red")),
    ]);
    assert_eq!(e.to_css_string(&PrinterOptions::minified()).unwrap(), "1px solid red");
  }

  #[test]
  fn commas_collapse_when_minified() {
    let e = expr(vec![
      ExpressionMember::Term(Term::new("a")),
      ExpressionMember::Operator(ExpressionOperator::Comma),
      ExpressionMember::Term(Term::new("b")),
    ]);
    assert_eq!(e.to_css_string(&PrinterOptions::default()).unwrap(), "a, b");
    assert_eq!(e.to_css_string(&PrinterOptions::minified()).unwrap(), "a,b");
  }

  #[test]
  fn slash_binds_tightly() {
    let e = expr(vec![
      ExpressionMember::Term(Term::new("12px")),
      ExpressionMember::Operator(ExpressionOperator::Slash),
      ExpressionMember::Term(Term::new("1.5")),
    ]);
    assert_eq!(e.to_css_string(&PrinterOptions::default()).unwrap(), "12px/1.5");
  }

  #[test]
  fn term_classification() {
    assert!(Term::new("-5.12px").is_numeric());
    assert!(Term::new(".75in").is_numeric());
    assert!(!Term::new("solid").is_numeric());
    assert!(Term::new("#AbCdEf").is_hash_color());
    assert!(Term::new("'x'").is_string());
  }
}
