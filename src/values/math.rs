//! `calc()` expressions.
//!
//! The grammar distinguishes sums from products: `+` and `-` require
//! whitespace on both sides, `*` and `/` do not. The serializer keeps the
//! sum-operator whitespace even when minifying, since it is part of the
//! grammar rather than formatting.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;
use crate::values::expression::FunctionTerm;

/// A `calc(…)` (or vendor-prefixed variant) expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MathExpression {
  /// The function name as written, e.g. `calc` or `-webkit-calc`.
  pub name: String,
  pub members: Vec<MathMember>,
  pub loc: SourceSpan,
}

/// A member of the sum level of a `calc()` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MathMember {
  /// A product of one or more units.
  Product(MathProduct),
  /// A `+` or `-` between products.
  SumOperator(MathSumOperator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathSumOperator {
  Plus,
  Minus,
}

impl MathSumOperator {
  pub fn as_char(&self) -> char {
    match self {
      MathSumOperator::Plus => '+',
      MathSumOperator::Minus => '-',
    }
  }
}

/// A sequence of units joined by `*` and `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct MathProduct {
  pub members: Vec<MathProductMember>,
  pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MathProductMember {
  Unit(MathUnit),
  Operator(MathProductOperator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathProductOperator {
  Multiply,
  Divide,
}

impl MathProductOperator {
  pub fn as_char(&self) -> char {
    match self {
      MathProductOperator::Multiply => '*',
      MathProductOperator::Divide => '/',
    }
  }
}

/// The leaf level of a `calc()` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MathUnit {
  /// A numeric value in its textual form, e.g. `50%` or `600px`.
  Value(String),
  /// A parenthesized sub-expression.
  Group(Vec<MathMember>),
  /// A nested function such as `var(…)`.
  Function(FunctionTerm),
}

fn members_to_css<W>(members: &[MathMember], dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
where
  W: std::fmt::Write,
{
  for member in members {
    match member {
      MathMember::Product(product) => product.to_css(dest)?,
      MathMember::SumOperator(op) => {
        dest.write_char(' ')?;
        dest.write_char(op.as_char())?;
        dest.write_char(' ')?;
      }
    }
  }
  Ok(())
}

impl ToCss for MathExpression {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.require_css3("calc()")?;
    dest.write_str(&self.name)?;
    dest.write_char('(')?;
    members_to_css(&self.members, dest)?;
    dest.write_char(')')
  }
}

impl ToCss for MathProduct {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    for member in &self.members {
      match member {
        MathProductMember::Unit(unit) => unit.to_css(dest)?,
        MathProductMember::Operator(op) => {
          dest.whitespace()?;
          dest.write_char(op.as_char())?;
          dest.whitespace()?;
        }
      }
    }
    Ok(())
  }
}

impl ToCss for MathUnit {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    match self {
      MathUnit::Value(value) => dest.write_str(value),
      MathUnit::Group(members) => {
        dest.write_char('(')?;
        members_to_css(members, dest)?;
        dest.write_char(')')
      }
      MathUnit::Function(function) => function.to_css(dest),
    }
  }
}
