//! The selector model.
//!
//! A selector is an ordered list of members: simple selectors and the
//! combinators between them. All names keep their source escapes textual.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;
use smallvec::SmallVec;

/// A comma-separated list of selectors, as found before a `{`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectorList(pub SmallVec<[Selector; 1]>);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
  pub members: Vec<SelectorMember>,
  pub loc: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorMember {
  Simple(SimpleSelector),
  Combinator(Combinator),
}

/// A combinator between two simple members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
  /// Whitespace.
  Descendant,
  /// `>`
  Child,
  /// `+`
  NextSibling,
  /// `~`
  LaterSibling,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
  /// An element name, optionally namespace-qualified.
  Type {
    /// `None` for no prefix, `Some("")` for `|name`, `Some("*")` for
    /// `*|name`, otherwise the declared prefix.
    namespace: Option<String>,
    name: String,
  },
  /// `*`, optionally namespace-qualified.
  Universal { namespace: Option<String> },
  /// `#id`
  Id(String),
  /// `.class`
  Class(String),
  /// `[name]`, `[name=value]`, `[name~=value]`, …
  Attribute(AttributeSelector),
  /// `:name` (also covers the single-colon legacy pseudo-elements, which
  /// serialize as written).
  PseudoClass(String),
  /// `::name`
  PseudoElement(String),
  /// `:name(…)` or `::name(…)`
  PseudoFunction(PseudoFunction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
  pub namespace: Option<String>,
  pub name: String,
  /// The operator and the raw value text (quotes preserved), if any.
  pub operation: Option<(AttributeOperator, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
  Equals,
  Includes,
  DashMatch,
  PrefixMatch,
  SuffixMatch,
  SubstringMatch,
}

impl AttributeOperator {
  pub fn as_str(&self) -> &'static str {
    match self {
      AttributeOperator::Equals => "=",
      AttributeOperator::Includes => "~=",
      AttributeOperator::DashMatch => "|=",
      AttributeOperator::PrefixMatch => "^=",
      AttributeOperator::SuffixMatch => "$=",
      AttributeOperator::SubstringMatch => "*=",
    }
  }
}

/// A functional pseudo such as `:not(…)`, `:nth-child(…)`, or `::slotted(…)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PseudoFunction {
  pub name: String,
  pub double_colon: bool,
  pub args: PseudoFunctionArgs,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoFunctionArgs {
  /// A nested selector list, for `:not()`, `:has()`, `:is()`, and friends.
  Selectors(SelectorList),
  /// Anything else (nth expressions, `:lang()` …), whitespace-normalized.
  Raw(String),
}

/// The functional pseudos whose argument is a selector list.
pub(crate) fn takes_selector_args(name: &str) -> bool {
  for known in [
    "not",
    "has",
    "is",
    "where",
    "matches",
    "any",
    "-moz-any",
    "-webkit-any",
    "host",
    "host-context",
    "slotted",
    "current",
  ] {
    if name.eq_ignore_ascii_case(known) {
      return true;
    }
  }
  false
}

impl SelectorList {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl ToCss for SelectorList {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for selector in &self.0 {
      if first {
        first = false;
      } else {
        dest.delim(',', false)?;
      }
      selector.to_css(dest)?;
    }
    Ok(())
  }
}

impl ToCss for Selector {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    for member in &self.members {
      match member {
        SelectorMember::Simple(simple) => simple.to_css(dest)?,
        SelectorMember::Combinator(combinator) => match combinator {
          // The descendant combinator is whitespace; it survives minification.
          Combinator::Descendant => dest.write_char(' ')?,
          Combinator::Child => dest.delim('>', true)?,
          Combinator::NextSibling => dest.delim('+', true)?,
          Combinator::LaterSibling => dest.delim('~', true)?,
        },
      }
    }
    Ok(())
  }
}

fn write_namespace<W>(namespace: &Option<String>, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
where
  W: std::fmt::Write,
{
  if let Some(ns) = namespace {
    dest.write_str(ns)?;
    dest.write_char('|')?;
  }
  Ok(())
}

impl ToCss for SimpleSelector {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    match self {
      SimpleSelector::Type { namespace, name } => {
        write_namespace(namespace, dest)?;
        dest.write_str(name)
      }
      SimpleSelector::Universal { namespace } => {
        write_namespace(namespace, dest)?;
        dest.write_char('*')
      }
      SimpleSelector::Id(name) => {
        dest.write_char('#')?;
        dest.write_str(name)
      }
      SimpleSelector::Class(name) => {
        dest.write_char('.')?;
        dest.write_str(name)
      }
      SimpleSelector::Attribute(attribute) => {
        dest.write_char('[')?;
        write_namespace(&attribute.namespace, dest)?;
        dest.write_str(&attribute.name)?;
        if let Some((operator, value)) = &attribute.operation {
          dest.write_str(operator.as_str())?;
          dest.write_str(value)?;
        }
        dest.write_char(']')
      }
      SimpleSelector::PseudoClass(name) => {
        dest.write_char(':')?;
        dest.write_str(name)
      }
      SimpleSelector::PseudoElement(name) => {
        dest.write_str("::")?;
        dest.write_str(name)
      }
      SimpleSelector::PseudoFunction(function) => {
        dest.write_char(':')?;
        if function.double_colon {
          dest.write_char(':')?;
        }
        dest.write_str(&function.name)?;
        dest.write_char('(')?;
        match &function.args {
          PseudoFunctionArgs::Selectors(list) => list.to_css(dest)?,
          PseudoFunctionArgs::Raw(raw) => dest.write_str(raw)?,
        }
        dest.write_char(')')
      }
    }
  }
}
