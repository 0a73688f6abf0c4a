//! Source positions and spans.

use std::fmt;

/// A line/column pair in the original source. Both are 1-based; column
/// counting honors the tab size configured on the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
  pub line: u32,
  pub column: u32,
}

impl Position {
  pub fn new(line: u32, column: u32) -> Position {
    Position { line, column }
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

/// The source range a node covers: inclusive start, exclusive end.
///
/// Spans never participate in node equality, so two structurally identical
/// trees compare equal no matter where they were parsed from. Use
/// [`SourceSpan::same_range`] to compare the ranges themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceSpan {
  pub start: Position,
  pub end: Position,
}

impl SourceSpan {
  pub fn new(start: Position, end: Position) -> SourceSpan {
    SourceSpan { start, end }
  }

  /// Compares the actual ranges, which `==` deliberately does not.
  pub fn same_range(&self, other: &SourceSpan) -> bool {
    self.start == other.start && self.end == other.end
  }
}

impl PartialEq for SourceSpan {
  fn eq(&self, _: &SourceSpan) -> bool {
    true
  }
}

impl Eq for SourceSpan {}

impl fmt::Display for SourceSpan {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}-{}", self.start, self.end)
  }
}
