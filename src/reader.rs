//! The preprocessed character stream the lexer pulls from.
//!
//! Applies the CSS input preprocessing rules: `\r\n`, `\r`, and `\f` become
//! `\n`, NUL becomes U+FFFD. Tracks 1-based line/column positions, advancing
//! the column to the next tab stop for `\t`.

use crate::location::Position;
use std::collections::VecDeque;
use std::str::Chars;

pub(crate) const DEFAULT_TAB_SIZE: u32 = 8;

pub(crate) struct CharReader<'a> {
  raw: Chars<'a>,
  raw_pending: Option<char>,
  lookahead: VecDeque<char>,
  line: u32,
  column: u32,
  tab_size: u32,
}

impl<'a> CharReader<'a> {
  pub fn new(input: &'a str, tab_size: u32) -> CharReader<'a> {
    CharReader {
      raw: input.chars(),
      raw_pending: None,
      lookahead: VecDeque::new(),
      line: 1,
      column: 1,
      tab_size: tab_size.max(1),
    }
  }

  /// Position of the character `next()` would return.
  pub fn position(&self) -> Position {
    Position::new(self.line, self.column)
  }

  /// Peeks `n` characters ahead; `peek(0)` is the character `next()` would
  /// return.
  pub fn peek(&mut self, n: usize) -> Option<char> {
    while self.lookahead.len() <= n {
      match self.produce() {
        Some(c) => self.lookahead.push_back(c),
        None => return None,
      }
    }
    self.lookahead.get(n).copied()
  }

  pub fn next(&mut self) -> Option<char> {
    let c = match self.lookahead.pop_front() {
      Some(c) => c,
      None => self.produce()?,
    };
    match c {
      '\n' => {
        self.line += 1;
        self.column = 1;
      }
      '\t' => {
        self.column += self.tab_size - (self.column - 1) % self.tab_size;
      }
      _ => self.column += 1,
    }
    Some(c)
  }

  fn raw_next(&mut self) -> Option<char> {
    self.raw_pending.take().or_else(|| self.raw.next())
  }

  fn produce(&mut self) -> Option<char> {
    match self.raw_next()? {
      '\r' => {
        match self.raw_next() {
          Some('\n') | None => {}
          Some(other) => self.raw_pending = Some(other),
        }
        Some('\n')
      }
      '\u{c}' => Some('\n'),
      '\0' => Some('\u{fffd}'),
      c => Some(c),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn collect(input: &str) -> String {
    let mut reader = CharReader::new(input, DEFAULT_TAB_SIZE);
    let mut out = String::new();
    while let Some(c) = reader.next() {
      out.push(c);
    }
    out
  }

  #[test]
  fn line_endings_are_normalized() {
    assert_eq!(collect("a\r\nb\rc\u{c}d"), "a\nb\nc\nd");
  }

  #[test]
  fn nul_becomes_replacement_character() {
    assert_eq!(collect("a\0b"), "a\u{fffd}b");
  }

  #[test]
  fn positions_track_lines_and_columns() {
    let mut reader = CharReader::new("ab\ncd", DEFAULT_TAB_SIZE);
    assert_eq!(reader.position(), Position::new(1, 1));
    reader.next();
    assert_eq!(reader.position(), Position::new(1, 2));
    reader.next();
    reader.next();
    assert_eq!(reader.position(), Position::new(2, 1));
  }

  #[test]
  fn tabs_advance_to_the_next_tab_stop() {
    let mut reader = CharReader::new("\ta", 8);
    reader.next();
    assert_eq!(reader.position(), Position::new(1, 9));

    let mut reader = CharReader::new("ab\tc", 4);
    reader.next();
    reader.next();
    reader.next();
    assert_eq!(reader.position(), Position::new(1, 5));
  }

  #[test]
  fn peek_does_not_consume() {
    let mut reader = CharReader::new("xyz", DEFAULT_TAB_SIZE);
    assert_eq!(reader.peek(0), Some('x'));
    assert_eq!(reader.peek(2), Some('z'));
    assert_eq!(reader.peek(3), None);
    assert_eq!(reader.next(), Some('x'));
    assert_eq!(reader.position(), Position::new(1, 2));
  }
}
