//! The token producer.
//!
//! Tokens carry their literal source text so that numbers, strings, hex
//! colors, and escape sequences round-trip byte-identically. Escapes are
//! never decoded; `\26 ` stays `\26 ` including its terminating space.

use crate::error::{Error, ParseErrorHandler, ParserErrorKind, RecoverableError};
use crate::location::SourceSpan;
use crate::reader::CharReader;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Whitespace,
  Comment,
  Ident,
  AtKeyword,
  Hash,
  String,
  /// A string with an unescaped line break in it. Ends before the break.
  BadString,
  Url,
  Number,
  Percentage,
  Dimension,
  UnicodeRange,
  /// An identifier immediately followed by `(`. The text is the identifier.
  Function,
  LBrace,
  RBrace,
  LParen,
  RParen,
  LBracket,
  RBracket,
  Comma,
  Semicolon,
  Colon,
  Plus,
  Greater,
  Tilde,
  Asterisk,
  Slash,
  Equals,
  Pipe,
  Exclamation,
  /// `~=`
  Includes,
  /// `|=`
  DashMatch,
  /// `^=`
  PrefixMatch,
  /// `$=`
  SuffixMatch,
  /// `*=`
  SubstringMatch,
  /// `<!--`
  Cdo,
  /// `-->`
  Cdc,
  /// Any other character that forms a one-character token.
  Delim,
  Eof,
}

/// A single CSS token: kind, literal text, and the source range it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
  pub kind: TokenKind,
  /// The literal text. Leading sigils are not included: a hash token stores
  /// its name without `#`, an at-keyword without `@`, a function name
  /// without `(`, a url token only the text between the parentheses.
  /// Strings keep their quotes.
  pub text: String,
  pub span: SourceSpan,
}

impl Token {
  pub fn new(kind: TokenKind, text: impl Into<String>, span: SourceSpan) -> Token {
    Token {
      kind,
      text: text.into(),
      span,
    }
  }

  pub fn is(&self, kind: TokenKind) -> bool {
    self.kind == kind
  }

  pub fn is_delim(&self, c: char) -> bool {
    self.kind == TokenKind::Delim && self.text.len() == c.len_utf8() && self.text.starts_with(c)
  }

  /// Reconstructs the source form of the token, sigils included.
  pub(crate) fn write_raw(&self, out: &mut String) {
    match self.kind {
      TokenKind::Hash => {
        out.push('#');
        out.push_str(&self.text);
      }
      TokenKind::AtKeyword => {
        out.push('@');
        out.push_str(&self.text);
      }
      TokenKind::Function => {
        out.push_str(&self.text);
        out.push('(');
      }
      TokenKind::Url => {
        out.push_str("url(");
        out.push_str(&self.text);
        out.push(')');
      }
      TokenKind::Eof => {}
      _ => out.push_str(&self.text),
    }
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let mut s = String::new();
    self.write_raw(&mut s);
    f.write_str(&s)
  }
}

fn is_ident_start(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_' || c >= '\u{80}'
}

fn is_ident_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || c == '_' || c == '-' || c >= '\u{80}'
}

fn is_ws(c: char) -> bool {
  c == ' ' || c == '\t' || c == '\n'
}

pub(crate) struct Lexer<'a> {
  reader: CharReader<'a>,
  tolerant: bool,
  handler: &'a Arc<dyn ParseErrorHandler>,
}

/// Tokenizes the whole input, ending with an `Eof` token.
///
/// In strict mode an unterminated string aborts tokenization; every other
/// irregularity is routed through the handler and recovered locally.
pub(crate) fn tokenize(
  input: &str,
  tab_size: u32,
  tolerant: bool,
  handler: &Arc<dyn ParseErrorHandler>,
) -> Result<Vec<Token>, Error<ParserErrorKind>> {
  let mut lexer = Lexer {
    reader: CharReader::new(input, tab_size),
    tolerant,
    handler,
  };
  let mut tokens = Vec::new();
  loop {
    let token = lexer.next_token()?;
    let done = token.kind == TokenKind::Eof;
    tokens.push(token);
    if done {
      return Ok(tokens);
    }
  }
}

impl<'a> Lexer<'a> {
  fn next_token(&mut self) -> Result<Token, Error<ParserErrorKind>> {
    loop {
      let start = self.reader.position();
      let c = match self.reader.peek(0) {
        Some(c) => c,
        None => return Ok(Token::new(TokenKind::Eof, "", SourceSpan::new(start, start))),
      };

      let token = match c {
        c if is_ws(c) => self.consume_whitespace(),
        '/' => match self.reader.peek(1) {
          Some('*') => self.consume_block_comment()?,
          Some('/') => self.consume_line_comment(),
          _ => self.punct(TokenKind::Slash),
        },
        '"' | '\'' => self.consume_string(c)?,
        '#' => {
          self.reader.next();
          if self.at_name_char() {
            let name = self.consume_name();
            self.token(TokenKind::Hash, name, start)
          } else {
            self.token(TokenKind::Delim, "#", start)
          }
        }
        '@' => {
          self.reader.next();
          if self.at_ident_start() {
            let name = self.consume_name();
            self.token(TokenKind::AtKeyword, name, start)
          } else {
            self.token(TokenKind::Delim, "@", start)
          }
        }
        'u' | 'U' => {
          if self.at_unicode_range() {
            self.consume_unicode_range()
          } else {
            self.consume_ident_like()
          }
        }
        '+' => {
          if self.starts_number() {
            self.consume_numeric()
          } else {
            self.punct(TokenKind::Plus)
          }
        }
        '-' => {
          if self.reader.peek(1) == Some('-') && self.reader.peek(2) == Some('>') {
            self.reader.next();
            self.reader.next();
            self.reader.next();
            self.token(TokenKind::Cdc, "-->", start)
          } else if self.starts_number() {
            self.consume_numeric()
          } else if self.at_ident_start_after_dash() {
            self.consume_ident_like()
          } else {
            self.punct(TokenKind::Delim)
          }
        }
        '.' => {
          if self.starts_number() {
            self.consume_numeric()
          } else {
            self.punct(TokenKind::Delim)
          }
        }
        '<' => {
          if self.reader.peek(1) == Some('!') && self.reader.peek(2) == Some('-') && self.reader.peek(3) == Some('-')
          {
            for _ in 0..4 {
              self.reader.next();
            }
            self.token(TokenKind::Cdo, "<!--", start)
          } else {
            self.punct(TokenKind::Delim)
          }
        }
        '~' => self.punct_or_match(TokenKind::Tilde, TokenKind::Includes),
        '|' => self.punct_or_match(TokenKind::Pipe, TokenKind::DashMatch),
        '^' => self.punct_or_match(TokenKind::Delim, TokenKind::PrefixMatch),
        '$' => self.punct_or_match(TokenKind::Delim, TokenKind::SuffixMatch),
        '*' => self.punct_or_match(TokenKind::Asterisk, TokenKind::SubstringMatch),
        '{' => self.punct(TokenKind::LBrace),
        '}' => self.punct(TokenKind::RBrace),
        '(' => self.punct(TokenKind::LParen),
        ')' => self.punct(TokenKind::RParen),
        '[' => self.punct(TokenKind::LBracket),
        ']' => self.punct(TokenKind::RBracket),
        ',' => self.punct(TokenKind::Comma),
        ';' => self.punct(TokenKind::Semicolon),
        ':' => self.punct(TokenKind::Colon),
        '>' => self.punct(TokenKind::Greater),
        '=' => self.punct(TokenKind::Equals),
        '!' => self.punct(TokenKind::Exclamation),
        c if c.is_ascii_digit() => self.consume_numeric(),
        c if is_ident_start(c) || c == '\\' => self.consume_ident_like(),
        c if c.is_ascii_punctuation() => self.punct(TokenKind::Delim),
        c => {
          // Nothing can begin with this character.
          let pos = self.reader.position();
          self.reader.next();
          if !self.tolerant {
            self.handler.on_illegal_character(c, pos)?;
          } else {
            let _ = self.handler.on_illegal_character(c, pos);
          }
          continue;
        }
      };
      return Ok(token);
    }
  }

  fn token(&self, kind: TokenKind, text: impl Into<String>, start: crate::location::Position) -> Token {
    Token::new(kind, text, SourceSpan::new(start, self.reader.position()))
  }

  fn punct(&mut self, kind: TokenKind) -> Token {
    let start = self.reader.position();
    let c = self.reader.next().unwrap();
    self.token(kind, c.to_string(), start)
  }

  /// A single-character token, or the two-character attribute matcher if the
  /// next character is `=`.
  fn punct_or_match(&mut self, single: TokenKind, matcher: TokenKind) -> Token {
    let start = self.reader.position();
    let c = self.reader.next().unwrap();
    if self.reader.peek(0) == Some('=') {
      self.reader.next();
      let mut text = c.to_string();
      text.push('=');
      self.token(matcher, text, start)
    } else {
      self.token(single, c.to_string(), start)
    }
  }

  fn consume_whitespace(&mut self) -> Token {
    let start = self.reader.position();
    let mut text = String::new();
    while let Some(c) = self.reader.peek(0) {
      if !is_ws(c) {
        break;
      }
      text.push(self.reader.next().unwrap());
    }
    self.token(TokenKind::Whitespace, text, start)
  }

  fn consume_block_comment(&mut self) -> Result<Token, Error<ParserErrorKind>> {
    let start = self.reader.position();
    let mut text = String::from("/*");
    self.reader.next();
    self.reader.next();
    loop {
      match self.reader.next() {
        Some('*') => {
          if self.reader.peek(0) == Some('/') {
            self.reader.next();
            text.push_str("*/");
            return Ok(self.token(TokenKind::Comment, text, start));
          }
          text.push('*');
        }
        Some(c) => text.push(c),
        None => {
          let err = RecoverableError {
            error: Error::new(ParserErrorKind::UnterminatedComment, start),
            skipped: None,
          };
          if !self.tolerant {
            self.handler.on_recoverable_error(&err)?;
          } else {
            let _ = self.handler.on_recoverable_error(&err);
          }
          return Ok(self.token(TokenKind::Comment, text, start));
        }
      }
    }
  }

  // `//` comments are whitespace-equivalent.
  fn consume_line_comment(&mut self) -> Token {
    let start = self.reader.position();
    let mut text = String::new();
    while let Some(c) = self.reader.peek(0) {
      if c == '\n' {
        break;
      }
      text.push(self.reader.next().unwrap());
    }
    self.token(TokenKind::Comment, text, start)
  }

  fn consume_string(&mut self, quote: char) -> Result<Token, Error<ParserErrorKind>> {
    let start = self.reader.position();
    let mut text = String::new();
    text.push(self.reader.next().unwrap());
    loop {
      match self.reader.peek(0) {
        Some(c) if c == quote => {
          text.push(self.reader.next().unwrap());
          return Ok(self.token(TokenKind::String, text, start));
        }
        Some('\\') => {
          self.reader.next();
          match self.reader.peek(0) {
            // Line continuation: the backslash and the break are dropped.
            Some('\n') => {
              self.reader.next();
            }
            Some(_) => {
              text.push('\\');
              text.push(self.reader.next().unwrap());
            }
            None => {}
          }
        }
        Some('\n') => {
          // The break is not consumed; it terminates the bad string.
          let err = RecoverableError {
            error: Error::new(ParserErrorKind::UnterminatedString, start),
            skipped: None,
          };
          if !self.tolerant {
            self.handler.on_recoverable_error(&err)?;
          } else {
            let _ = self.handler.on_recoverable_error(&err);
          }
          return Ok(self.token(TokenKind::BadString, text, start));
        }
        None => {
          if !self.tolerant {
            return Err(Error::new(ParserErrorKind::UnterminatedString, start));
          }
          text.push(quote);
          return Ok(self.token(TokenKind::String, text, start));
        }
        Some(_) => text.push(self.reader.next().unwrap()),
      }
    }
  }

  fn at_name_char(&mut self) -> bool {
    match self.reader.peek(0) {
      Some('\\') => true,
      Some(c) => is_ident_char(c),
      None => false,
    }
  }

  fn at_ident_start(&mut self) -> bool {
    match self.reader.peek(0) {
      Some('\\') => true,
      Some('-') => matches!(self.reader.peek(1), Some(c) if is_ident_start(c) || c == '-' || c == '\\'),
      Some(c) => is_ident_start(c),
      None => false,
    }
  }

  // The reader is positioned on a `-` that is not a number start.
  fn at_ident_start_after_dash(&mut self) -> bool {
    matches!(self.reader.peek(1), Some(c) if is_ident_start(c) || c == '-' || c == '\\')
  }

  fn starts_number(&mut self) -> bool {
    match self.reader.peek(0) {
      Some(c) if c.is_ascii_digit() => true,
      Some('.') => matches!(self.reader.peek(1), Some(c) if c.is_ascii_digit()),
      Some('+') | Some('-') => match self.reader.peek(1) {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => matches!(self.reader.peek(2), Some(c) if c.is_ascii_digit()),
        _ => false,
      },
      _ => false,
    }
  }

  /// Consumes a name, keeping escape sequences textual. The single optional
  /// whitespace terminating a hex escape belongs to the escape and is kept.
  fn consume_name(&mut self) -> String {
    let mut name = String::new();
    loop {
      match self.reader.peek(0) {
        Some('\\') => {
          self.reader.next();
          self.push_escape(&mut name);
        }
        Some(c) if is_ident_char(c) => {
          name.push(self.reader.next().unwrap());
        }
        _ => return name,
      }
    }
  }

  // Called with the reader positioned after the backslash.
  fn push_escape(&mut self, out: &mut String) {
    match self.reader.peek(0) {
      Some(c) if c.is_ascii_hexdigit() => {
        out.push('\\');
        let mut digits = 0;
        while digits < 6 {
          match self.reader.peek(0) {
            Some(c) if c.is_ascii_hexdigit() => {
              out.push(self.reader.next().unwrap());
              digits += 1;
            }
            _ => break,
          }
        }
        if matches!(self.reader.peek(0), Some(c) if is_ws(c)) {
          out.push(self.reader.next().unwrap());
        }
      }
      Some('\n') | None => {
        // An invalid escape; keep the lone backslash.
        out.push('\\');
      }
      Some(_) => {
        out.push('\\');
        out.push(self.reader.next().unwrap());
      }
    }
  }

  fn consume_ident_like(&mut self) -> Token {
    let start = self.reader.position();
    let name = self.consume_name();
    if self.reader.peek(0) == Some('(') {
      self.reader.next();
      if name.eq_ignore_ascii_case("url") {
        return self.consume_url(start);
      }
      return self.token(TokenKind::Function, name, start);
    }
    self.token(TokenKind::Ident, name, start)
  }

  /// Consumes the remainder of a `url(` token. Lenient in both modes: the
  /// inner text is taken verbatim up to the closing parenthesis, surrounding
  /// whitespace trimmed, quotes preserved.
  fn consume_url(&mut self, start: crate::location::Position) -> Token {
    let mut text = String::new();
    loop {
      match self.reader.peek(0) {
        Some(')') => {
          self.reader.next();
          break;
        }
        Some('\\') => {
          self.reader.next();
          self.push_escape(&mut text);
        }
        Some(_) => text.push(self.reader.next().unwrap()),
        None => {
          let err = RecoverableError {
            error: Error::new(ParserErrorKind::UnterminatedUrl, start),
            skipped: None,
          };
          let _ = self.handler.on_recoverable_error(&err);
          break;
        }
      }
    }
    let trimmed = text.trim_matches(|c: char| is_ws(c)).to_string();
    self.token(TokenKind::Url, trimmed, start)
  }

  fn at_unicode_range(&mut self) -> bool {
    self.reader.peek(1) == Some('+')
      && matches!(self.reader.peek(2), Some(c) if c.is_ascii_hexdigit() || c == '?')
  }

  fn consume_unicode_range(&mut self) -> Token {
    let start = self.reader.position();
    let mut text = String::new();
    text.push(self.reader.next().unwrap());
    text.push(self.reader.next().unwrap());
    let mut digits = 0;
    while digits < 6 {
      match self.reader.peek(0) {
        Some(c) if c.is_ascii_hexdigit() || c == '?' => {
          text.push(self.reader.next().unwrap());
          digits += 1;
        }
        _ => break,
      }
    }
    if self.reader.peek(0) == Some('-')
      && matches!(self.reader.peek(1), Some(c) if c.is_ascii_hexdigit())
    {
      text.push(self.reader.next().unwrap());
      let mut digits = 0;
      while digits < 6 {
        match self.reader.peek(0) {
          Some(c) if c.is_ascii_hexdigit() => {
            text.push(self.reader.next().unwrap());
            digits += 1;
          }
          _ => break,
        }
      }
    }
    self.token(TokenKind::UnicodeRange, text, start)
  }

  fn consume_numeric(&mut self) -> Token {
    let start = self.reader.position();
    let mut text = String::new();
    if matches!(self.reader.peek(0), Some('+') | Some('-')) {
      text.push(self.reader.next().unwrap());
    }
    self.consume_digits(&mut text);
    if self.reader.peek(0) == Some('.') && matches!(self.reader.peek(1), Some(c) if c.is_ascii_digit()) {
      text.push(self.reader.next().unwrap());
      self.consume_digits(&mut text);
    }
    if matches!(self.reader.peek(0), Some('e') | Some('E')) {
      let sign = matches!(self.reader.peek(1), Some('+') | Some('-'));
      let digit_at = if sign { 2 } else { 1 };
      if matches!(self.reader.peek(digit_at), Some(c) if c.is_ascii_digit()) {
        text.push(self.reader.next().unwrap());
        if sign {
          text.push(self.reader.next().unwrap());
        }
        self.consume_digits(&mut text);
      }
    }

    if self.reader.peek(0) == Some('%') {
      text.push(self.reader.next().unwrap());
      return self.token(TokenKind::Percentage, text, start);
    }
    if self.at_ident_start() {
      let unit = self.consume_name();
      text.push_str(&unit);
      return self.token(TokenKind::Dimension, text, start);
    }
    self.token(TokenKind::Number, text, start)
  }

  fn consume_digits(&mut self, out: &mut String) {
    while let Some(c) = self.reader.peek(0) {
      if !c.is_ascii_digit() {
        break;
      }
      out.push(self.reader.next().unwrap());
    }
  }
}
