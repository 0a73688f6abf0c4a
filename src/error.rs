//! Error types, recoverable-error handlers, and the process-wide handler
//! default.

use crate::lexer::Token;
use crate::location::Position;
use lazy_static::lazy_static;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

/// An error with a kind and an optional source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Error<T> {
  /// The type of error that occurred.
  pub kind: T,
  /// The position in the source where the error occurred.
  pub loc: Option<Position>,
}

impl<T: fmt::Display> fmt::Display for Error<T> {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    self.kind.fmt(f)?;
    if let Some(loc) = &self.loc {
      write!(f, " at {}", loc)?;
    }
    Ok(())
  }
}

impl<T: fmt::Display + fmt::Debug> std::error::Error for Error<T> {}

impl<T> Error<T> {
  pub(crate) fn new(kind: T, loc: Position) -> Error<T> {
    Error { kind, loc: Some(loc) }
  }
}

/// A parser error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParserErrorKind {
  /// The byte source could not be read.
  Io(String),
  /// An `@charset` rule named a charset that is not installed.
  UnsupportedCharset(String),
  /// A character that cannot begin any token.
  IllegalCharacter(char),
  /// An unexpected token was encountered.
  UnexpectedToken {
    /// What the grammar allowed at this point.
    expected: &'static str,
    /// The token that was found instead.
    found: String,
  },
  /// The input ended while a construct was still open.
  UnexpectedEndOfInput {
    /// What the grammar still required.
    expected: &'static str,
  },
  /// A selector that does not conform to the selector grammar.
  InvalidSelector(String),
  /// A declaration with a malformed property, missing colon, or bad value.
  InvalidDeclaration(String),
  /// Tokens other than whitespace between `!` and `important`.
  InvalidImportant,
  /// A malformed media query.
  InvalidMediaQuery,
  /// A malformed `@supports` condition.
  InvalidSupportsCondition,
  /// A malformed `calc()` expression.
  InvalidCalcExpression(String),
  /// A well-formed at-rule in a position where it is not permitted.
  UnexpectedRule {
    /// The at-rule name, without the `@`.
    name: String,
    /// A human-readable description of the violation.
    message: String,
  },
  /// A string literal left open at the end of a line or of the input.
  UnterminatedString,
  /// A block comment left open at the end of the input.
  UnterminatedComment,
  /// A `url(` token left open at the end of the input.
  UnterminatedUrl,
}

impl fmt::Display for ParserErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use ParserErrorKind::*;
    match self {
      Io(msg) => write!(f, "could not read source: {}", msg),
      UnsupportedCharset(name) => write!(f, "unsupported charset \"{}\"", name),
      IllegalCharacter(c) => write!(f, "illegal character {:?}", c),
      UnexpectedToken { expected, found } => {
        write!(f, "expected {}, found \"{}\"", expected, found)
      }
      UnexpectedEndOfInput { expected } => {
        write!(f, "unexpected end of input, expected {}", expected)
      }
      InvalidSelector(msg) => write!(f, "invalid selector: {}", msg),
      InvalidDeclaration(msg) => write!(f, "invalid declaration: {}", msg),
      InvalidImportant => write!(f, "unexpected tokens between \"!\" and \"important\""),
      InvalidMediaQuery => write!(f, "invalid media query"),
      InvalidSupportsCondition => write!(f, "invalid @supports condition"),
      InvalidCalcExpression(msg) => write!(f, "invalid calc() expression: {}", msg),
      UnexpectedRule { name, message } => write!(f, "unexpected @{} rule: {}", name, message),
      UnterminatedString => write!(f, "unterminated string"),
      UnterminatedComment => write!(f, "unterminated comment"),
      UnterminatedUrl => write!(f, "unterminated url()"),
    }
  }
}

/// A serializer error.
#[derive(Debug, Clone, PartialEq)]
pub enum PrinterErrorKind {
  /// An underlying formatter error.
  Fmt,
  /// The AST contains a construct that does not exist in the requested CSS
  /// version.
  NotSupportedInCssVersion {
    /// The offending construct.
    feature: &'static str,
  },
}

impl fmt::Display for PrinterErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      PrinterErrorKind::Fmt => write!(f, "formatter error"),
      PrinterErrorKind::NotSupportedInCssVersion { feature } => {
        write!(f, "{} cannot be serialized as CSS 2.1", feature)
      }
    }
  }
}

impl From<fmt::Error> for Error<PrinterErrorKind> {
  fn from(_: fmt::Error) -> Error<PrinterErrorKind> {
    Error {
      kind: PrinterErrorKind::Fmt,
      loc: None,
    }
  }
}

/// A structural error the parser recovered (or will recover) from, together
/// with the token range that was skipped to reach the synchronization point.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoverableError {
  /// What went wrong.
  pub error: Error<ParserErrorKind>,
  /// First and last skipped token, when recovery skipped anything.
  pub skipped: Option<(Token, Token)>,
}

impl fmt::Display for RecoverableError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    self.error.fmt(f)?;
    if let Some((from, to)) = &self.skipped {
      write!(f, " (skipped from {} to {})", from.span.start, to.span.end)?;
    }
    Ok(())
  }
}

/// Receives recoverable parse events.
///
/// In strict mode a handler that returns an error aborts the parse and the
/// error becomes the result of the read call. In browser-compliant mode the
/// return value is ignored: the parser has already decided to skip the
/// malformed construct and continue.
pub trait ParseErrorHandler: Send + Sync {
  /// A structural error with a synchronization point.
  fn on_recoverable_error(&self, error: &RecoverableError) -> Result<(), Error<ParserErrorKind>>;

  /// A well-formed at-rule that is not permitted in its context, e.g. a
  /// late `@charset` or an `@import` after a style rule.
  fn on_unexpected_rule(
    &self,
    name: &str,
    message: &str,
    position: Position,
  ) -> Result<(), Error<ParserErrorKind>> {
    self.on_recoverable_error(&RecoverableError {
      error: Error::new(
        ParserErrorKind::UnexpectedRule {
          name: name.into(),
          message: message.into(),
        },
        position,
      ),
      skipped: None,
    })
  }

  /// A character the lexer cannot begin a token with.
  fn on_illegal_character(&self, character: char, position: Position) -> Result<(), Error<ParserErrorKind>> {
    self.on_recoverable_error(&RecoverableError {
      error: Error::new(ParserErrorKind::IllegalCharacter(character), position),
      skipped: None,
    })
  }
}

/// Swallows every recoverable event.
#[derive(Debug, Default)]
pub struct IgnoringErrorHandler;

impl ParseErrorHandler for IgnoringErrorHandler {
  fn on_recoverable_error(&self, _: &RecoverableError) -> Result<(), Error<ParserErrorKind>> {
    Ok(())
  }
}

/// Logs every recoverable event through the `log` facade.
#[derive(Debug, Default)]
pub struct LoggingErrorHandler;

impl ParseErrorHandler for LoggingErrorHandler {
  fn on_recoverable_error(&self, error: &RecoverableError) -> Result<(), Error<ParserErrorKind>> {
    log::warn!("{}", error);
    Ok(())
  }
}

/// Turns the first recoverable event into a parse failure (strict mode only;
/// browser-compliant parses ignore the returned error).
#[derive(Debug, Default)]
pub struct ThrowingErrorHandler;

impl ParseErrorHandler for ThrowingErrorHandler {
  fn on_recoverable_error(&self, error: &RecoverableError) -> Result<(), Error<ParserErrorKind>> {
    Err(error.error.clone())
  }
}

/// Records every recoverable event, optionally forwarding each one to a
/// wrapped handler first.
#[derive(Default)]
pub struct CollectingErrorHandler {
  errors: Mutex<Vec<RecoverableError>>,
  inner: Option<Arc<dyn ParseErrorHandler>>,
}

impl CollectingErrorHandler {
  pub fn new() -> CollectingErrorHandler {
    CollectingErrorHandler::default()
  }

  /// Collects on top of another handler, e.g. collect-over-log.
  pub fn wrapping(inner: Arc<dyn ParseErrorHandler>) -> CollectingErrorHandler {
    CollectingErrorHandler {
      errors: Mutex::new(Vec::new()),
      inner: Some(inner),
    }
  }

  pub fn errors(&self) -> Vec<RecoverableError> {
    self.errors.lock().unwrap().clone()
  }

  pub fn has_errors(&self) -> bool {
    !self.errors.lock().unwrap().is_empty()
  }
}

impl ParseErrorHandler for CollectingErrorHandler {
  fn on_recoverable_error(&self, error: &RecoverableError) -> Result<(), Error<ParserErrorKind>> {
    let result = match &self.inner {
      Some(inner) => inner.on_recoverable_error(error),
      None => Ok(()),
    };
    self.errors.lock().unwrap().push(error.clone());
    result
  }
}

lazy_static! {
  static ref DEFAULT_ERROR_HANDLER: RwLock<Arc<dyn ParseErrorHandler>> =
    RwLock::new(Arc::new(LoggingErrorHandler) as Arc<dyn ParseErrorHandler>);
}

/// The process-wide handler used when `ParserOptions::error_handler` is not
/// set. Initially a [`LoggingErrorHandler`].
pub fn default_error_handler() -> Arc<dyn ParseErrorHandler> {
  DEFAULT_ERROR_HANDLER.read().unwrap().clone()
}

/// Replaces the process-wide default handler.
pub fn set_default_error_handler(handler: Arc<dyn ParseErrorHandler>) {
  *DEFAULT_ERROR_HANDLER.write().unwrap() = handler;
}
