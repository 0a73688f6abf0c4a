//! URL values, as used by `@import`, `@namespace`, and `url()` terms.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;

/// A URL with its source quoting preserved: `url(a.png)`, `url("a.png")`,
/// and the plain string form `"a.png"` all round-trip as written.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlValue {
  /// The URL text, without quotes. Escapes are kept textual.
  pub url: String,
  /// The quote character used in the source, if any.
  pub quote: Option<char>,
  /// Whether the source used the `url(…)` form rather than a bare string.
  pub functional: bool,
  pub loc: SourceSpan,
}

impl UrlValue {
  /// An unquoted `url(…)` value.
  pub fn new(url: impl Into<String>) -> UrlValue {
    UrlValue {
      url: url.into(),
      quote: None,
      functional: true,
      loc: SourceSpan::default(),
    }
  }

  /// Builds a value from the raw text between the parentheses of a `url(`
  /// token, or from a raw string token.
  pub(crate) fn from_raw(raw: &str, functional: bool, loc: SourceSpan) -> UrlValue {
    let mut quote = None;
    let mut url = raw;
    if raw.len() >= 2 {
      let first = raw.as_bytes()[0];
      if (first == b'"' || first == b'\'') && raw.as_bytes()[raw.len() - 1] == first {
        quote = Some(first as char);
        url = &raw[1..raw.len() - 1];
      }
    }
    UrlValue {
      url: url.into(),
      quote,
      functional,
      loc,
    }
  }
}

impl ToCss for UrlValue {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let quote = match self.quote {
      Some(q) => Some(q),
      None if !self.functional || dest.options.quote_urls => Some('"'),
      None => None,
    };
    if self.functional {
      dest.write_str("url(")?;
    }
    if let Some(q) = quote {
      dest.write_char(q)?;
    }
    dest.write_str(&self.url)?;
    if let Some(q) = quote {
      dest.write_char(q)?;
    }
    if self.functional {
      dest.write_char(')')?;
    }
    Ok(())
  }
}
