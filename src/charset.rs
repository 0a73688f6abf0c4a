//! Charset detection and byte-source decoding.
//!
//! Determination order: a recognized byte-order mark wins, then a leading
//! `@charset "…"` directive read as US-ASCII, then the caller's fallback.

use crate::error::{Error, ParserErrorKind};
use crate::location::Position;
use encoding_rs::{Encoding, UTF_8};

const CHARSET_PREFIX: &[u8] = b"@charset \"";

/// Determines the encoding of `bytes` without decoding them.
pub fn detect(bytes: &[u8], fallback: &'static Encoding) -> Result<&'static Encoding, Error<ParserErrorKind>> {
  if let Some((encoding, _)) = Encoding::for_bom(bytes) {
    return Ok(encoding);
  }

  if bytes.starts_with(CHARSET_PREFIX) {
    let rest = &bytes[CHARSET_PREFIX.len()..];
    if let Some(end) = rest.iter().position(|&b| b == b'"') {
      let label = &rest[..end];
      return lookup(label);
    }
  }

  Ok(fallback)
}

/// Resolves a charset label from an `@charset` rule.
///
/// `utf-16be` and `utf-16le` collapse to UTF-8: an `@charset` directive can
/// only be read as ASCII, so a genuine UTF-16 stream would already have been
/// decided by its BOM.
pub fn lookup(label: &[u8]) -> Result<&'static Encoding, Error<ParserErrorKind>> {
  if label.eq_ignore_ascii_case(b"utf-16be") || label.eq_ignore_ascii_case(b"utf-16le") {
    return Ok(UTF_8);
  }

  Encoding::for_label(label).ok_or_else(|| {
    Error::new(
      ParserErrorKind::UnsupportedCharset(String::from_utf8_lossy(label).into_owned()),
      Position::new(1, 1),
    )
  })
}

/// Decodes `bytes` into text, applying charset detection first.
///
/// Decoding never fails: malformed sequences under the chosen charset are
/// replaced with U+FFFD. Only an unknown `@charset` label is an error.
pub fn decode(bytes: &[u8], fallback: &'static Encoding) -> Result<String, Error<ParserErrorKind>> {
  let encoding = detect(bytes, fallback)?;
  // decode() sniffs the BOM itself, so the BOM still wins if the fallback
  // disagrees, and its bytes are consumed rather than emitted.
  let (text, _, _) = encoding.decode(bytes);
  Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
  use super::*;
  use encoding_rs::{UTF_16BE, UTF_16LE, WINDOWS_1252};

  #[test]
  fn bom_wins() {
    assert_eq!(detect(b"\xef\xbb\xbfdiv{}", WINDOWS_1252).unwrap(), UTF_8);
    assert_eq!(detect(b"\xfe\xff\x00d", UTF_8).unwrap(), UTF_16BE);
    assert_eq!(detect(b"\xff\xfed\x00", UTF_8).unwrap(), UTF_16LE);
  }

  #[test]
  fn charset_rule_is_honored() {
    let css = b"@charset \"windows-1252\"; div{}";
    assert_eq!(detect(css, UTF_8).unwrap(), WINDOWS_1252);
  }

  #[test]
  fn utf16_labels_collapse_to_utf8() {
    assert_eq!(detect(b"@charset \"UTF-16BE\"; div{}", WINDOWS_1252).unwrap(), UTF_8);
    assert_eq!(detect(b"@charset \"utf-16le\"; div{}", WINDOWS_1252).unwrap(), UTF_8);
  }

  #[test]
  fn unknown_charset_is_an_error() {
    let err = detect(b"@charset \"no-such-charset\"; div{}", UTF_8).unwrap_err();
    assert_eq!(
      err.kind,
      ParserErrorKind::UnsupportedCharset("no-such-charset".into())
    );
  }

  #[test]
  fn fallback_applies_otherwise() {
    assert_eq!(detect(b"div{}", WINDOWS_1252).unwrap(), WINDOWS_1252);
  }

  #[test]
  fn decode_strips_the_bom() {
    assert_eq!(decode(b"\xef\xbb\xbfdiv{}", UTF_8).unwrap(), "div{}");
  }

  #[test]
  fn decode_replaces_malformed_sequences() {
    let text = decode(b"div{content:\"\xff\"}", UTF_8).unwrap();
    assert!(text.contains('\u{fffd}'));
  }

  #[test]
  fn decode_single_byte_charset() {
    let text = decode(b"@charset \"windows-1252\"; a{content:\"\xe9\"}", UTF_8).unwrap();
    assert!(text.contains('\u{e9}'));
  }
}
