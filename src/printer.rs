//! The serializer's output abstraction and its settings.

use crate::error::{Error, PrinterErrorKind};
use crate::stylesheet::CssVersion;
use bitflags::bitflags;

bitflags! {
  /// Which at-rule kinds the serializer emits. A cleared flag silently
  /// skips that rule kind. Style and import rules are always written.
  #[derive(Debug, Clone, Copy, PartialEq, Eq)]
  pub struct RuleFilter: u8 {
    const NAMESPACE = 1 << 0;
    const FONT_FACE = 1 << 1;
    const KEYFRAMES = 1 << 2;
    const MEDIA = 1 << 3;
    const PAGE = 1 << 4;
    const VIEWPORT = 1 << 5;
    const SUPPORTS = 1 << 6;
    const UNKNOWN = 1 << 7;
  }
}

impl Default for RuleFilter {
  fn default() -> RuleFilter {
    RuleFilter::all()
  }
}

/// Line terminator written between pretty-printed rules and declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewlineMode {
  #[default]
  Lf,
  CrLf,
  Cr,
  Platform,
}

impl NewlineMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      NewlineMode::Lf => "\n",
      NewlineMode::CrLf => "\r\n",
      NewlineMode::Cr => "\r",
      NewlineMode::Platform => {
        if cfg!(windows) {
          "\r\n"
        } else {
          "\n"
        }
      }
    }
  }
}

/// Options that control serialization.
#[derive(Debug, Clone)]
pub struct PrinterOptions {
  /// Omit all optional whitespace, newlines, and trailing semicolons.
  pub minify: bool,
  /// Skip rules with empty bodies and empty declaration blocks entirely.
  pub remove_empty_rules: bool,
  /// The string written per indentation level when pretty-printing.
  pub indent: String,
  pub newline: NewlineMode,
  /// Write url tokens quoted even when their bareword form is legal.
  pub quote_urls: bool,
  /// A banner comment emitted before the first rule.
  pub header: Option<String>,
  pub rule_filter: RuleFilter,
  /// Serializing a CSS 3 construct under `CssVersion::Css21` fails.
  pub version: CssVersion,
}

impl Default for PrinterOptions {
  fn default() -> PrinterOptions {
    PrinterOptions {
      minify: false,
      remove_empty_rules: false,
      indent: "  ".into(),
      newline: NewlineMode::default(),
      quote_urls: false,
      header: None,
      rule_filter: RuleFilter::default(),
      version: CssVersion::default(),
    }
  }
}

impl PrinterOptions {
  pub fn minified() -> PrinterOptions {
    PrinterOptions {
      minify: true,
      ..PrinterOptions::default()
    }
  }
}

/// Wraps a `std::fmt::Write` destination with the indentation, whitespace,
/// and version bookkeeping the `ToCss` impls need.
pub struct Printer<'a, W> {
  dest: &'a mut W,
  pub(crate) options: &'a PrinterOptions,
  indent_level: u32,
}

impl<'a, W: std::fmt::Write + Sized> Printer<'a, W> {
  pub fn new(dest: &'a mut W, options: &'a PrinterOptions) -> Printer<'a, W> {
    Printer {
      dest,
      options,
      indent_level: 0,
    }
  }

  pub fn minify(&self) -> bool {
    self.options.minify
  }

  pub fn write_str(&mut self, s: &str) -> Result<(), Error<PrinterErrorKind>> {
    self.dest.write_str(s)?;
    Ok(())
  }

  pub fn write_char(&mut self, c: char) -> Result<(), Error<PrinterErrorKind>> {
    self.dest.write_char(c)?;
    Ok(())
  }

  /// A space, unless minifying.
  pub fn whitespace(&mut self) -> Result<(), Error<PrinterErrorKind>> {
    if self.options.minify {
      return Ok(());
    }
    self.write_char(' ')
  }

  /// `delim` with optional whitespace on either side.
  pub fn delim(&mut self, delim: char, ws_before: bool) -> Result<(), Error<PrinterErrorKind>> {
    if ws_before {
      self.whitespace()?;
    }
    self.write_char(delim)?;
    self.whitespace()
  }

  pub fn newline(&mut self) -> Result<(), Error<PrinterErrorKind>> {
    if self.options.minify {
      return Ok(());
    }
    self.dest.write_str(self.options.newline.as_str())?;
    for _ in 0..self.indent_level {
      self.dest.write_str(&self.options.indent)?;
    }
    Ok(())
  }

  pub fn indent(&mut self) {
    self.indent_level += 1;
  }

  pub fn dedent(&mut self) {
    self.indent_level = self.indent_level.saturating_sub(1);
  }

  /// Fails when the configured CSS version cannot express `feature`.
  pub fn require_css3(&self, feature: &'static str) -> Result<(), Error<PrinterErrorKind>> {
    if self.options.version == CssVersion::Css21 {
      return Err(Error {
        kind: PrinterErrorKind::NotSupportedInCssVersion { feature },
        loc: None,
      });
    }
    Ok(())
  }
}
