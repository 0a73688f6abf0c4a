//! The top-level rule tree.

pub mod font_face;
pub mod import;
pub mod keyframes;
pub mod media;
pub mod namespace;
pub mod page;
pub mod style;
pub mod supports;
pub mod unknown;
pub mod viewport;

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::{Printer, PrinterOptions, RuleFilter};
use crate::traits::ToCss;
use font_face::FontFaceRule;
use import::ImportRule;
use keyframes::KeyframesRule;
use media::MediaRule;
use namespace::NamespaceRule;
use page::PageRule;
use style::StyleRule;
use supports::SupportsRule;
use unknown::UnknownRule;
use viewport::ViewportRule;

/// A top-level rule. `@media` and `@supports` nest further rules of this
/// same type.
#[derive(Debug, Clone, PartialEq)]
pub enum CssRule {
  Import(ImportRule),
  Namespace(NamespaceRule),
  Style(StyleRule),
  Media(MediaRule),
  Page(PageRule),
  FontFace(FontFaceRule),
  Keyframes(KeyframesRule),
  Viewport(ViewportRule),
  Supports(SupportsRule),
  Unknown(UnknownRule),
}

impl CssRule {
  pub fn loc(&self) -> SourceSpan {
    match self {
      CssRule::Import(rule) => rule.loc,
      CssRule::Namespace(rule) => rule.loc,
      CssRule::Style(rule) => rule.loc,
      CssRule::Media(rule) => rule.loc,
      CssRule::Page(rule) => rule.loc,
      CssRule::FontFace(rule) => rule.loc,
      CssRule::Keyframes(rule) => rule.loc,
      CssRule::Viewport(rule) => rule.loc,
      CssRule::Supports(rule) => rule.loc,
      CssRule::Unknown(rule) => rule.loc,
    }
  }

  /// Whether the serializer emits this rule under the given options,
  /// honoring the per-kind filter and the empty-body removal flag.
  pub(crate) fn should_emit(&self, options: &PrinterOptions) -> bool {
    let filter = options.rule_filter;
    match self {
      CssRule::Import(..) => true,
      CssRule::Namespace(..) => filter.contains(RuleFilter::NAMESPACE),
      CssRule::Style(rule) => !options.remove_empty_rules || !rule.declarations.is_empty(),
      CssRule::Media(rule) => {
        filter.contains(RuleFilter::MEDIA)
          && (!options.remove_empty_rules || rule.rules.0.iter().any(|r| r.should_emit(options)))
      }
      CssRule::Page(rule) => {
        filter.contains(RuleFilter::PAGE) && (!options.remove_empty_rules || !rule.body.is_empty())
      }
      CssRule::FontFace(rule) => {
        filter.contains(RuleFilter::FONT_FACE)
          && (!options.remove_empty_rules || !rule.declarations.is_empty())
      }
      CssRule::Keyframes(rule) => {
        filter.contains(RuleFilter::KEYFRAMES) && (!options.remove_empty_rules || !rule.blocks.is_empty())
      }
      CssRule::Viewport(..) => filter.contains(RuleFilter::VIEWPORT),
      CssRule::Supports(rule) => {
        filter.contains(RuleFilter::SUPPORTS)
          && (!options.remove_empty_rules || rule.rules.0.iter().any(|r| r.should_emit(options)))
      }
      CssRule::Unknown(..) => filter.contains(RuleFilter::UNKNOWN),
    }
  }
}

impl ToCss for CssRule {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    match self {
      CssRule::Import(rule) => rule.to_css(dest),
      CssRule::Namespace(rule) => rule.to_css(dest),
      CssRule::Style(rule) => rule.to_css(dest),
      CssRule::Media(rule) => rule.to_css(dest),
      CssRule::Page(rule) => rule.to_css(dest),
      CssRule::FontFace(rule) => rule.to_css(dest),
      CssRule::Keyframes(rule) => rule.to_css(dest),
      CssRule::Viewport(rule) => rule.to_css(dest),
      CssRule::Supports(rule) => rule.to_css(dest),
      CssRule::Unknown(rule) => rule.to_css(dest),
    }
  }
}

/// An ordered list of rules. Order is insertion order and is stable under
/// serialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CssRuleList(pub Vec<CssRule>);

impl CssRuleList {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }
}

impl ToCss for CssRuleList {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for rule in &self.0 {
      if !rule.should_emit(dest.options) {
        continue;
      }
      if first {
        first = false;
      } else {
        dest.newline()?;
      }
      rule.to_css(dest)?;
    }
    Ok(())
  }
}
