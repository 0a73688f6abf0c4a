//! Depth-first traversal of a stylesheet.
//!
//! Begin callbacks fire pre-order and end callbacks post-order; each begin is
//! always paired with its end. Declarations arrive with the rule that
//! encloses them, passed as a parameter rather than stored as a back-pointer
//! (`None` for standalone declaration-list fragments). URL events cover
//! `@import` URLs and every `url(…)` term inside declaration values,
//! including those nested in function arguments and `calc()`.
//!
//! The visitor traverses by shared reference. In-place URL rewriting, the
//! one mutating traversal, goes through [`rewrite_urls`].

use crate::declaration::{Declaration, DeclarationBlock};
use crate::rules::font_face::FontFaceRule;
use crate::rules::import::ImportRule;
use crate::rules::keyframes::KeyframesRule;
use crate::rules::media::MediaRule;
use crate::rules::namespace::NamespaceRule;
use crate::rules::page::{PageBodyMember, PageRule};
use crate::rules::style::StyleRule;
use crate::rules::supports::SupportsRule;
use crate::rules::unknown::UnknownRule;
use crate::rules::viewport::ViewportRule;
use crate::rules::{CssRule, CssRuleList};
use crate::selector::Selector;
use crate::stylesheet::StyleSheet;
use crate::values::expression::{Expression, ExpressionMember};
use crate::values::math::{MathMember, MathProductMember, MathUnit};
use crate::values::url::UrlValue;

/// Callbacks for [`visit`]. Every method has an empty default, so a visitor
/// implements only what it cares about.
#[allow(unused_variables)]
pub trait StylesheetVisitor {
  fn begin_stylesheet(&mut self, stylesheet: &StyleSheet) {}
  fn end_stylesheet(&mut self, stylesheet: &StyleSheet) {}

  fn on_import(&mut self, rule: &ImportRule) {}
  fn on_namespace(&mut self, rule: &NamespaceRule) {}
  fn on_unknown_rule(&mut self, rule: &UnknownRule) {}

  fn begin_style_rule(&mut self, rule: &StyleRule) {}
  fn end_style_rule(&mut self, rule: &StyleRule) {}
  fn begin_media_rule(&mut self, rule: &MediaRule) {}
  fn end_media_rule(&mut self, rule: &MediaRule) {}
  fn begin_supports_rule(&mut self, rule: &SupportsRule) {}
  fn end_supports_rule(&mut self, rule: &SupportsRule) {}
  fn begin_page_rule(&mut self, rule: &PageRule) {}
  fn end_page_rule(&mut self, rule: &PageRule) {}
  fn begin_font_face_rule(&mut self, rule: &FontFaceRule) {}
  fn end_font_face_rule(&mut self, rule: &FontFaceRule) {}
  fn begin_keyframes_rule(&mut self, rule: &KeyframesRule) {}
  fn end_keyframes_rule(&mut self, rule: &KeyframesRule) {}
  fn begin_viewport_rule(&mut self, rule: &ViewportRule) {}
  fn end_viewport_rule(&mut self, rule: &ViewportRule) {}

  fn visit_selector(&mut self, selector: &Selector) {}
  fn visit_declaration(&mut self, declaration: &Declaration, enclosing: Option<&CssRule>) {}
  fn visit_url(&mut self, url: &UrlValue) {}
}

/// Traverses the stylesheet depth-first.
pub fn visit<V: StylesheetVisitor>(stylesheet: &StyleSheet, visitor: &mut V) {
  visitor.begin_stylesheet(stylesheet);
  visit_rule_list(&stylesheet.rules, visitor);
  visitor.end_stylesheet(stylesheet);
}

/// Traverses a standalone declaration list; declarations arrive without an
/// enclosing rule.
pub fn visit_declaration_block<V: StylesheetVisitor>(block: &DeclarationBlock, visitor: &mut V) {
  for declaration in &block.declarations {
    visitor.visit_declaration(declaration, None);
    visit_expression_urls(&declaration.value, visitor);
  }
}

fn visit_rule_list<V: StylesheetVisitor>(rules: &CssRuleList, visitor: &mut V) {
  for rule in &rules.0 {
    visit_rule(rule, visitor);
  }
}

fn visit_rule<V: StylesheetVisitor>(rule: &CssRule, visitor: &mut V) {
  match rule {
    CssRule::Import(import) => {
      visitor.on_import(import);
      visitor.visit_url(&import.url);
    }
    CssRule::Namespace(namespace) => visitor.on_namespace(namespace),
    CssRule::Unknown(unknown) => visitor.on_unknown_rule(unknown),
    CssRule::Style(style) => {
      visitor.begin_style_rule(style);
      for selector in &style.selectors.0 {
        visitor.visit_selector(selector);
      }
      visit_declarations(&style.declarations, rule, visitor);
      visitor.end_style_rule(style);
    }
    CssRule::Media(media) => {
      visitor.begin_media_rule(media);
      visit_rule_list(&media.rules, visitor);
      visitor.end_media_rule(media);
    }
    CssRule::Supports(supports) => {
      visitor.begin_supports_rule(supports);
      visit_rule_list(&supports.rules, visitor);
      visitor.end_supports_rule(supports);
    }
    CssRule::Page(page) => {
      visitor.begin_page_rule(page);
      for member in &page.body {
        match member {
          PageBodyMember::Declaration(declaration) => {
            visitor.visit_declaration(declaration, Some(rule));
            visit_expression_urls(&declaration.value, visitor);
          }
          PageBodyMember::MarginBlock(margin) => visit_declarations(&margin.declarations, rule, visitor),
        }
      }
      visitor.end_page_rule(page);
    }
    CssRule::FontFace(font_face) => {
      visitor.begin_font_face_rule(font_face);
      visit_declarations(&font_face.declarations, rule, visitor);
      visitor.end_font_face_rule(font_face);
    }
    CssRule::Keyframes(keyframes) => {
      visitor.begin_keyframes_rule(keyframes);
      for block in &keyframes.blocks {
        visit_declarations(&block.declarations, rule, visitor);
      }
      visitor.end_keyframes_rule(keyframes);
    }
    CssRule::Viewport(viewport) => {
      visitor.begin_viewport_rule(viewport);
      visit_declarations(&viewport.declarations, rule, visitor);
      visitor.end_viewport_rule(viewport);
    }
  }
}

fn visit_declarations<V: StylesheetVisitor>(block: &DeclarationBlock, enclosing: &CssRule, visitor: &mut V) {
  for declaration in &block.declarations {
    visitor.visit_declaration(declaration, Some(enclosing));
    visit_expression_urls(&declaration.value, visitor);
  }
}

fn visit_expression_urls<V: StylesheetVisitor>(expression: &Expression, visitor: &mut V) {
  for member in &expression.members {
    match member {
      ExpressionMember::Url(url) => visitor.visit_url(url),
      ExpressionMember::Function(function) => visit_expression_urls(&function.arguments, visitor),
      ExpressionMember::Math(math) => visit_math_urls(&math.members, visitor),
      _ => {}
    }
  }
}

fn visit_math_urls<V: StylesheetVisitor>(members: &[MathMember], visitor: &mut V) {
  for member in members {
    if let MathMember::Product(product) = member {
      for member in &product.members {
        match member {
          MathProductMember::Unit(MathUnit::Function(function)) => {
            visit_expression_urls(&function.arguments, visitor)
          }
          MathProductMember::Unit(MathUnit::Group(group)) => visit_math_urls(group, visitor),
          _ => {}
        }
      }
    }
  }
}

/// Collects every URL in document order.
#[derive(Debug, Default)]
pub struct UrlCollector {
  pub urls: Vec<String>,
}

impl StylesheetVisitor for UrlCollector {
  fn visit_url(&mut self, url: &UrlValue) {
    self.urls.push(url.url.clone());
  }
}

/// The hook for [`rewrite_urls`]: return `Some` to replace a URL, `None` to
/// leave it as is.
pub trait UrlRewriter {
  fn rewrite(&mut self, url: &str) -> Option<String>;
}

impl<F: FnMut(&str) -> Option<String>> UrlRewriter for F {
  fn rewrite(&mut self, url: &str) -> Option<String> {
    self(url)
  }
}

/// Applies `rewriter` to every URL the visitor protocol would report,
/// writing replacements back in place.
pub fn rewrite_urls<R: UrlRewriter>(stylesheet: &mut StyleSheet, rewriter: &mut R) {
  for rule in &mut stylesheet.rules.0 {
    rewrite_rule(rule, rewriter);
  }
}

fn rewrite_rule<R: UrlRewriter>(rule: &mut CssRule, rewriter: &mut R) {
  match rule {
    CssRule::Import(import) => apply(&mut import.url, rewriter),
    CssRule::Namespace(..) | CssRule::Unknown(..) => {}
    CssRule::Style(style) => rewrite_block(&mut style.declarations, rewriter),
    CssRule::Media(media) => {
      for rule in &mut media.rules.0 {
        rewrite_rule(rule, rewriter);
      }
    }
    CssRule::Supports(supports) => {
      for rule in &mut supports.rules.0 {
        rewrite_rule(rule, rewriter);
      }
    }
    CssRule::Page(page) => {
      for member in &mut page.body {
        match member {
          PageBodyMember::Declaration(declaration) => rewrite_expression(&mut declaration.value, rewriter),
          PageBodyMember::MarginBlock(margin) => rewrite_block(&mut margin.declarations, rewriter),
        }
      }
    }
    CssRule::FontFace(font_face) => rewrite_block(&mut font_face.declarations, rewriter),
    CssRule::Keyframes(keyframes) => {
      for block in &mut keyframes.blocks {
        rewrite_block(&mut block.declarations, rewriter);
      }
    }
    CssRule::Viewport(viewport) => rewrite_block(&mut viewport.declarations, rewriter),
  }
}

fn rewrite_block<R: UrlRewriter>(block: &mut DeclarationBlock, rewriter: &mut R) {
  for declaration in &mut block.declarations {
    rewrite_expression(&mut declaration.value, rewriter);
  }
}

fn rewrite_expression<R: UrlRewriter>(expression: &mut Expression, rewriter: &mut R) {
  for member in &mut expression.members {
    match member {
      ExpressionMember::Url(url) => apply(url, rewriter),
      ExpressionMember::Function(function) => rewrite_expression(&mut function.arguments, rewriter),
      ExpressionMember::Math(math) => rewrite_math(&mut math.members, rewriter),
      _ => {}
    }
  }
}

fn rewrite_math<R: UrlRewriter>(members: &mut [MathMember], rewriter: &mut R) {
  for member in members {
    if let MathMember::Product(product) = member {
      for member in &mut product.members {
        match member {
          MathProductMember::Unit(MathUnit::Function(function)) => {
            rewrite_expression(&mut function.arguments, rewriter)
          }
          MathProductMember::Unit(MathUnit::Group(group)) => rewrite_math(group, rewriter),
          _ => {}
        }
      }
    }
  }
}

fn apply<R: UrlRewriter>(url: &mut UrlValue, rewriter: &mut R) {
  if let Some(replacement) = rewriter.rewrite(&url.url) {
    url.url = replacement;
  }
}
