//! Traversal, URL extraction, and in-place URL rewriting.

use csstree::declaration::{Declaration, DeclarationBlock};
use csstree::printer::PrinterOptions;
use csstree::rules::CssRule;
use csstree::stylesheet::{ParserOptions, StyleSheet};
use csstree::traits::ToCss;
use csstree::values::url::UrlValue;
use csstree::visitor::{
  rewrite_urls, visit, visit_declaration_block, StylesheetVisitor, UrlCollector,
};
use indoc::indoc;
use pretty_assertions::assert_eq;

const SAMPLE: &str = indoc! {"
  @import url(\"../dijit.css\");

  a + b { border-top: 2px; }

  @page :Section1 { size: 8.5in 11.0in; margin: 1.0in .75in 1.0in .75in; }

  @media print {
    div#container { width: 100%; min-height: 0px; }
  }
"};

fn parse(css: &str) -> StyleSheet {
  StyleSheet::parse(css, &ParserOptions::default()).unwrap()
}

#[test]
fn the_import_is_the_only_url_event_in_the_sample() {
  let mut collector = UrlCollector::default();
  visit(&parse(SAMPLE), &mut collector);
  assert_eq!(collector.urls, vec!["../dijit.css".to_string()]);
}

#[test]
fn declaration_urls_are_also_reported_in_document_order() {
  let css = indoc! {"
    @import url(first.css);
    a { background: url(second.png) no-repeat; }
    @media print { b { cursor: url('third.cur'), auto; } }
    .c { width: calc(100% - var(--pad, url(fourth.png))); }
  "};
  let mut collector = UrlCollector::default();
  visit(&parse(css), &mut collector);
  assert_eq!(
    collector.urls,
    vec![
      "first.css".to_string(),
      "second.png".to_string(),
      "third.cur".to_string(),
      "fourth.png".to_string(),
    ]
  );
}

#[derive(Default)]
struct BalanceVisitor {
  depth: i32,
  max_depth: i32,
  begins: u32,
  ends: u32,
  selectors: u32,
  declarations: u32,
}

impl BalanceVisitor {
  fn begin(&mut self) {
    self.begins += 1;
    self.depth += 1;
    self.max_depth = self.max_depth.max(self.depth);
  }

  fn end(&mut self) {
    self.ends += 1;
    self.depth -= 1;
    assert!(self.depth >= 0, "end without matching begin");
  }
}

impl StylesheetVisitor for BalanceVisitor {
  fn begin_style_rule(&mut self, _: &csstree::rules::style::StyleRule) {
    self.begin();
  }
  fn end_style_rule(&mut self, _: &csstree::rules::style::StyleRule) {
    self.end();
  }
  fn begin_media_rule(&mut self, _: &csstree::rules::media::MediaRule) {
    self.begin();
  }
  fn end_media_rule(&mut self, _: &csstree::rules::media::MediaRule) {
    self.end();
  }
  fn begin_page_rule(&mut self, _: &csstree::rules::page::PageRule) {
    self.begin();
  }
  fn end_page_rule(&mut self, _: &csstree::rules::page::PageRule) {
    self.end();
  }
  fn visit_selector(&mut self, _: &csstree::selector::Selector) {
    self.selectors += 1;
  }
  fn visit_declaration(&mut self, _: &Declaration, _: Option<&CssRule>) {
    self.declarations += 1;
  }
}

#[test]
fn begin_and_end_callbacks_balance_and_nest() {
  let mut visitor = BalanceVisitor::default();
  visit(&parse(SAMPLE), &mut visitor);
  assert_eq!(visitor.begins, visitor.ends);
  assert_eq!(visitor.depth, 0);
  // The style rule inside @media nests below it.
  assert_eq!(visitor.max_depth, 2);
  assert_eq!(visitor.selectors, 2);
  assert_eq!(visitor.declarations, 5);
}

#[derive(Default)]
struct EnclosingKinds(Vec<(String, Option<&'static str>)>);

impl StylesheetVisitor for EnclosingKinds {
  fn visit_declaration(&mut self, declaration: &Declaration, enclosing: Option<&CssRule>) {
    let kind = enclosing.map(|rule| match rule {
      CssRule::Style(..) => "style",
      CssRule::Page(..) => "page",
      CssRule::FontFace(..) => "font-face",
      _ => "other",
    });
    self.0.push((declaration.property.clone(), kind));
  }
}

#[test]
fn declarations_carry_their_enclosing_rule() {
  let css = "a { color: red } @page { margin: 1in } @font-face { src: url(x.woff2) }";
  let mut visitor = EnclosingKinds::default();
  visit(&parse(css), &mut visitor);
  assert_eq!(
    visitor.0,
    vec![
      ("color".to_string(), Some("style")),
      ("margin".to_string(), Some("page")),
      ("src".to_string(), Some("font-face")),
    ]
  );
}

#[test]
fn declaration_list_fragments_have_no_enclosing_rule() {
  let block = DeclarationBlock::parse("color: red; background: url(a.png)", &ParserOptions::default()).unwrap();
  let mut visitor = EnclosingKinds::default();
  visit_declaration_block(&block, &mut visitor);
  assert_eq!(
    visitor.0,
    vec![("color".to_string(), None), ("background".to_string(), None)]
  );

  let mut collector = UrlCollector::default();
  visit_declaration_block(&block, &mut collector);
  assert_eq!(collector.urls, vec!["a.png".to_string()]);
}

#[test]
fn identity_rewrites_leave_the_output_unchanged() {
  let mut sheet = parse(SAMPLE);
  let before = sheet.to_css_string(&PrinterOptions::minified()).unwrap();
  rewrite_urls(&mut sheet, &mut |_: &str| None);
  let after = sheet.to_css_string(&PrinterOptions::minified()).unwrap();
  assert_eq!(after, before);
}

#[test]
fn rewrites_are_applied_in_place() {
  let css = "@import url(a.css); x { background: url('b.png'); width: calc(1px + var(--u, url(c.png))); }";
  let mut sheet = parse(css);
  rewrite_urls(&mut sheet, &mut |url: &str| Some(format!("https://cdn.example/{}", url)));

  let mut collector = UrlCollector::default();
  visit(&sheet, &mut collector);
  assert_eq!(
    collector.urls,
    vec![
      "https://cdn.example/a.css".to_string(),
      "https://cdn.example/b.png".to_string(),
      "https://cdn.example/c.png".to_string(),
    ]
  );

  // Quoting style survives the rewrite.
  assert_eq!(
    sheet.to_css_string(&PrinterOptions::minified()).unwrap(),
    "@import url(https://cdn.example/a.css);x{background:url('https://cdn.example/b.png');\
     width:calc(1px + var(--u,url(https://cdn.example/c.png)))}"
  );
}

#[test]
fn mutating_below_the_current_node_is_visible_within_the_traversal() {
  // The mutation API: edit a rule taken out of the sheet, then check the
  // next full traversal sees it.
  let mut sheet = parse("a { background: url(old.png) }");
  if let CssRule::Style(rule) = &mut sheet.rules.0[0] {
    let declaration = rule.declarations.get_mut("background").unwrap();
    if let csstree::values::expression::ExpressionMember::Url(url) = &mut declaration.value.members[0] {
      *url = UrlValue::new("new.png");
    }
  }
  let mut collector = UrlCollector::default();
  visit(&sheet, &mut collector);
  assert_eq!(collector.urls, vec!["new.png".to_string()]);
}
