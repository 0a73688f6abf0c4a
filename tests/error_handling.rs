//! Handler semantics, parse modes, and source locations.

use csstree::error::{
  default_error_handler, set_default_error_handler, CollectingErrorHandler, LoggingErrorHandler,
  ParseErrorHandler, ParserErrorKind, RecoverableError, ThrowingErrorHandler,
};
use csstree::location::Position;
use csstree::printer::PrinterOptions;
use csstree::rules::CssRule;
use csstree::stylesheet::{CssVersion, ParserOptions, StyleSheet};
use csstree::traits::ToCss;
use csstree::values::expression::ExpressionMember;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn with_handler(handler: Arc<dyn ParseErrorHandler>, browser_compliant: bool) -> ParserOptions {
  ParserOptions {
    browser_compliant,
    error_handler: Some(handler),
    ..ParserOptions::default()
  }
}

#[test]
fn a_throwing_handler_aborts_a_strict_parse() {
  let options = with_handler(Arc::new(ThrowingErrorHandler), false);
  let err = StyleSheet::parse(".a { color red; }", &options).unwrap_err();
  assert!(matches!(err.kind, ParserErrorKind::InvalidDeclaration(..)));
}

#[test]
fn a_throwing_handler_cannot_abort_a_tolerant_parse() {
  let options = with_handler(Arc::new(ThrowingErrorHandler), true);
  let sheet = StyleSheet::parse(".a { color red; top: 1px }", &options).unwrap();
  assert_eq!(
    sheet.to_css_string(&PrinterOptions::minified()).unwrap(),
    ".a{top:1px}"
  );
}

#[test]
fn collecting_over_throwing_still_aborts_but_records() {
  let collector = Arc::new(CollectingErrorHandler::wrapping(Arc::new(ThrowingErrorHandler)));
  let options = with_handler(collector.clone(), false);
  assert!(StyleSheet::parse(".a { color red; }", &options).is_err());
  assert_eq!(collector.errors().len(), 1);
}

#[test]
fn events_arrive_in_source_order_with_skipped_ranges() {
  let collector = Arc::new(CollectingErrorHandler::new());
  let options = with_handler(collector.clone(), true);
  StyleSheet::parse(".a { one two; three: ; four: 4 } ~ {}", &options).unwrap();

  let errors: Vec<RecoverableError> = collector.errors();
  assert!(errors.len() >= 3);
  let positions: Vec<Position> = errors.iter().filter_map(|e| e.error.loc).collect();
  let mut sorted = positions.clone();
  sorted.sort_by_key(|p| (p.line, p.column));
  assert_eq!(positions, sorted);

  // The first event skipped from the malformed value up to its `;`.
  let (from, to) = errors[0].skipped.as_ref().expect("a skipped range");
  assert!(from.span.start.column < to.span.end.column);
}

#[test]
fn illegal_characters_reach_their_callback_and_are_skipped_in_tolerant_mode() {
  #[derive(Default)]
  struct IllegalChars(std::sync::Mutex<Vec<char>>);

  impl ParseErrorHandler for IllegalChars {
    fn on_recoverable_error(&self, _: &RecoverableError) -> Result<(), csstree::error::Error<ParserErrorKind>> {
      Ok(())
    }
    fn on_illegal_character(
      &self,
      character: char,
      _: Position,
    ) -> Result<(), csstree::error::Error<ParserErrorKind>> {
      self.0.lock().unwrap().push(character);
      Ok(())
    }
  }

  let handler = Arc::new(IllegalChars::default());
  let options = with_handler(handler.clone(), true);
  let sheet = StyleSheet::parse("a\u{1}{x:1}", &options).unwrap();
  assert_eq!(sheet.to_css_string(&PrinterOptions::minified()).unwrap(), "a{x:1}");
  assert_eq!(*handler.0.lock().unwrap(), vec!['\u{1}']);
}

#[test]
fn late_charset_rules_are_reported_as_unexpected() {
  let collector = Arc::new(CollectingErrorHandler::new());
  let options = with_handler(collector.clone(), false);
  let sheet = StyleSheet::parse("a{x:1} @charset \"utf-8\";", &options).unwrap();
  assert_eq!(sheet.rules.len(), 1);
  let errors = collector.errors();
  assert!(errors
    .iter()
    .any(|e| matches!(&e.error.kind, ParserErrorKind::UnexpectedRule { name, .. } if name == "charset")));
}

#[test]
fn the_process_wide_default_handler_is_swappable() {
  let collector = Arc::new(CollectingErrorHandler::new());
  set_default_error_handler(collector.clone());
  // No explicit handler: the parse uses the process-wide default.
  StyleSheet::parse(".a { color red; }", &ParserOptions::default()).unwrap();
  set_default_error_handler(Arc::new(LoggingErrorHandler));

  assert!(collector.has_errors());
  let _ = default_error_handler();
}

#[test]
fn css21_mode_downgrades_css3_at_rules_to_unknown() {
  let options = ParserOptions {
    version: CssVersion::Css21,
    ..ParserOptions::default()
  };
  let sheet = StyleSheet::parse("@supports (display: grid) { a { x:1 } }", &options).unwrap();
  assert!(matches!(&sheet.rules.0[0], CssRule::Unknown(rule) if rule.name == "supports"));

  let sheet = StyleSheet::parse("a { width: calc(1px) }", &options).unwrap();
  match &sheet.rules.0[0] {
    CssRule::Style(rule) => {
      let value = &rule.declarations.get("width").unwrap().value;
      assert!(matches!(&value.members[0], ExpressionMember::Function(f) if f.name == "calc"));
    }
    _ => unreachable!(),
  }
}

#[test]
fn node_spans_track_lines_and_columns() {
  let sheet = StyleSheet::parse("a{x:1}\n  b{y:2}", &ParserOptions::default()).unwrap();
  let first = sheet.rules.0[0].loc();
  let second = sheet.rules.0[1].loc();
  assert_eq!(first.start, Position::new(1, 1));
  assert_eq!(first.end, Position::new(1, 7));
  assert_eq!(second.start, Position::new(2, 3));
  assert_eq!(second.end, Position::new(2, 9));
}

#[test]
fn error_positions_honor_the_configured_tab_size() {
  let err = StyleSheet::parse("\tcolor", &ParserOptions::default()).unwrap_err();
  // Default tab size 8: the tab lands the next column on 9.
  assert_eq!(err.loc, Some(Position::new(1, 14)));

  let options = ParserOptions {
    tab_size: 4,
    ..ParserOptions::default()
  };
  let err = StyleSheet::parse("\tcolor", &options).unwrap_err();
  assert_eq!(err.loc, Some(Position::new(1, 10)));
}
