//! End-to-end parse/serialize behavior.

use csstree::error::{CollectingErrorHandler, ParserErrorKind, PrinterErrorKind};
use csstree::printer::{NewlineMode, PrinterOptions, RuleFilter};
use csstree::rules::CssRule;
use csstree::stylesheet::{CssVersion, ParserOptions, StyleSheet};
use csstree::traits::ToCss;
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn parse(css: &str) -> StyleSheet {
  StyleSheet::parse(css, &ParserOptions::default()).unwrap()
}

fn parse_tolerant(css: &str) -> StyleSheet {
  StyleSheet::parse(css, &ParserOptions::browser_compliant()).unwrap()
}

fn minify(css: &str) -> String {
  parse(css).to_css_string(&PrinterOptions::minified()).unwrap()
}

fn pretty(css: &str) -> String {
  parse(css).to_css_string(&PrinterOptions::default()).unwrap()
}

#[test]
fn empty_and_trivia_only_inputs_parse_to_zero_rules() {
  for input in ["", "   \n\t  ", "/* comment */", "/* a */ /* b */\n", "<!-- -->"] {
    let sheet = parse(input);
    assert_eq!(sheet.rules.len(), 0, "for {:?}", input);
    assert_eq!(sheet.to_css_string(&PrinterOptions::minified()).unwrap(), "");
  }
}

#[test]
fn numeric_terms_round_trip_byte_identically() {
  for value in ["-5", "+5", "5", "-5.12", "+5.12%", "5.12%", "-5px", "+5px", "5px", "u+1234", "#123"] {
    let css = format!("a{{x:{}}}", value);
    assert_eq!(minify(&css), css, "for {:?}", value);
  }
}

#[test]
fn string_quotes_and_hex_case_are_preserved() {
  assert_eq!(minify("a{content:\"hi\"}"), "a{content:\"hi\"}");
  assert_eq!(minify("a{content:'hi'}"), "a{content:'hi'}");
  assert_eq!(minify("a{color:#AbCdEf}"), "a{color:#AbCdEf}");
  assert_eq!(minify("a{color:#1234}"), "a{color:#1234}");
}

#[test]
fn identifier_escapes_stay_textual() {
  // The escape's terminating space is part of the identifier.
  assert_eq!(minify("#mask\\26 { color: red; }"), "#mask\\26 {color:red}");
}

#[test]
fn nested_block_recovery_differs_by_mode() {
  let input = ".class{color:red;.class{color:green}.class{color:blue}";

  let handler = Arc::new(CollectingErrorHandler::new());
  let tolerant = ParserOptions {
    browser_compliant: true,
    error_handler: Some(handler.clone()),
    ..ParserOptions::default()
  };
  let sheet = StyleSheet::parse(input, &tolerant).unwrap();
  assert_eq!(sheet.to_css_string(&PrinterOptions::minified()).unwrap(), "");
  assert!(handler.has_errors());

  let handler = Arc::new(CollectingErrorHandler::new());
  let strict = ParserOptions {
    error_handler: Some(handler.clone()),
    ..ParserOptions::default()
  };
  let sheet = StyleSheet::parse(input, &strict).unwrap();
  assert_eq!(
    sheet.to_css_string(&PrinterOptions::minified()).unwrap(),
    ".class{color:red}.class{color:blue}"
  );
  assert!(handler.has_errors());
}

#[test]
fn calc_preserves_grammar_whitespace_when_minified() {
  assert_eq!(
    minify(".x{left: calc(50% - (600px / 2 + var(--page-column-padding-x)));}"),
    ".x{left:calc(50% - (600px/2 + var(--page-column-padding-x)))}"
  );
}

#[test]
fn selector_pseudo_functions_minify_their_arguments() {
  assert_eq!(
    minify("section:not(:has(h1, h2, h3, h4, h5, h6)) { color:red; }"),
    "section:not(:has(h1,h2,h3,h4,h5,h6)){color:red}"
  );
}

#[test]
fn charset_rules_are_consumed_without_becoming_ast_nodes() {
  assert_eq!(minify("@charset \"iso-8859-1\"; div{color:red ; }"), "div{color:red}");
}

#[test]
fn nth_expressions_normalize_their_whitespace() {
  assert_eq!(minify("li:nth-child(2n + 1){color:red}"), "li:nth-child(2n+1){color:red}");
  assert_eq!(minify("li:nth-child(odd){color:red}"), "li:nth-child(odd){color:red}");
}

#[test]
fn combinators_and_attribute_selectors_round_trip() {
  assert_eq!(minify("a + b > c ~ d e {color:red}"), "a+b>c~d e{color:red}");
  assert_eq!(
    minify("a[href^=\"https\"][data-x~=y]{color:red}"),
    "a[href^=\"https\"][data-x~=y]{color:red}"
  );
  assert_eq!(minify("svg|rect, *|circle {x:1}"), "svg|rect,*|circle{x:1}");
}

#[test]
fn important_is_parsed_with_optional_whitespace() {
  assert_eq!(minify("a{color:red !important}"), "a{color:red!important}");
  assert_eq!(minify("a{color:red ! important}"), "a{color:red!important}");
  assert_eq!(pretty("a{color:red!important}"), "a {\n  color: red !important;\n}");
}

#[test]
fn pretty_printing_layout() {
  let css = ".a{color:red;margin:0}";
  assert_eq!(
    pretty(css),
    indoc! {"
      .a {
        color: red;
        margin: 0;
      }"}
  );
}

#[test]
fn media_rules_nest_and_round_trip() {
  let css = "@media print { div#container { width:100%; min-height:0px; } }";
  assert_eq!(minify(css), "@media print{div#container{width:100%;min-height:0px}}");
  assert_eq!(
    pretty(css),
    indoc! {"
      @media print {
        div#container {
          width: 100%;
          min-height: 0px;
        }
      }"}
  );

  let nested = "@media screen { @media (min-width: 600px) { a { x:1 } } }";
  assert_eq!(minify(nested), "@media screen{@media (min-width:600px){a{x:1}}}");
}

#[test]
fn media_queries_keep_their_qualifiers_and_features() {
  assert_eq!(
    minify("@media only screen and (min-width: 600px) and (monochrome) { a{x:1} }"),
    "@media only screen and (min-width:600px) and (monochrome){a{x:1}}"
  );
  assert_eq!(minify("@media print, screen { a{x:1} }"), "@media print,screen{a{x:1}}");
}

#[test]
fn import_rules_with_media_and_position_checking() {
  assert_eq!(
    minify("@import url(\"../dijit.css\");"),
    "@import url(\"../dijit.css\");"
  );
  assert_eq!(minify("@import \"plain.css\" print;"), "@import \"plain.css\" print;");

  let handler = Arc::new(CollectingErrorHandler::new());
  let options = ParserOptions {
    error_handler: Some(handler.clone()),
    ..ParserOptions::default()
  };
  let sheet = StyleSheet::parse("div{x:1} @import url(late.css);", &options).unwrap();
  // Order is preserved and the rule is kept; the violation is reported.
  assert_eq!(sheet.rules.len(), 2);
  assert!(handler.has_errors());
}

#[test]
fn namespace_rules_round_trip() {
  assert_eq!(
    minify("@namespace svg url(http://www.w3.org/2000/svg);"),
    "@namespace svg url(http://www.w3.org/2000/svg);"
  );
  assert_eq!(
    minify("@namespace \"http://www.w3.org/1999/xhtml\";"),
    "@namespace \"http://www.w3.org/1999/xhtml\";"
  );
}

#[test]
fn page_rules_with_margin_blocks() {
  let css = "@page :Section1 { size:8.5in 11.0in; margin:1.0in .75in 1.0in .75in; }";
  assert_eq!(
    minify(css),
    "@page :Section1{size:8.5in 11.0in;margin:1.0in .75in 1.0in .75in}"
  );

  assert_eq!(
    minify("@page :first { margin: 1in; @top-center { content: \"x\" } }"),
    "@page :first{margin:1in;@top-center{content:\"x\"}}"
  );
}

#[test]
fn font_face_and_viewport_rules() {
  assert_eq!(
    minify("@font-face { font-family: X; src: url(x.woff2); }"),
    "@font-face{font-family:X;src:url(x.woff2)}"
  );
  assert_eq!(
    minify("@-ms-viewport { width: device-width; }"),
    "@-ms-viewport{width:device-width}"
  );
}

#[test]
fn keyframes_rules_keep_vendor_prefixes_and_selectors() {
  assert_eq!(
    minify("@-webkit-keyframes spin { from { x:0 } 50% { x:1 } to { x:2 } }"),
    "@-webkit-keyframes spin{from{x:0}50%{x:1}to{x:2}}"
  );
}

#[test]
fn supports_conditions_keep_member_order() {
  let css = "@supports (display: grid) and (not (display: inline-grid)) { .x { color: red } }";
  assert_eq!(
    minify(css),
    "@supports (display:grid) and (not (display:inline-grid)){.x{color:red}}"
  );
}

#[test]
fn unknown_at_rules_are_captured_and_reemitted() {
  let css = "@font-feature-values Jupiter Sans { @styleset { nice-style: 12; } }";
  let sheet = parse(css);
  match &sheet.rules.0[0] {
    CssRule::Unknown(rule) => {
      assert_eq!(rule.name, "font-feature-values");
      assert_eq!(rule.prelude, "Jupiter Sans");
    }
    other => panic!("expected an unknown rule, got {:?}", other),
  }
  assert_eq!(
    minify(css),
    "@font-feature-values Jupiter Sans{@styleset { nice-style: 12; }}"
  );
}

#[test]
fn var_functions_accept_double_dash_identifiers() {
  assert_eq!(
    minify("a{color:var(--main-color, #333)}"),
    "a{color:var(--main-color,#333)}"
  );
  assert_eq!(minify("a{--main-color: #333}"), "a{--main-color:#333}");
}

#[test]
fn url_quoting_is_preserved_unless_forced() {
  assert_eq!(minify("a{background:url(bg.png)}"), "a{background:url(bg.png)}");
  assert_eq!(minify("a{background:url('bg.png')}"), "a{background:url('bg.png')}");

  let options = PrinterOptions {
    minify: true,
    quote_urls: true,
    ..PrinterOptions::default()
  };
  assert_eq!(
    parse("a{background:url(bg.png)}").to_css_string(&options).unwrap(),
    "a{background:url(\"bg.png\")}"
  );
}

// -- round-trip laws -------------------------------------------------------

const FIXTURE: &str = indoc! {"
  @import url(\"../dijit.css\");
  @namespace svg url(http://www.w3.org/2000/svg);

  a + b { border-top: 2px; }

  @page :Section1 { size: 8.5in 11.0in; margin: 1.0in .75in 1.0in .75in; }

  @media print {
    div#container { width: 100%; min-height: 0px; }
  }

  @supports (display: grid) {
    .grid { display: grid; }
  }

  @keyframes fade {
    from { opacity: 0; }
    to { opacity: 1; }
  }

  @font-face { font-family: X; src: url(x.woff2); }

  .c { left: calc(50% - (600px / 2 + var(--x))); background: url('p.png') no-repeat; }
"};

#[test]
fn parse_serialize_parse_is_identity_for_both_modes() {
  let sheet = parse(FIXTURE);
  for options in [PrinterOptions::default(), PrinterOptions::minified()] {
    let css = sheet.to_css_string(&options).unwrap();
    let reparsed = StyleSheet::parse(&css, &ParserOptions::default()).unwrap();
    assert_eq!(reparsed, sheet);
  }
}

#[test]
fn serialization_is_idempotent() {
  for options in [PrinterOptions::default(), PrinterOptions::minified()] {
    let once = parse(FIXTURE).to_css_string(&options).unwrap();
    let twice = StyleSheet::parse(&once, &ParserOptions::default())
      .unwrap()
      .to_css_string(&options)
      .unwrap();
    assert_eq!(twice, once);
  }
}

#[test]
fn deep_clones_are_equal_and_independent() {
  let sheet = parse(FIXTURE);
  let mut clone = sheet.clone();
  assert_eq!(clone, sheet);

  match &mut clone.rules.0[2] {
    CssRule::Style(rule) => {
      rule.declarations.remove_property("border-top");
    }
    _ => panic!("fixture changed"),
  }
  assert_ne!(clone, sheet);
  match &sheet.rules.0[2] {
    CssRule::Style(rule) => assert!(rule.declarations.get("border-top").is_some()),
    _ => unreachable!(),
  }
}

#[test]
fn equality_ignores_source_locations() {
  let spaced = parse("div {\n\n\n  color: red;\n}");
  let compact = parse("div{color:red}");
  assert_eq!(spaced, compact);
}

// -- tolerant mode ---------------------------------------------------------

#[test]
fn tolerant_mode_keeps_the_well_formed_subset() {
  let handler = Arc::new(CollectingErrorHandler::new());
  let options = ParserOptions {
    browser_compliant: true,
    error_handler: Some(handler.clone()),
    ..ParserOptions::default()
  };
  let css = ".a { color: red } ~ { color: blue } .b { color: green } .c { color:; top: 1px }";
  let sheet = StyleSheet::parse(css, &options).unwrap();
  assert_eq!(
    sheet.to_css_string(&PrinterOptions::minified()).unwrap(),
    ".a{color:red}.b{color:green}.c{top:1px}"
  );
  assert!(handler.errors().len() >= 2);
}

#[test]
fn tolerant_mode_drops_invalid_declarations_but_keeps_siblings() {
  let sheet = parse_tolerant(".a { color red; margin: 0; 42: x; top: 1px }");
  assert_eq!(
    sheet.to_css_string(&PrinterOptions::minified()).unwrap(),
    ".a{margin:0;top:1px}"
  );
}

#[test]
fn unterminated_string_is_fatal_only_in_strict_mode() {
  let err = StyleSheet::parse("a{content:\"abc", &ParserOptions::default()).unwrap_err();
  assert_eq!(err.kind, ParserErrorKind::UnterminatedString);

  let sheet = parse_tolerant("a{content:\"abc");
  assert_eq!(
    sheet.to_css_string(&PrinterOptions::minified()).unwrap(),
    "a{content:\"abc\"}"
  );
}

// -- charset handling ------------------------------------------------------

#[test]
fn byte_sources_honor_bom_and_charset_rules() {
  let utf8_bom = b"\xef\xbb\xbfdiv{color:red}";
  let sheet = StyleSheet::parse_bytes(utf8_bom, &ParserOptions::default()).unwrap();
  assert_eq!(sheet.to_css_string(&PrinterOptions::minified()).unwrap(), "div{color:red}");

  let latin1 = b"@charset \"iso-8859-1\"; a{content:\"\xe9\"}";
  let sheet = StyleSheet::parse_bytes(latin1, &ParserOptions::default()).unwrap();
  assert_eq!(
    sheet.to_css_string(&PrinterOptions::minified()).unwrap(),
    "a{content:\"\u{e9}\"}"
  );
}

#[test]
fn unsupported_charset_fails_the_read() {
  let err = StyleSheet::parse_bytes(b"@charset \"klingon-8\"; a{}", &ParserOptions::default()).unwrap_err();
  assert_eq!(err.kind, ParserErrorKind::UnsupportedCharset("klingon-8".into()));
}

// -- writer settings -------------------------------------------------------

#[test]
fn rule_filters_skip_their_kinds_silently() {
  let sheet = parse("@media print{a{x:1}} b{y:2}");
  let options = PrinterOptions {
    minify: true,
    rule_filter: RuleFilter::all() - RuleFilter::MEDIA,
    ..PrinterOptions::default()
  };
  assert_eq!(sheet.to_css_string(&options).unwrap(), "b{y:2}");
}

#[test]
fn remove_unnecessary_code_drops_empty_rules() {
  let sheet = parse(".a{} @media print{.b{}} .c{x:1}");
  let options = PrinterOptions {
    minify: true,
    remove_empty_rules: true,
    ..PrinterOptions::default()
  };
  assert_eq!(sheet.to_css_string(&options).unwrap(), ".c{x:1}");
}

#[test]
fn header_banner_is_emitted_before_rules() {
  let sheet = parse("a{x:1}");
  let options = PrinterOptions {
    minify: true,
    header: Some("generated - do not edit".into()),
    ..PrinterOptions::default()
  };
  assert_eq!(
    sheet.to_css_string(&options).unwrap(),
    "/* generated - do not edit */a{x:1}"
  );
}

#[test]
fn newline_mode_controls_line_terminators() {
  let sheet = parse("a{x:1}");
  let options = PrinterOptions {
    newline: NewlineMode::CrLf,
    ..PrinterOptions::default()
  };
  assert_eq!(sheet.to_css_string(&options).unwrap(), "a {\r\n  x: 1;\r\n}");
}

#[test]
fn css21_compat_rejects_css3_constructs() {
  let options = PrinterOptions {
    version: CssVersion::Css21,
    ..PrinterOptions::default()
  };

  let supports = parse("@supports (display: grid) { a{x:1} }");
  assert_eq!(
    supports.to_css_string(&options).unwrap_err().kind,
    PrinterErrorKind::NotSupportedInCssVersion { feature: "@supports" }
  );

  let calc = parse("a{width:calc(1px + 2px)}");
  assert_eq!(
    calc.to_css_string(&options).unwrap_err().kind,
    PrinterErrorKind::NotSupportedInCssVersion { feature: "calc()" }
  );

  // Plain CSS 2.1 content still serializes.
  assert_eq!(parse("a{x:1}").to_css_string(&options).unwrap(), "a {\n  x: 1;\n}");
}
