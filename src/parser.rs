//! The recursive-descent grammar and its error recovery.
//!
//! Recoverable errors skip to a synchronization point: `;` inside a
//! declaration block, the matching `}` of a rule, the matching `)` of a
//! function. Browser-compliant mode skips with brace awareness and drops the
//! malformed construct; strict mode reports through the handler and, when a
//! skip runs out of input before a synchronization point, fails the parse.

use crate::declaration::{Declaration, DeclarationBlock};
use crate::error::{Error, ParseErrorHandler, ParserErrorKind, RecoverableError};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::location::{Position, SourceSpan};
use crate::media_query::{MediaFeature, MediaList, MediaQualifier, MediaQuery};
use crate::rules::font_face::FontFaceRule;
use crate::rules::import::ImportRule;
use crate::rules::keyframes::{is_valid_keyframe_selector, KeyframesBlock, KeyframesRule};
use crate::rules::media::MediaRule;
use crate::rules::namespace::NamespaceRule;
use crate::rules::page::{is_page_margin_box, PageBodyMember, PageMarginRule, PageRule};
use crate::rules::style::StyleRule;
use crate::rules::supports::{SupportsCondition, SupportsConditionMember, SupportsOperator, SupportsRule};
use crate::rules::unknown::UnknownRule;
use crate::rules::viewport::ViewportRule;
use crate::rules::{CssRule, CssRuleList};
use crate::selector::{
  takes_selector_args, AttributeOperator, AttributeSelector, Combinator, PseudoFunction,
  PseudoFunctionArgs, Selector, SelectorList, SelectorMember, SimpleSelector,
};
use crate::stylesheet::{CssVersion, ParserOptions, StyleSheet};
use crate::values::expression::{Expression, ExpressionMember, ExpressionOperator, FunctionTerm, Term};
use crate::values::math::{
  MathExpression, MathMember, MathProduct, MathProductMember, MathProductOperator, MathSumOperator,
  MathUnit,
};
use crate::values::url::UrlValue;
use crate::vendor_prefix::VendorPrefix;
use std::sync::Arc;

pub(crate) fn parse_stylesheet(code: &str, options: &ParserOptions) -> Result<StyleSheet, Error<ParserErrorKind>> {
  let mut parser = Parser::new(code, options)?;
  parser.parse_stylesheet()
}

pub(crate) fn parse_declaration_list(
  code: &str,
  options: &ParserOptions,
) -> Result<DeclarationBlock, Error<ParserErrorKind>> {
  let mut parser = Parser::new(code, options)?;
  match parser.parse_declarations(false)? {
    Some(block) => Ok(block),
    // Only reachable in browser-compliant mode; the fragment has no
    // enclosing rule to drop, so an empty block is the closest recovery.
    None => Ok(DeclarationBlock::new()),
  }
}

/// Where a recovery skip stopped.
enum Sync {
  /// A synchronization point was found.
  Found,
  /// The input ended first; no synchronization point exists.
  Eof,
}

/// The result of parsing one declaration.
enum DeclOutcome {
  Ok(Declaration),
  /// Malformed; reported and skipped past its synchronization point.
  Dropped,
  /// Malformed, and the skip ran into EOF (browser-compliant mode only).
  DroppedAtEof,
}

struct Parser<'a> {
  tokens: Vec<Token>,
  pos: usize,
  options: &'a ParserOptions,
  handler: Arc<dyn ParseErrorHandler>,
  /// False once any top-level construct has been parsed; `@charset` is only
  /// silently consumed before that.
  at_first_construct: bool,
  /// True once a rule other than `@import`/`@namespace` has been parsed.
  seen_body_rule: bool,
}

impl<'a> Parser<'a> {
  fn new(code: &'a str, options: &'a ParserOptions) -> Result<Parser<'a>, Error<ParserErrorKind>> {
    let handler = options.handler();
    let tokens = tokenize(code, options.tab_size, options.browser_compliant, &handler)?;
    Ok(Parser {
      tokens,
      pos: 0,
      options,
      handler,
      at_first_construct: true,
      seen_body_rule: false,
    })
  }

  fn tolerant(&self) -> bool {
    self.options.browser_compliant
  }

  // ---- token cursor ------------------------------------------------------

  fn peek(&self) -> &Token {
    &self.tokens[self.pos.min(self.tokens.len() - 1)]
  }

  fn peek_at(&self, n: usize) -> &Token {
    &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
  }

  fn kind(&self) -> TokenKind {
    self.peek().kind
  }

  fn at(&self, kind: TokenKind) -> bool {
    self.kind() == kind
  }

  fn advance(&mut self) -> Token {
    let token = self.peek().clone();
    if token.kind != TokenKind::Eof {
      self.pos += 1;
    }
    token
  }

  fn is_trivia(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Whitespace | TokenKind::Comment)
  }

  fn skip_ws(&mut self) {
    while Self::is_trivia(self.kind()) {
      self.pos += 1;
    }
  }

  /// Skips trivia, returning whether any was skipped.
  fn take_ws(&mut self) -> bool {
    let mut any = false;
    while Self::is_trivia(self.kind()) {
      self.pos += 1;
      any = true;
    }
    any
  }

  /// The kind of the next non-trivia token after `offset` tokens.
  fn kind_after_trivia(&self, offset: usize) -> TokenKind {
    let mut n = offset;
    loop {
      let kind = self.peek_at(n).kind;
      if !Self::is_trivia(kind) {
        return kind;
      }
      n += 1;
    }
  }

  fn position(&self) -> Position {
    self.peek().span.start
  }

  fn span_from(&self, start: Position) -> SourceSpan {
    let end = if self.pos > 0 {
      self.tokens[self.pos - 1].span.end
    } else {
      start
    };
    SourceSpan::new(start, end)
  }

  fn err(&self, kind: ParserErrorKind) -> Error<ParserErrorKind> {
    Error::new(kind, self.position())
  }

  // ---- error reporting & recovery ---------------------------------------

  /// Reports a recoverable event. In strict mode a handler error aborts the
  /// parse; browser-compliant mode has already decided to continue.
  fn recoverable(
    &mut self,
    error: Error<ParserErrorKind>,
    skipped: Option<(Token, Token)>,
  ) -> Result<(), Error<ParserErrorKind>> {
    let event = RecoverableError { error, skipped };
    if self.tolerant() {
      let _ = self.handler.on_recoverable_error(&event);
      Ok(())
    } else {
      self.handler.on_recoverable_error(&event)
    }
  }

  fn unexpected_rule(&mut self, name: &str, message: &str) -> Result<(), Error<ParserErrorKind>> {
    let position = self.position();
    if self.tolerant() {
      let _ = self.handler.on_unexpected_rule(name, message, position);
      Ok(())
    } else {
      self.handler.on_unexpected_rule(name, message, position)
    }
  }

  /// Skips to the declaration-level synchronization point: a `;` (consumed)
  /// or a `}` (left for the caller). Browser-compliant recovery is
  /// brace-aware; strict recovery stops at the first `;` or `}` without
  /// counting nested braces.
  fn skip_to_declaration_sync(&mut self) -> (Option<(Token, Token)>, Sync) {
    let mut skipped: Option<(Token, Token)> = None;
    let mut depth = 0usize;
    loop {
      match self.kind() {
        TokenKind::Eof => return (skipped, Sync::Eof),
        TokenKind::Semicolon if depth == 0 => {
          record(&mut skipped, self.advance());
          return (skipped, Sync::Found);
        }
        TokenKind::RBrace => {
          if !self.tolerant() || depth == 0 {
            return (skipped, Sync::Found);
          }
          depth -= 1;
          record(&mut skipped, self.advance());
        }
        TokenKind::LBrace => {
          if self.tolerant() {
            depth += 1;
          }
          record(&mut skipped, self.advance());
        }
        _ => record(&mut skipped, self.advance()),
      }
    }
  }

  /// Skips a whole malformed rule: past its balanced `{…}` block, or past a
  /// top-level `;`. A `}` belonging to an enclosing block is left alone.
  fn skip_rule(&mut self) -> (Option<(Token, Token)>, Sync) {
    let mut skipped: Option<(Token, Token)> = None;
    let mut depth = 0usize;
    loop {
      match self.kind() {
        TokenKind::Eof => return (skipped, Sync::Eof),
        TokenKind::Semicolon if depth == 0 => {
          record(&mut skipped, self.advance());
          return (skipped, Sync::Found);
        }
        TokenKind::LBrace => {
          depth += 1;
          record(&mut skipped, self.advance());
        }
        TokenKind::RBrace => {
          if depth == 0 {
            return (skipped, Sync::Found);
          }
          depth -= 1;
          record(&mut skipped, self.advance());
          if depth == 0 {
            return (skipped, Sync::Found);
          }
        }
        _ => record(&mut skipped, self.advance()),
      }
    }
  }

  /// Recovery for a malformed rule: report, skip, drop. In strict mode a
  /// skip that hits EOF has no synchronization point and fails the parse.
  fn drop_rule(&mut self, error: Error<ParserErrorKind>) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    let (skipped, sync) = self.skip_rule();
    match sync {
      Sync::Found => {
        self.recoverable(error, skipped)?;
        Ok(None)
      }
      Sync::Eof => {
        if self.tolerant() {
          let _ = self.handler.on_recoverable_error(&RecoverableError { error, skipped });
          Ok(None)
        } else {
          Err(error)
        }
      }
    }
  }

  // ---- stylesheet level --------------------------------------------------

  fn parse_stylesheet(&mut self) -> Result<StyleSheet, Error<ParserErrorKind>> {
    let start = self.position();
    let mut rules = CssRuleList::default();
    loop {
      self.skip_trivia_and_cd();
      match self.kind() {
        TokenKind::Eof => break,
        TokenKind::AtKeyword => {
          if let Some(rule) = self.parse_at_rule(false)? {
            self.note_rule(&rule);
            rules.0.push(rule);
          }
        }
        TokenKind::RBrace => {
          let token = self.advance();
          self.recoverable(
            Error::new(
              ParserErrorKind::UnexpectedToken {
                expected: "a rule",
                found: "}".into(),
              },
              token.span.start,
            ),
            Some((token.clone(), token)),
          )?;
        }
        _ => {
          if let Some(rule) = self.parse_style_rule()? {
            self.note_rule(&rule);
            rules.0.push(rule);
          }
        }
      }
      self.at_first_construct = false;
    }
    Ok(StyleSheet {
      rules,
      loc: self.span_from(start),
    })
  }

  fn note_rule(&mut self, rule: &CssRule) {
    if !matches!(rule, CssRule::Import(..) | CssRule::Namespace(..)) {
      self.seen_body_rule = true;
    }
  }

  fn skip_trivia_and_cd(&mut self) {
    while matches!(
      self.kind(),
      TokenKind::Whitespace | TokenKind::Comment | TokenKind::Cdo | TokenKind::Cdc
    ) {
      self.pos += 1;
    }
  }

  /// The rule list inside `@media` / `@supports`, up to the closing `}`
  /// (left for the caller).
  fn parse_rule_list(&mut self) -> Result<CssRuleList, Error<ParserErrorKind>> {
    let mut rules = CssRuleList::default();
    loop {
      self.skip_ws();
      match self.kind() {
        TokenKind::RBrace => break,
        TokenKind::Eof => {
          let err = self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\"}\"" });
          self.recoverable(err, None)?;
          break;
        }
        TokenKind::AtKeyword => {
          if let Some(rule) = self.parse_at_rule(true)? {
            rules.0.push(rule);
          }
        }
        _ => {
          if let Some(rule) = self.parse_style_rule()? {
            rules.0.push(rule);
          }
        }
      }
    }
    Ok(rules)
  }

  // ---- at-rules ----------------------------------------------------------

  fn parse_at_rule(&mut self, nested: bool) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    let start = self.position();
    let at = self.advance();
    let name = at.text.clone();
    let (vendor_prefix, base) = VendorPrefix::strip(&name);
    let css3 = self.options.version == CssVersion::Css30;

    if base.eq_ignore_ascii_case("charset") {
      return self.parse_charset_rule(nested);
    }
    if name.eq_ignore_ascii_case("import") {
      if nested {
        self.unexpected_rule("import", "@import is not allowed inside conditional rules")?;
        let _ = self.skip_rule();
        return Ok(None);
      }
      return self.parse_import_rule(start);
    }
    if name.eq_ignore_ascii_case("namespace") {
      return self.parse_namespace_rule(start);
    }
    if name.eq_ignore_ascii_case("media") {
      return self.parse_media_rule(start);
    }
    if name.eq_ignore_ascii_case("font-face") {
      return self.parse_font_face_rule(start);
    }
    if name.eq_ignore_ascii_case("page") {
      return self.parse_page_rule(start);
    }
    if css3 && name.eq_ignore_ascii_case("supports") {
      return self.parse_supports_rule(start);
    }
    if css3 && base.eq_ignore_ascii_case("keyframes") {
      return self.parse_keyframes_rule(start, vendor_prefix);
    }
    if css3 && base.eq_ignore_ascii_case("viewport") {
      return self.parse_viewport_rule(start, vendor_prefix);
    }

    self.parse_unknown_rule(name, start)
  }

  /// `@charset` never becomes an AST node: at the very start it was already
  /// honored by charset detection (or is ignored for string sources), and
  /// anywhere else it is misplaced.
  fn parse_charset_rule(&mut self, nested: bool) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    if nested || !self.at_first_construct {
      self.unexpected_rule("charset", "@charset must be the first rule of the stylesheet")?;
    }
    self.skip_ws();
    if self.at(TokenKind::String) {
      self.advance();
    }
    self.skip_ws();
    if self.at(TokenKind::Semicolon) {
      self.advance();
    }
    Ok(None)
  }

  fn parse_import_rule(&mut self, start: Position) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    if self.seen_body_rule {
      self.unexpected_rule("import", "@import must precede all other rule kinds")?;
    }
    self.skip_ws();
    let url = match self.kind() {
      TokenKind::Url => {
        let token = self.advance();
        UrlValue::from_raw(&token.text, true, token.span)
      }
      TokenKind::String => {
        let token = self.advance();
        UrlValue::from_raw(&token.text, false, token.span)
      }
      _ => {
        let err = self.err(ParserErrorKind::UnexpectedToken {
          expected: "a url or string",
          found: self.peek().text.clone(),
        });
        return self.drop_rule(err);
      }
    };
    self.skip_ws();
    let media = if matches!(self.kind(), TokenKind::Semicolon | TokenKind::Eof) {
      MediaList::default()
    } else {
      match self.parse_media_list() {
        Ok(media) => media,
        Err(err) => return self.drop_rule(err),
      }
    };
    self.skip_ws();
    match self.kind() {
      TokenKind::Semicolon => {
        self.advance();
      }
      TokenKind::Eof => {
        let err = self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\";\"" });
        self.recoverable(err, None)?;
      }
      _ => {
        let err = self.err(ParserErrorKind::UnexpectedToken {
          expected: "\";\"",
          found: self.peek().text.clone(),
        });
        return self.drop_rule(err);
      }
    }
    Ok(Some(CssRule::Import(ImportRule {
      url,
      media,
      loc: self.span_from(start),
    })))
  }

  fn parse_namespace_rule(&mut self, start: Position) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    if self.seen_body_rule {
      self.unexpected_rule("namespace", "@namespace must precede all style rules")?;
    }
    self.skip_ws();
    let prefix = if self.at(TokenKind::Ident) {
      let token = self.advance();
      self.skip_ws();
      Some(token.text)
    } else {
      None
    };
    let url = match self.kind() {
      TokenKind::Url => {
        let token = self.advance();
        UrlValue::from_raw(&token.text, true, token.span)
      }
      TokenKind::String => {
        let token = self.advance();
        UrlValue::from_raw(&token.text, false, token.span)
      }
      _ => {
        let err = self.err(ParserErrorKind::UnexpectedToken {
          expected: "a url or string",
          found: self.peek().text.clone(),
        });
        return self.drop_rule(err);
      }
    };
    self.skip_ws();
    if self.at(TokenKind::Semicolon) {
      self.advance();
    } else {
      let err = self.err(ParserErrorKind::UnexpectedToken {
        expected: "\";\"",
        found: self.peek().text.clone(),
      });
      return self.drop_rule(err);
    }
    Ok(Some(CssRule::Namespace(NamespaceRule {
      prefix,
      url,
      loc: self.span_from(start),
    })))
  }

  fn parse_media_rule(&mut self, start: Position) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    self.skip_ws();
    let query = match self.parse_media_list() {
      Ok(query) => query,
      Err(err) => return self.drop_rule(err),
    };
    if !self.expect_block_open()? {
      return Ok(None);
    }
    let rules = self.parse_rule_list()?;
    if self.at(TokenKind::RBrace) {
      self.advance();
    }
    Ok(Some(CssRule::Media(MediaRule {
      query,
      rules,
      loc: self.span_from(start),
    })))
  }

  fn parse_supports_rule(&mut self, start: Position) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    self.skip_ws();
    let condition = match self.parse_supports_condition(false) {
      Ok(condition) => condition,
      Err(err) => return self.drop_rule(err),
    };
    if !self.expect_block_open()? {
      return Ok(None);
    }
    let rules = self.parse_rule_list()?;
    if self.at(TokenKind::RBrace) {
      self.advance();
    }
    Ok(Some(CssRule::Supports(SupportsRule {
      condition,
      rules,
      loc: self.span_from(start),
    })))
  }

  fn parse_font_face_rule(&mut self, start: Position) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    if !self.expect_block_open()? {
      return Ok(None);
    }
    match self.parse_declarations(true)? {
      Some(declarations) => {
        if self.at(TokenKind::RBrace) {
          self.advance();
        }
        Ok(Some(CssRule::FontFace(FontFaceRule {
          declarations,
          loc: self.span_from(start),
        })))
      }
      None => Ok(None),
    }
  }

  fn parse_viewport_rule(
    &mut self,
    start: Position,
    vendor_prefix: VendorPrefix,
  ) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    if !self.expect_block_open()? {
      return Ok(None);
    }
    match self.parse_declarations(true)? {
      Some(declarations) => {
        if self.at(TokenKind::RBrace) {
          self.advance();
        }
        Ok(Some(CssRule::Viewport(ViewportRule {
          vendor_prefix,
          declarations,
          loc: self.span_from(start),
        })))
      }
      None => Ok(None),
    }
  }

  fn parse_keyframes_rule(
    &mut self,
    start: Position,
    vendor_prefix: VendorPrefix,
  ) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    self.skip_ws();
    let name = match self.kind() {
      TokenKind::Ident | TokenKind::String => self.advance().text,
      _ => {
        let err = self.err(ParserErrorKind::UnexpectedToken {
          expected: "a keyframes name",
          found: self.peek().text.clone(),
        });
        return self.drop_rule(err);
      }
    };
    if !self.expect_block_open()? {
      return Ok(None);
    }
    let blocks = self.parse_keyframes_blocks()?;
    if self.at(TokenKind::RBrace) {
      self.advance();
    }
    Ok(Some(CssRule::Keyframes(KeyframesRule {
      vendor_prefix,
      name,
      blocks,
      loc: self.span_from(start),
    })))
  }

  fn parse_keyframes_blocks(&mut self) -> Result<Vec<KeyframesBlock>, Error<ParserErrorKind>> {
    let mut blocks = Vec::new();
    'blocks: loop {
      self.skip_ws();
      match self.kind() {
        TokenKind::RBrace => break,
        TokenKind::Eof => {
          let err = self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\"}\"" });
          self.recoverable(err, None)?;
          break;
        }
        _ => {}
      }

      let start = self.position();
      let mut selectors = Vec::new();
      loop {
        self.skip_ws();
        match self.kind() {
          TokenKind::Ident | TokenKind::Percentage if is_valid_keyframe_selector(&self.peek().text) => {
            selectors.push(self.advance().text);
          }
          _ => {
            let err = self.err(ParserErrorKind::UnexpectedToken {
              expected: "\"from\", \"to\", or a percentage",
              found: self.peek().text.clone(),
            });
            let (skipped, sync) = self.skip_rule();
            match sync {
              Sync::Found => {
                self.recoverable(err, skipped)?;
                continue 'blocks;
              }
              Sync::Eof => {
                if self.tolerant() {
                  let _ = self.handler.on_recoverable_error(&RecoverableError { error: err, skipped });
                  break 'blocks;
                }
                return Err(err);
              }
            }
          }
        }
        self.skip_ws();
        match self.kind() {
          TokenKind::Comma => {
            self.advance();
          }
          TokenKind::LBrace => break,
          _ => {
            let err = self.err(ParserErrorKind::UnexpectedToken {
              expected: "\",\" or \"{\"",
              found: self.peek().text.clone(),
            });
            let (skipped, sync) = self.skip_rule();
            match sync {
              Sync::Found => {
                self.recoverable(err, skipped)?;
                continue 'blocks;
              }
              Sync::Eof => {
                if self.tolerant() {
                  let _ = self.handler.on_recoverable_error(&RecoverableError { error: err, skipped });
                  break 'blocks;
                }
                return Err(err);
              }
            }
          }
        }
      }
      self.advance(); // {
      match self.parse_declarations(true)? {
        Some(declarations) => {
          if self.at(TokenKind::RBrace) {
            self.advance();
          }
          blocks.push(KeyframesBlock {
            selectors,
            declarations,
            loc: self.span_from(start),
          });
        }
        None => break,
      }
    }
    Ok(blocks)
  }

  fn parse_page_rule(&mut self, start: Position) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    self.skip_ws();
    let mut selectors = Vec::new();
    while !self.at(TokenKind::LBrace) {
      match self.parse_page_selector() {
        Ok(selector) => selectors.push(selector),
        Err(err) => return self.drop_rule(err),
      }
      self.skip_ws();
      match self.kind() {
        TokenKind::Comma => {
          self.advance();
          self.skip_ws();
        }
        TokenKind::LBrace => break,
        _ => {
          let err = self.err(ParserErrorKind::UnexpectedToken {
            expected: "\",\" or \"{\"",
            found: self.peek().text.clone(),
          });
          return self.drop_rule(err);
        }
      }
    }
    self.advance(); // {

    let mut body = Vec::new();
    loop {
      self.skip_ws();
      match self.kind() {
        TokenKind::RBrace => {
          self.advance();
          break;
        }
        TokenKind::Eof => {
          let err = self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\"}\"" });
          if self.tolerant() {
            let _ = self.handler.on_recoverable_error(&RecoverableError { error: err, skipped: None });
            return Ok(None);
          }
          self.recoverable(err, None)?;
          break;
        }
        TokenKind::Semicolon => {
          self.advance();
        }
        TokenKind::AtKeyword => {
          let margin_start = self.position();
          let at = self.advance();
          if is_page_margin_box(&at.text) {
            if !self.expect_block_open()? {
              return Ok(None);
            }
            match self.parse_declarations(true)? {
              Some(declarations) => {
                if self.at(TokenKind::RBrace) {
                  self.advance();
                }
                body.push(PageBodyMember::MarginBlock(PageMarginRule {
                  name: at.text,
                  declarations,
                  loc: self.span_from(margin_start),
                }));
              }
              None => return Ok(None),
            }
          } else {
            self.unexpected_rule(&at.text, "only page-margin at-rules are allowed inside @page")?;
            let (skipped, sync) = self.skip_rule();
            if let Sync::Eof = sync {
              let err = Error::new(
                ParserErrorKind::UnexpectedEndOfInput { expected: "\"}\"" },
                margin_start,
              );
              if self.tolerant() {
                let _ = self.handler.on_recoverable_error(&RecoverableError { error: err, skipped });
                return Ok(None);
              }
              return Err(err);
            }
          }
        }
        _ => match self.parse_declaration()? {
          DeclOutcome::Ok(declaration) => body.push(PageBodyMember::Declaration(declaration)),
          DeclOutcome::Dropped => {}
          DeclOutcome::DroppedAtEof => return Ok(None),
        },
      }
    }

    Ok(Some(CssRule::Page(PageRule {
      selectors,
      body,
      loc: self.span_from(start),
    })))
  }

  /// One page selector: `ident`, `:pseudo`, or `ident:pseudo` forms, kept
  /// textually.
  fn parse_page_selector(&mut self) -> Result<String, Error<ParserErrorKind>> {
    let mut text = String::new();
    if self.at(TokenKind::Ident) {
      text.push_str(&self.advance().text);
    }
    while self.at(TokenKind::Colon) {
      self.advance();
      if !self.at(TokenKind::Ident) {
        return Err(self.err(ParserErrorKind::UnexpectedToken {
          expected: "a pseudo-page name",
          found: self.peek().text.clone(),
        }));
      }
      text.push(':');
      text.push_str(&self.advance().text);
    }
    if text.is_empty() {
      return Err(self.err(ParserErrorKind::UnexpectedToken {
        expected: "a page selector",
        found: self.peek().text.clone(),
      }));
    }
    Ok(text)
  }

  fn parse_unknown_rule(&mut self, name: String, start: Position) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    let mut prelude = String::new();
    let mut pending_ws = false;
    loop {
      match self.kind() {
        TokenKind::LBrace | TokenKind::Semicolon | TokenKind::Eof => break,
        kind if Self::is_trivia(kind) => {
          pending_ws = true;
          self.pos += 1;
        }
        _ => {
          if pending_ws && !prelude.is_empty() {
            prelude.push(' ');
          }
          pending_ws = false;
          let token = self.advance();
          token.write_raw(&mut prelude);
        }
      }
    }

    let block = match self.kind() {
      TokenKind::Semicolon => {
        self.advance();
        None
      }
      TokenKind::LBrace => {
        self.advance();
        Some(self.capture_block_text()?)
      }
      _ => {
        let err = self.err(ParserErrorKind::UnexpectedEndOfInput {
          expected: "\";\" or \"{\"",
        });
        self.recoverable(err, None)?;
        None
      }
    };

    Ok(Some(CssRule::Unknown(UnknownRule {
      name,
      prelude,
      block,
      loc: self.span_from(start),
    })))
  }

  /// Captures everything to the matching `}` as literal text, whitespace
  /// collapsed to single spaces.
  fn capture_block_text(&mut self) -> Result<String, Error<ParserErrorKind>> {
    let mut text = String::new();
    let mut pending_ws = false;
    let mut depth = 0usize;
    loop {
      match self.kind() {
        TokenKind::Eof => {
          let err = self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\"}\"" });
          self.recoverable(err, None)?;
          break;
        }
        TokenKind::RBrace if depth == 0 => {
          self.advance();
          break;
        }
        kind if Self::is_trivia(kind) => {
          pending_ws = true;
          self.pos += 1;
        }
        kind => {
          if pending_ws && !text.is_empty() {
            text.push(' ');
          }
          pending_ws = false;
          match kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth -= 1,
            _ => {}
          }
          let token = self.advance();
          token.write_raw(&mut text);
        }
      }
    }
    Ok(text)
  }

  /// Consumes the `{` opening a rule body. Returns false when the rule had
  /// to be dropped instead.
  fn expect_block_open(&mut self) -> Result<bool, Error<ParserErrorKind>> {
    self.skip_ws();
    if self.at(TokenKind::LBrace) {
      self.advance();
      return Ok(true);
    }
    let err = self.err(ParserErrorKind::UnexpectedToken {
      expected: "\"{\"",
      found: self.peek().text.clone(),
    });
    self.drop_rule(err)?;
    Ok(false)
  }

  // ---- style rules & declarations ---------------------------------------

  fn parse_style_rule(&mut self) -> Result<Option<CssRule>, Error<ParserErrorKind>> {
    let start = self.position();
    let selectors = match self.parse_selector_list(false) {
      Ok(selectors) => selectors,
      Err(err) => return self.drop_rule(err),
    };
    match self.kind() {
      TokenKind::LBrace => {
        self.advance();
      }
      _ => {
        let err = self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\"{\"" });
        return self.drop_rule(err);
      }
    }
    match self.parse_declarations(true)? {
      Some(declarations) => {
        if self.at(TokenKind::RBrace) {
          self.advance();
        }
        Ok(Some(CssRule::Style(StyleRule {
          selectors,
          declarations,
          loc: self.span_from(start),
        })))
      }
      None => Ok(None),
    }
  }

  /// Parses declarations up to the closing `}` (left for the caller) or, for
  /// declaration-list fragments, to EOF. Returns `None` when the enclosing
  /// rule must be dropped: its block reached EOF in browser-compliant mode.
  fn parse_declarations(&mut self, in_block: bool) -> Result<Option<DeclarationBlock>, Error<ParserErrorKind>> {
    let start = self.position();
    let mut block = DeclarationBlock::new();
    loop {
      self.skip_ws();
      match self.kind() {
        TokenKind::Semicolon => {
          self.advance();
        }
        TokenKind::RBrace => {
          if in_block {
            break;
          }
          let token = self.advance();
          self.recoverable(
            Error::new(
              ParserErrorKind::UnexpectedToken {
                expected: "a declaration",
                found: "}".into(),
              },
              token.span.start,
            ),
            Some((token.clone(), token)),
          )?;
        }
        TokenKind::Eof => {
          if in_block {
            let err = self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\"}\"" });
            self.recoverable(err, None)?;
          }
          break;
        }
        _ => match self.parse_declaration()? {
          DeclOutcome::Ok(declaration) => block.push(declaration),
          DeclOutcome::Dropped => {}
          DeclOutcome::DroppedAtEof => {
            if in_block {
              return Ok(None);
            }
            break;
          }
        },
      }
    }
    block.loc = self.span_from(start);
    Ok(Some(block))
  }

  fn parse_declaration(&mut self) -> Result<DeclOutcome, Error<ParserErrorKind>> {
    let start = self.position();

    let property = match self.kind() {
      TokenKind::Ident => self.advance().text,
      _ => {
        let err = Error::new(
          ParserErrorKind::InvalidDeclaration(format!(
            "expected a property name, found \"{}\"",
            self.peek().text
          )),
          start,
        );
        return self.declaration_error(err);
      }
    };
    self.skip_ws();
    if !self.at(TokenKind::Colon) {
      let err = Error::new(
        ParserErrorKind::InvalidDeclaration(format!("missing \":\" after \"{}\"", property)),
        self.position(),
      );
      return self.declaration_error(err);
    }
    self.advance();

    let value = match self.parse_expression(false) {
      Ok(value) if value.is_empty() => {
        let err = Error::new(
          ParserErrorKind::InvalidDeclaration(format!("\"{}\" has an empty value", property)),
          self.position(),
        );
        return self.declaration_error(err);
      }
      Ok(value) => value,
      Err(err) => return self.declaration_error(err),
    };

    let mut important = false;
    if self.at(TokenKind::Exclamation) {
      self.advance();
      self.skip_ws();
      if self.at(TokenKind::Ident) && self.peek().text.eq_ignore_ascii_case("important") {
        self.advance();
        important = true;
      } else {
        let err = self.err(ParserErrorKind::InvalidImportant);
        return self.declaration_error(err);
      }
      self.skip_ws();
      if !matches!(self.kind(), TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof) {
        let err = self.err(ParserErrorKind::InvalidDeclaration(
          "unexpected tokens after !important".into(),
        ));
        return self.declaration_error(err);
      }
    }

    Ok(DeclOutcome::Ok(Declaration {
      property,
      value,
      important,
      loc: self.span_from(start),
    }))
  }

  fn declaration_error(&mut self, error: Error<ParserErrorKind>) -> Result<DeclOutcome, Error<ParserErrorKind>> {
    let (skipped, sync) = self.skip_to_declaration_sync();
    match sync {
      Sync::Found => {
        self.recoverable(error, skipped)?;
        Ok(DeclOutcome::Dropped)
      }
      Sync::Eof => {
        if self.tolerant() {
          let _ = self.handler.on_recoverable_error(&RecoverableError { error, skipped });
          Ok(DeclOutcome::DroppedAtEof)
        } else {
          Err(error)
        }
      }
    }
  }

  // ---- expressions -------------------------------------------------------

  /// Parses an expression. With `in_parens`, the expression ends at the
  /// matching `)` (left for the caller); otherwise at `;`, `}`, or `!`.
  fn parse_expression(&mut self, in_parens: bool) -> Result<Expression, Error<ParserErrorKind>> {
    let start = self.position();
    let mut expression = Expression::new();
    loop {
      self.skip_ws();
      match self.kind() {
        TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Exclamation | TokenKind::Eof => {
          if in_parens {
            return Err(self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\")\"" }));
          }
          break;
        }
        TokenKind::RParen => {
          if in_parens {
            break;
          }
          return Err(self.err(ParserErrorKind::UnexpectedToken {
            expected: "a value",
            found: ")".into(),
          }));
        }
        TokenKind::Number
        | TokenKind::Percentage
        | TokenKind::Dimension
        | TokenKind::UnicodeRange
        | TokenKind::Ident => {
          let token = self.advance();
          expression.push(ExpressionMember::Term(Term {
            value: token.text,
            loc: token.span,
          }));
        }
        TokenKind::String => {
          let token = self.advance();
          expression.push(ExpressionMember::Term(Term {
            value: token.text,
            loc: token.span,
          }));
        }
        TokenKind::BadString => {
          return Err(self.err(ParserErrorKind::UnterminatedString));
        }
        TokenKind::Hash => {
          let token = self.advance();
          let mut value = String::from("#");
          value.push_str(&token.text);
          expression.push(ExpressionMember::Term(Term {
            value,
            loc: token.span,
          }));
        }
        TokenKind::Url => {
          let token = self.advance();
          expression.push(ExpressionMember::Url(UrlValue::from_raw(&token.text, true, token.span)));
        }
        TokenKind::Function => {
          let is_calc = {
            let (_, base) = VendorPrefix::strip(&self.peek().text);
            base.eq_ignore_ascii_case("calc") && self.options.version == CssVersion::Css30
          };
          if is_calc {
            expression.push(ExpressionMember::Math(self.parse_math()?));
          } else {
            expression.push(ExpressionMember::Function(self.parse_function()?));
          }
        }
        TokenKind::Comma => {
          self.advance();
          expression.push(ExpressionMember::Operator(ExpressionOperator::Comma));
        }
        TokenKind::Slash => {
          self.advance();
          expression.push(ExpressionMember::Operator(ExpressionOperator::Slash));
        }
        TokenKind::Equals => {
          self.advance();
          expression.push(ExpressionMember::Operator(ExpressionOperator::Equals));
        }
        _ => {
          return Err(self.err(ParserErrorKind::UnexpectedToken {
            expected: "a value",
            found: self.peek().text.clone(),
          }));
        }
      }
    }
    expression.loc = self.span_from(start);
    Ok(expression)
  }

  /// The cursor is on a `Function` token.
  fn parse_function(&mut self) -> Result<FunctionTerm, Error<ParserErrorKind>> {
    let token = self.advance();
    let start = token.span.start;
    let arguments = self.parse_expression(true)?;
    debug_assert!(self.at(TokenKind::RParen));
    self.advance();
    Ok(FunctionTerm {
      name: token.text,
      arguments: Box::new(arguments),
      loc: self.span_from(start),
    })
  }

  // ---- calc() ------------------------------------------------------------

  /// The cursor is on the `calc` function token.
  fn parse_math(&mut self) -> Result<MathExpression, Error<ParserErrorKind>> {
    let token = self.advance();
    let start = token.span.start;
    let members = self.parse_math_members()?;
    if !self.at(TokenKind::RParen) {
      return Err(self.err(ParserErrorKind::InvalidCalcExpression("expected \")\"".into())));
    }
    self.advance();
    Ok(MathExpression {
      name: token.text,
      members,
      loc: self.span_from(start),
    })
  }

  /// The sum level, up to a `)` that is left for the caller.
  fn parse_math_members(&mut self) -> Result<Vec<MathMember>, Error<ParserErrorKind>> {
    let mut members = Vec::new();
    loop {
      self.skip_ws();
      members.push(MathMember::Product(self.parse_math_product()?));
      let had_ws = self.take_ws();
      match self.kind() {
        TokenKind::RParen => break,
        TokenKind::Plus | TokenKind::Delim if self.at_sum_operator() => {
          // `+` and `-` require whitespace on both sides.
          if !had_ws {
            return Err(self.err(ParserErrorKind::InvalidCalcExpression(
              "whitespace is required before \"+\" and \"-\"".into(),
            )));
          }
          let op = if self.at(TokenKind::Plus) {
            MathSumOperator::Plus
          } else {
            MathSumOperator::Minus
          };
          self.advance();
          if !Self::is_trivia(self.kind()) {
            return Err(self.err(ParserErrorKind::InvalidCalcExpression(
              "whitespace is required after \"+\" and \"-\"".into(),
            )));
          }
          members.push(MathMember::SumOperator(op));
        }
        TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension
          if self.peek().text.starts_with(['+', '-']) =>
        {
          return Err(self.err(ParserErrorKind::InvalidCalcExpression(
            "whitespace is required around \"+\" and \"-\"".into(),
          )));
        }
        TokenKind::Eof => {
          return Err(self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\")\"" }));
        }
        _ => {
          return Err(self.err(ParserErrorKind::InvalidCalcExpression(format!(
            "unexpected \"{}\"",
            self.peek().text
          ))));
        }
      }
    }
    Ok(members)
  }

  fn at_sum_operator(&self) -> bool {
    self.at(TokenKind::Plus) || self.peek().is_delim('-')
  }

  fn parse_math_product(&mut self) -> Result<MathProduct, Error<ParserErrorKind>> {
    let start = self.position();
    let mut members = vec![MathProductMember::Unit(self.parse_math_unit()?)];
    loop {
      let saved = self.pos;
      self.skip_ws();
      match self.kind() {
        TokenKind::Asterisk => {
          self.advance();
          members.push(MathProductMember::Operator(MathProductOperator::Multiply));
        }
        TokenKind::Slash => {
          self.advance();
          members.push(MathProductMember::Operator(MathProductOperator::Divide));
        }
        _ => {
          // Not part of this product; any whitespace belongs to the sum.
          self.pos = saved;
          break;
        }
      }
      self.skip_ws();
      members.push(MathProductMember::Unit(self.parse_math_unit()?));
    }
    Ok(MathProduct {
      members,
      loc: self.span_from(start),
    })
  }

  fn parse_math_unit(&mut self) -> Result<MathUnit, Error<ParserErrorKind>> {
    match self.kind() {
      TokenKind::Number | TokenKind::Percentage | TokenKind::Dimension | TokenKind::Ident => {
        Ok(MathUnit::Value(self.advance().text))
      }
      TokenKind::LParen => {
        self.advance();
        let members = self.parse_math_members()?;
        debug_assert!(self.at(TokenKind::RParen));
        self.advance();
        Ok(MathUnit::Group(members))
      }
      TokenKind::Function => Ok(MathUnit::Function(self.parse_function()?)),
      _ => Err(self.err(ParserErrorKind::InvalidCalcExpression(format!(
        "expected a value, found \"{}\"",
        self.peek().text
      )))),
    }
  }

  // ---- media queries -----------------------------------------------------

  /// A comma-separated media query list, ending before `{`, `;`, or EOF.
  fn parse_media_list(&mut self) -> Result<MediaList, Error<ParserErrorKind>> {
    let start = self.position();
    let mut media_queries = Vec::new();
    loop {
      media_queries.push(self.parse_media_query()?);
      self.skip_ws();
      if self.at(TokenKind::Comma) {
        self.advance();
      } else {
        break;
      }
    }
    Ok(MediaList {
      media_queries,
      loc: self.span_from(start),
    })
  }

  fn parse_media_query(&mut self) -> Result<MediaQuery, Error<ParserErrorKind>> {
    let start = self.position();
    self.skip_ws();

    let mut qualifier = None;
    let mut media_type = None;
    let mut features = Vec::new();

    if self.at(TokenKind::Ident) {
      let text = &self.peek().text;
      if text.eq_ignore_ascii_case("only") {
        qualifier = Some(MediaQualifier::Only);
        self.advance();
        self.skip_ws();
      } else if text.eq_ignore_ascii_case("not") {
        qualifier = Some(MediaQualifier::Not);
        self.advance();
        self.skip_ws();
      }
    }

    if self.at(TokenKind::Ident) {
      media_type = Some(self.advance().text);
    } else if qualifier.is_some() && !self.at(TokenKind::LParen) {
      return Err(self.err(ParserErrorKind::InvalidMediaQuery));
    }

    loop {
      self.skip_ws();
      if media_type.is_some() || !features.is_empty() {
        // Features after a medium (or another feature) need an `and`.
        if self.at(TokenKind::Ident) && self.peek().text.eq_ignore_ascii_case("and") {
          self.advance();
          self.skip_ws();
        } else {
          break;
        }
      } else if !self.at(TokenKind::LParen) {
        break;
      }
      if !self.at(TokenKind::LParen) {
        return Err(self.err(ParserErrorKind::InvalidMediaQuery));
      }
      features.push(self.parse_media_feature()?);
    }

    if qualifier.is_none() && media_type.is_none() && features.is_empty() {
      return Err(self.err(ParserErrorKind::InvalidMediaQuery));
    }

    Ok(MediaQuery {
      qualifier,
      media_type,
      features,
      loc: self.span_from(start),
    })
  }

  fn parse_media_feature(&mut self) -> Result<MediaFeature, Error<ParserErrorKind>> {
    let start = self.position();
    self.advance(); // (
    self.skip_ws();
    if !self.at(TokenKind::Ident) {
      return Err(self.err(ParserErrorKind::InvalidMediaQuery));
    }
    let name = self.advance().text;
    self.skip_ws();
    let value = if self.at(TokenKind::Colon) {
      self.advance();
      let value = self.parse_expression(true)?;
      if value.is_empty() {
        return Err(self.err(ParserErrorKind::InvalidMediaQuery));
      }
      Some(value)
    } else {
      None
    };
    self.skip_ws();
    if !self.at(TokenKind::RParen) {
      return Err(self.err(ParserErrorKind::InvalidMediaQuery));
    }
    self.advance();
    Ok(MediaFeature {
      name,
      value,
      loc: self.span_from(start),
    })
  }

  // ---- @supports conditions ----------------------------------------------

  /// Parses members left-to-right until `{` (top level) or the enclosing
  /// `)`. No precedence is applied.
  fn parse_supports_condition(&mut self, in_parens: bool) -> Result<SupportsCondition, Error<ParserErrorKind>> {
    let start = self.position();
    let mut members = Vec::new();
    loop {
      self.skip_ws();
      match self.kind() {
        TokenKind::LBrace if !in_parens => break,
        TokenKind::RParen if in_parens => break,
        TokenKind::Eof => {
          return Err(self.err(ParserErrorKind::UnexpectedEndOfInput {
            expected: if in_parens { "\")\"" } else { "\"{\"" },
          }));
        }
        TokenKind::Ident => {
          let text = &self.peek().text;
          let member = if text.eq_ignore_ascii_case("not") {
            SupportsConditionMember::Not
          } else if text.eq_ignore_ascii_case("and") {
            SupportsConditionMember::Operator(SupportsOperator::And)
          } else if text.eq_ignore_ascii_case("or") {
            SupportsConditionMember::Operator(SupportsOperator::Or)
          } else {
            return Err(self.err(ParserErrorKind::InvalidSupportsCondition));
          };
          self.advance();
          members.push(member);
        }
        TokenKind::LParen => {
          self.advance();
          self.skip_ws();
          if self.at(TokenKind::Ident) && self.kind_after_trivia(1) == TokenKind::Colon {
            let declaration = self.parse_supports_declaration()?;
            members.push(SupportsConditionMember::Declaration(declaration));
          } else {
            let nested = self.parse_supports_condition(true)?;
            members.push(SupportsConditionMember::Nested(nested));
          }
          if !self.at(TokenKind::RParen) {
            return Err(self.err(ParserErrorKind::InvalidSupportsCondition));
          }
          self.advance();
        }
        _ => return Err(self.err(ParserErrorKind::InvalidSupportsCondition)),
      }
    }
    if members.is_empty() {
      return Err(self.err(ParserErrorKind::InvalidSupportsCondition));
    }
    Ok(SupportsCondition {
      members,
      loc: self.span_from(start),
    })
  }

  /// A `property: value` inside a supports condition, up to the `)` that is
  /// left for the caller.
  fn parse_supports_declaration(&mut self) -> Result<Declaration, Error<ParserErrorKind>> {
    let start = self.position();
    let property = self.advance().text;
    self.skip_ws();
    debug_assert!(self.at(TokenKind::Colon));
    self.advance();
    let value = self.parse_expression(true)?;
    if value.is_empty() {
      return Err(self.err(ParserErrorKind::InvalidSupportsCondition));
    }
    Ok(Declaration {
      property,
      value,
      important: false,
      loc: self.span_from(start),
    })
  }

  // ---- selectors ---------------------------------------------------------

  /// A comma-separated selector list. At the top level it ends before `{`;
  /// inside functional-pseudo arguments it ends before the `)`.
  fn parse_selector_list(&mut self, in_args: bool) -> Result<SelectorList, Error<ParserErrorKind>> {
    let mut list = SelectorList::default();
    loop {
      self.skip_ws();
      list.0.push(self.parse_selector(in_args)?);
      if self.at(TokenKind::Comma) {
        self.advance();
      } else {
        break;
      }
    }
    Ok(list)
  }

  fn parse_selector(&mut self, in_args: bool) -> Result<Selector, Error<ParserErrorKind>> {
    let start = self.position();
    let mut members: Vec<SelectorMember> = Vec::new();
    let mut pending_ws = false;
    loop {
      let kind = self.kind();
      match kind {
        k if Self::is_trivia(k) => {
          pending_ws = !members.is_empty();
          self.pos += 1;
        }
        TokenKind::Comma => break,
        TokenKind::LBrace if !in_args => break,
        TokenKind::RParen if in_args => break,
        TokenKind::Eof => break,
        TokenKind::Greater | TokenKind::Plus | TokenKind::Tilde => {
          if !matches!(members.last(), Some(SelectorMember::Simple(..))) {
            return Err(self.err(ParserErrorKind::InvalidSelector(
              "a combinator must follow a simple selector".into(),
            )));
          }
          let combinator = match kind {
            TokenKind::Greater => Combinator::Child,
            TokenKind::Plus => Combinator::NextSibling,
            _ => Combinator::LaterSibling,
          };
          self.advance();
          members.push(SelectorMember::Combinator(combinator));
          pending_ws = false;
        }
        _ => {
          if pending_ws && matches!(members.last(), Some(SelectorMember::Simple(..))) {
            members.push(SelectorMember::Combinator(Combinator::Descendant));
          }
          pending_ws = false;
          let simple = self.parse_simple_selector()?;
          members.push(SelectorMember::Simple(simple));
        }
      }
    }
    if members.is_empty() {
      return Err(self.err(ParserErrorKind::InvalidSelector("empty selector".into())));
    }
    if matches!(members.last(), Some(SelectorMember::Combinator(..))) {
      return Err(self.err(ParserErrorKind::InvalidSelector("trailing combinator".into())));
    }
    Ok(Selector {
      members,
      loc: self.span_from(start),
    })
  }

  fn parse_simple_selector(&mut self) -> Result<SimpleSelector, Error<ParserErrorKind>> {
    match self.kind() {
      TokenKind::Ident => {
        let name = self.advance().text;
        if self.at(TokenKind::Pipe) && self.element_follows_pipe() {
          self.advance();
          self.parse_namespaced_element(Some(name))
        } else {
          Ok(SimpleSelector::Type {
            namespace: None,
            name,
          })
        }
      }
      TokenKind::Asterisk => {
        self.advance();
        if self.at(TokenKind::Pipe) && self.element_follows_pipe() {
          self.advance();
          self.parse_namespaced_element(Some("*".into()))
        } else {
          Ok(SimpleSelector::Universal { namespace: None })
        }
      }
      TokenKind::Pipe => {
        self.advance();
        self.parse_namespaced_element(Some(String::new()))
      }
      TokenKind::Hash => Ok(SimpleSelector::Id(self.advance().text)),
      TokenKind::Delim if self.peek().is_delim('.') => {
        self.advance();
        if !self.at(TokenKind::Ident) {
          return Err(self.err(ParserErrorKind::InvalidSelector(
            "expected a class name after \".\"".into(),
          )));
        }
        Ok(SimpleSelector::Class(self.advance().text))
      }
      TokenKind::LBracket => self.parse_attribute_selector(),
      TokenKind::Colon => self.parse_pseudo_selector(),
      _ => Err(self.err(ParserErrorKind::InvalidSelector(format!(
        "unexpected \"{}\"",
        self.peek().text
      )))),
    }
  }

  fn element_follows_pipe(&self) -> bool {
    matches!(self.peek_at(1).kind, TokenKind::Ident | TokenKind::Asterisk)
  }

  fn parse_namespaced_element(&mut self, namespace: Option<String>) -> Result<SimpleSelector, Error<ParserErrorKind>> {
    match self.kind() {
      TokenKind::Ident => Ok(SimpleSelector::Type {
        namespace,
        name: self.advance().text,
      }),
      TokenKind::Asterisk => {
        self.advance();
        Ok(SimpleSelector::Universal { namespace })
      }
      _ => Err(self.err(ParserErrorKind::InvalidSelector(
        "expected an element name after \"|\"".into(),
      ))),
    }
  }

  fn parse_attribute_selector(&mut self) -> Result<SimpleSelector, Error<ParserErrorKind>> {
    self.advance(); // [
    self.skip_ws();

    let mut namespace = None;
    let name;
    match self.kind() {
      TokenKind::Ident => {
        let first = self.advance().text;
        if self.at(TokenKind::Pipe) && self.element_follows_pipe() {
          self.advance();
          namespace = Some(first);
          if !self.at(TokenKind::Ident) {
            return Err(self.err(ParserErrorKind::InvalidSelector(
              "expected an attribute name".into(),
            )));
          }
          name = self.advance().text;
        } else {
          name = first;
        }
      }
      TokenKind::Asterisk | TokenKind::Pipe => {
        if self.at(TokenKind::Asterisk) {
          self.advance();
          namespace = Some("*".into());
        } else {
          namespace = Some(String::new());
        }
        if self.at(TokenKind::Pipe) {
          self.advance();
        }
        if !self.at(TokenKind::Ident) {
          return Err(self.err(ParserErrorKind::InvalidSelector(
            "expected an attribute name".into(),
          )));
        }
        name = self.advance().text;
      }
      _ => {
        return Err(self.err(ParserErrorKind::InvalidSelector(
          "expected an attribute name".into(),
        )));
      }
    }

    self.skip_ws();
    let operator = match self.kind() {
      TokenKind::RBracket => {
        self.advance();
        return Ok(SimpleSelector::Attribute(AttributeSelector {
          namespace,
          name,
          operation: None,
        }));
      }
      TokenKind::Equals => AttributeOperator::Equals,
      TokenKind::Includes => AttributeOperator::Includes,
      TokenKind::DashMatch => AttributeOperator::DashMatch,
      TokenKind::PrefixMatch => AttributeOperator::PrefixMatch,
      TokenKind::SuffixMatch => AttributeOperator::SuffixMatch,
      TokenKind::SubstringMatch => AttributeOperator::SubstringMatch,
      _ => {
        return Err(self.err(ParserErrorKind::InvalidSelector(
          "expected \"]\" or an attribute operator".into(),
        )));
      }
    };
    self.advance();
    self.skip_ws();

    let value = match self.kind() {
      TokenKind::Ident => self.advance().text,
      TokenKind::String => self.advance().text,
      _ => {
        return Err(self.err(ParserErrorKind::InvalidSelector(
          "expected an attribute value".into(),
        )));
      }
    };
    self.skip_ws();
    if !self.at(TokenKind::RBracket) {
      return Err(self.err(ParserErrorKind::InvalidSelector("expected \"]\"".into())));
    }
    self.advance();

    Ok(SimpleSelector::Attribute(AttributeSelector {
      namespace,
      name,
      operation: Some((operator, value)),
    }))
  }

  fn parse_pseudo_selector(&mut self) -> Result<SimpleSelector, Error<ParserErrorKind>> {
    self.advance(); // :
    let double_colon = self.at(TokenKind::Colon);
    if double_colon {
      self.advance();
    }
    match self.kind() {
      TokenKind::Ident => {
        let name = self.advance().text;
        if double_colon {
          Ok(SimpleSelector::PseudoElement(name))
        } else {
          Ok(SimpleSelector::PseudoClass(name))
        }
      }
      TokenKind::Function => {
        let name = self.advance().text;
        let args = if takes_selector_args(&name) {
          let list = self.parse_selector_list(true)?;
          PseudoFunctionArgs::Selectors(list)
        } else {
          PseudoFunctionArgs::Raw(self.consume_raw_args()?)
        };
        if !self.at(TokenKind::RParen) {
          return Err(self.err(ParserErrorKind::InvalidSelector("expected \")\"".into())));
        }
        self.advance();
        Ok(SimpleSelector::PseudoFunction(PseudoFunction {
          name,
          double_colon,
          args,
        }))
      }
      _ => Err(self.err(ParserErrorKind::InvalidSelector(
        "expected a pseudo-class name".into(),
      ))),
    }
  }

  /// Collects the raw argument text of a non-selector functional pseudo
  /// (nth expressions, `:lang(…)` …) up to the matching `)`, dropping
  /// whitespace: `2n + 1` normalizes to `2n+1`.
  fn consume_raw_args(&mut self) -> Result<String, Error<ParserErrorKind>> {
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
      match self.kind() {
        TokenKind::Eof => {
          return Err(self.err(ParserErrorKind::UnexpectedEndOfInput { expected: "\")\"" }));
        }
        TokenKind::RParen if depth == 0 => break,
        TokenKind::RParen => {
          depth -= 1;
          self.advance().write_raw(&mut text);
        }
        TokenKind::LParen | TokenKind::Function => {
          depth += 1;
          self.advance().write_raw(&mut text);
        }
        kind if Self::is_trivia(kind) => {
          self.pos += 1;
        }
        _ => {
          self.advance().write_raw(&mut text);
        }
      }
    }
    Ok(text)
  }
}

fn record(skipped: &mut Option<(Token, Token)>, token: Token) {
  match skipped {
    Some((_, last)) => *last = token,
    None => *skipped = Some((token.clone(), token)),
  }
}
