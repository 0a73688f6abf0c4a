//! Media queries, as used by `@media` and `@import`.

use crate::error::{Error, PrinterErrorKind};
use crate::location::SourceSpan;
use crate::printer::Printer;
use crate::traits::ToCss;
use crate::values::expression::Expression;

/// A comma-separated list of media queries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaList {
  pub media_queries: Vec<MediaQuery>,
  pub loc: SourceSpan,
}

impl MediaList {
  pub fn is_empty(&self) -> bool {
    self.media_queries.is_empty()
  }
}

/// One media query: an optional qualifier, an optional medium, and feature
/// tests joined by `and`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaQuery {
  pub qualifier: Option<MediaQualifier>,
  pub media_type: Option<String>,
  pub features: Vec<MediaFeature>,
  pub loc: SourceSpan,
}

impl MediaQuery {
  /// A query that matches a bare medium, e.g. `print`.
  pub fn medium(name: impl Into<String>) -> MediaQuery {
    MediaQuery {
      media_type: Some(name.into()),
      ..MediaQuery::default()
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaQualifier {
  Only,
  Not,
}

impl MediaQualifier {
  pub fn as_str(&self) -> &'static str {
    match self {
      MediaQualifier::Only => "only",
      MediaQualifier::Not => "not",
    }
  }
}

/// A parenthesized feature test, with or without a value:
/// `(monochrome)`, `(min-width: 600px)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFeature {
  pub name: String,
  pub value: Option<Expression>,
  pub loc: SourceSpan,
}

impl ToCss for MediaList {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let mut first = true;
    for query in &self.media_queries {
      if first {
        first = false;
      } else {
        dest.delim(',', false)?;
      }
      query.to_css(dest)?;
    }
    Ok(())
  }
}

impl ToCss for MediaQuery {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    let mut need_and = false;
    if let Some(qualifier) = &self.qualifier {
      dest.write_str(qualifier.as_str())?;
      dest.write_char(' ')?;
    }
    if let Some(media_type) = &self.media_type {
      dest.write_str(media_type)?;
      need_and = true;
    }
    for feature in &self.features {
      if need_and {
        dest.write_str(" and ")?;
      }
      feature.to_css(dest)?;
      need_and = true;
    }
    Ok(())
  }
}

impl ToCss for MediaFeature {
  fn to_css<W>(&self, dest: &mut Printer<W>) -> Result<(), Error<PrinterErrorKind>>
  where
    W: std::fmt::Write,
  {
    dest.write_char('(')?;
    dest.write_str(&self.name)?;
    if let Some(value) = &self.value {
      dest.delim(':', false)?;
      value.to_css(dest)?;
    }
    dest.write_char(')')
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::printer::PrinterOptions;

  #[test]
  fn full_query_serializes() {
    let query = MediaQuery {
      qualifier: Some(MediaQualifier::Only),
      media_type: Some("screen".into()),
      features: vec![
        MediaFeature {
          name: "min-width".into(),
          value: Some(Expression::number("600px")),
          loc: SourceSpan::default(),
        },
        MediaFeature {
          name: "monochrome".into(),
          value: None,
          loc: SourceSpan::default(),
        },
      ],
      loc: SourceSpan::default(),
    };
    assert_eq!(
      query.to_css_string(&PrinterOptions::default()).unwrap(),
      "only screen and (min-width: 600px) and (monochrome)"
    );
    assert_eq!(
      query.to_css_string(&PrinterOptions::minified()).unwrap(),
      "only screen and (min-width:600px) and (monochrome)"
    );
  }

  #[test]
  fn feature_only_query_has_no_leading_and() {
    let query = MediaQuery {
      qualifier: None,
      media_type: None,
      features: vec![MediaFeature {
        name: "orientation".into(),
        value: Some(Expression::ident("landscape")),
        loc: SourceSpan::default(),
      }],
      loc: SourceSpan::default(),
    };
    assert_eq!(
      query.to_css_string(&PrinterOptions::default()).unwrap(),
      "(orientation: landscape)"
    );
  }
}
