//! The shorthand property registry.
//!
//! Maps shorthand property names (`margin`, `border`, `font` …) to their
//! ordered sub-properties with default values, and splits a shorthand
//! declaration into its sub-declarations by greedy left-to-right matching.
//! The registry is process-wide, populated with the built-in descriptors on
//! first use, and extensible by callers.

use crate::declaration::Declaration;
use crate::values::expression::{Expression, ExpressionMember};
use ahash::RandomState;
use indexmap::IndexMap;
use itertools::{EitherOrBoth, Itertools};
use lazy_static::lazy_static;
use std::sync::RwLock;

const BORDER_STYLES: &[&str] = &[
  "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const NAMED_COLORS: &[&str] = &[
  "aqua",
  "black",
  "blue",
  "fuchsia",
  "gray",
  "green",
  "lime",
  "maroon",
  "navy",
  "olive",
  "orange",
  "purple",
  "red",
  "silver",
  "teal",
  "white",
  "yellow",
  "transparent",
  "currentcolor",
];

const COLOR_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla"];

/// How a sub-property recognizes its value among the shorthand's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMatcher {
  /// Hash colors, the color functions, and the CSS 2.1 named colors.
  Color,
  /// Numeric values (with or without a unit) and the sizing keywords.
  Length,
  /// One of a fixed keyword set, matched case-insensitively.
  Keywords(&'static [&'static str]),
  /// A `url(…)` term.
  Url,
  /// A bare number.
  Number,
  /// Consumes every remaining member, e.g. `font-family`.
  Rest,
}

impl ValueMatcher {
  fn matches(&self, member: &ExpressionMember) -> bool {
    match self {
      ValueMatcher::Color => match member {
        ExpressionMember::Term(term) => {
          term.is_hash_color() || NAMED_COLORS.iter().any(|c| term.value.eq_ignore_ascii_case(c))
        }
        ExpressionMember::Function(function) => {
          COLOR_FUNCTIONS.iter().any(|f| function.name.eq_ignore_ascii_case(f))
        }
        _ => false,
      },
      ValueMatcher::Length => match member {
        ExpressionMember::Term(term) => {
          term.is_numeric()
            || ["thin", "medium", "thick", "auto"]
              .iter()
              .any(|k| term.value.eq_ignore_ascii_case(k))
        }
        ExpressionMember::Math(..) => true,
        _ => false,
      },
      ValueMatcher::Keywords(keywords) => match member {
        ExpressionMember::Term(term) => keywords.iter().any(|k| term.value.eq_ignore_ascii_case(k)),
        _ => false,
      },
      ValueMatcher::Url => matches!(member, ExpressionMember::Url(..)),
      ValueMatcher::Number => match member {
        ExpressionMember::Term(term) => {
          term.is_numeric() && term.value.chars().all(|c| c.is_ascii_digit() || "+-.".contains(c))
        }
        _ => false,
      },
      ValueMatcher::Rest => true,
    }
  }
}

/// One sub-property of a shorthand.
#[derive(Debug, Clone)]
pub struct SubProperty {
  pub name: String,
  pub matcher: ValueMatcher,
  /// The textual default used when no member matches.
  pub default: String,
}

impl SubProperty {
  pub fn new(name: &str, matcher: ValueMatcher, default: &str) -> SubProperty {
    SubProperty {
      name: name.into(),
      matcher,
      default: default.into(),
    }
  }

  fn default_expression(&self) -> Expression {
    Expression::ident(&self.default)
  }
}

/// A shorthand property and its ordered sub-properties.
#[derive(Debug, Clone)]
pub struct ShorthandDescriptor {
  pub property: String,
  pub sub_properties: Vec<SubProperty>,
  /// The four-sided box pattern (`margin`, `padding`, `border-width` …):
  /// 1, 2, or 3 values expand to four by the top/right/bottom/left rule.
  pub box_sides: bool,
}

impl ShorthandDescriptor {
  /// Splits `declaration` into one declaration per sub-property.
  /// `!important` carries over to every result.
  pub fn split(&self, declaration: &Declaration) -> Vec<Declaration> {
    let split = if self.box_sides {
      self.split_box(declaration)
    } else {
      self.split_greedy(declaration)
    };
    split
      .into_iter()
      .map(|(name, value)| {
        let mut sub = Declaration::new(name, value);
        sub.important = declaration.important;
        sub
      })
      .collect()
  }

  fn split_box(&self, declaration: &Declaration) -> Vec<(String, Expression)> {
    let values: Vec<&ExpressionMember> = declaration
      .value
      .members
      .iter()
      .filter(|m| !matches!(m, ExpressionMember::Operator(..)))
      .collect();

    let expanded: Vec<Expression> = if values.is_empty() {
      Vec::new()
    } else {
      let indices: [usize; 4] = match values.len() {
        1 => [0, 0, 0, 0],
        2 => [0, 1, 0, 1],
        3 => [0, 1, 2, 1],
        _ => [0, 1, 2, 3],
      };
      indices.iter().map(|&i| Expression::from(values[i].clone())).collect()
    };

    self
      .sub_properties
      .iter()
      .zip_longest(expanded)
      .filter_map(|pair| match pair {
        EitherOrBoth::Both(sub, value) => Some((sub.name.clone(), value)),
        EitherOrBoth::Left(sub) => Some((sub.name.clone(), sub.default_expression())),
        EitherOrBoth::Right(..) => None,
      })
      .collect()
  }

  fn split_greedy(&self, declaration: &Declaration) -> Vec<(String, Expression)> {
    let members = &declaration.value.members;
    let mut used = vec![false; members.len()];
    let mut result = Vec::with_capacity(self.sub_properties.len());

    for sub in &self.sub_properties {
      if sub.matcher == ValueMatcher::Rest {
        // Everything from the first unconsumed member on, operators
        // included, belongs to this sub-property.
        let first = used
          .iter()
          .zip(members.iter())
          .position(|(&used, member)| !used && !matches!(member, ExpressionMember::Operator(..)));
        let value = match first {
          Some(first) => {
            let mut rest = Expression::new();
            for (i, member) in members.iter().enumerate().skip(first) {
              if !used[i] {
                used[i] = true;
                rest.push(member.clone());
              }
            }
            rest
          }
          None => sub.default_expression(),
        };
        result.push((sub.name.clone(), value));
        continue;
      }

      let found = members.iter().enumerate().find(|(i, member)| {
        !used[*i] && !matches!(member, ExpressionMember::Operator(..)) && sub.matcher.matches(member)
      });
      match found {
        Some((i, member)) => {
          used[i] = true;
          result.push((sub.name.clone(), Expression::from(member.clone())));
        }
        None => result.push((sub.name.clone(), sub.default_expression())),
      }
    }
    result
  }
}

/// The registry of shorthand descriptors, keyed case-insensitively.
pub struct ShorthandRegistry {
  descriptors: IndexMap<String, ShorthandDescriptor, RandomState>,
}

fn box_descriptor(property: &str, template: &str, matcher: ValueMatcher, default: &str) -> ShorthandDescriptor {
  ShorthandDescriptor {
    property: property.into(),
    sub_properties: ["top", "right", "bottom", "left"]
      .iter()
      .map(|side| SubProperty::new(&template.replace('*', side), matcher, default))
      .collect(),
    box_sides: true,
  }
}

fn edge_descriptor(side: &str) -> ShorthandDescriptor {
  ShorthandDescriptor {
    property: format!("border-{}", side),
    sub_properties: vec![
      SubProperty::new(&format!("border-{}-width", side), ValueMatcher::Length, "medium"),
      SubProperty::new(
        &format!("border-{}-style", side),
        ValueMatcher::Keywords(BORDER_STYLES),
        "none",
      ),
      SubProperty::new(&format!("border-{}-color", side), ValueMatcher::Color, "currentcolor"),
    ],
    box_sides: false,
  }
}

impl ShorthandRegistry {
  fn builtin() -> ShorthandRegistry {
    let mut registry = ShorthandRegistry {
      descriptors: IndexMap::default(),
    };

    registry.register(box_descriptor("margin", "margin-*", ValueMatcher::Length, "0"));
    registry.register(box_descriptor("padding", "padding-*", ValueMatcher::Length, "0"));
    registry.register(box_descriptor(
      "border-width",
      "border-*-width",
      ValueMatcher::Length,
      "medium",
    ));
    registry.register(box_descriptor(
      "border-style",
      "border-*-style",
      ValueMatcher::Keywords(BORDER_STYLES),
      "none",
    ));
    registry.register(box_descriptor(
      "border-color",
      "border-*-color",
      ValueMatcher::Color,
      "currentcolor",
    ));

    registry.register(ShorthandDescriptor {
      property: "border".into(),
      sub_properties: vec![
        SubProperty::new("border-width", ValueMatcher::Length, "medium"),
        SubProperty::new("border-style", ValueMatcher::Keywords(BORDER_STYLES), "none"),
        SubProperty::new("border-color", ValueMatcher::Color, "currentcolor"),
      ],
      box_sides: false,
    });
    for side in ["top", "right", "bottom", "left"] {
      registry.register(edge_descriptor(side));
    }

    registry.register(ShorthandDescriptor {
      property: "outline".into(),
      sub_properties: vec![
        SubProperty::new("outline-width", ValueMatcher::Length, "medium"),
        SubProperty::new("outline-style", ValueMatcher::Keywords(BORDER_STYLES), "none"),
        SubProperty::new("outline-color", ValueMatcher::Color, "invert"),
      ],
      box_sides: false,
    });

    registry.register(ShorthandDescriptor {
      property: "background".into(),
      sub_properties: vec![
        SubProperty::new("background-color", ValueMatcher::Color, "transparent"),
        SubProperty::new("background-image", ValueMatcher::Url, "none"),
        SubProperty::new(
          "background-repeat",
          ValueMatcher::Keywords(&["repeat", "repeat-x", "repeat-y", "no-repeat"]),
          "repeat",
        ),
        SubProperty::new(
          "background-attachment",
          ValueMatcher::Keywords(&["scroll", "fixed", "local"]),
          "scroll",
        ),
        SubProperty::new("background-position", ValueMatcher::Rest, "0% 0%"),
      ],
      box_sides: false,
    });

    registry.register(ShorthandDescriptor {
      property: "font".into(),
      sub_properties: vec![
        SubProperty::new("font-style", ValueMatcher::Keywords(&["italic", "oblique"]), "normal"),
        SubProperty::new("font-variant", ValueMatcher::Keywords(&["small-caps"]), "normal"),
        SubProperty::new(
          "font-weight",
          ValueMatcher::Keywords(&[
            "bold", "bolder", "lighter", "100", "200", "300", "400", "500", "600", "700", "800", "900",
          ]),
          "normal",
        ),
        SubProperty::new("font-size", ValueMatcher::Length, "medium"),
        SubProperty::new("font-family", ValueMatcher::Rest, "serif"),
      ],
      box_sides: false,
    });

    registry.register(ShorthandDescriptor {
      property: "list-style".into(),
      sub_properties: vec![
        SubProperty::new(
          "list-style-type",
          ValueMatcher::Keywords(&[
            "disc",
            "circle",
            "square",
            "decimal",
            "decimal-leading-zero",
            "lower-roman",
            "upper-roman",
            "lower-alpha",
            "upper-alpha",
            "lower-greek",
            "lower-latin",
            "upper-latin",
            "armenian",
            "georgian",
            "none",
          ]),
          "disc",
        ),
        SubProperty::new(
          "list-style-position",
          ValueMatcher::Keywords(&["inside", "outside"]),
          "outside",
        ),
        SubProperty::new("list-style-image", ValueMatcher::Url, "none"),
      ],
      box_sides: false,
    });

    registry.register(ShorthandDescriptor {
      property: "flex".into(),
      sub_properties: vec![
        SubProperty::new("flex-grow", ValueMatcher::Number, "0"),
        SubProperty::new("flex-shrink", ValueMatcher::Number, "1"),
        SubProperty::new("flex-basis", ValueMatcher::Length, "auto"),
      ],
      box_sides: false,
    });

    registry
  }

  pub fn register(&mut self, descriptor: ShorthandDescriptor) {
    self
      .descriptors
      .insert(descriptor.property.to_ascii_lowercase(), descriptor);
  }

  pub fn get(&self, property: &str) -> Option<&ShorthandDescriptor> {
    self.descriptors.get(&property.to_ascii_lowercase())
  }

  pub fn is_shorthand(&self, property: &str) -> bool {
    self.get(property).is_some()
  }

  /// Registered shorthand names, in registration order.
  pub fn properties(&self) -> Vec<&str> {
    self.descriptors.values().map(|d| d.property.as_str()).collect()
  }

  /// Splits a shorthand declaration, or returns `None` when the property is
  /// not a registered shorthand.
  pub fn split(&self, declaration: &Declaration) -> Option<Vec<Declaration>> {
    Some(self.get(&declaration.property)?.split(declaration))
  }
}

lazy_static! {
  static ref REGISTRY: RwLock<ShorthandRegistry> = RwLock::new(ShorthandRegistry::builtin());
}

/// Runs `f` with read access to the process-wide registry.
pub fn with_registry<T>(f: impl FnOnce(&ShorthandRegistry) -> T) -> T {
  f(&REGISTRY.read().unwrap())
}

/// Adds or replaces a descriptor in the process-wide registry.
pub fn register_shorthand(descriptor: ShorthandDescriptor) {
  REGISTRY.write().unwrap().register(descriptor);
}

/// Splits against the process-wide registry.
pub fn split_shorthand(declaration: &Declaration) -> Option<Vec<Declaration>> {
  REGISTRY.read().unwrap().split(declaration)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::printer::PrinterOptions;
  use crate::traits::ToCss;

  fn decl(property: &str, css: &str) -> Declaration {
    let block = crate::parser::parse_declaration_list(
      &format!("{}: {}", property, css),
      &crate::stylesheet::ParserOptions::default(),
    )
    .unwrap();
    block.declarations.into_iter().next().unwrap()
  }

  fn values(split: &[Declaration]) -> Vec<(String, String)> {
    split
      .iter()
      .map(|d| {
        (
          d.property.clone(),
          d.value.to_css_string(&PrinterOptions::minified()).unwrap(),
        )
      })
      .collect()
  }

  #[test]
  fn margin_expands_by_the_trbl_rule() {
    for (css, expected) in [
      ("1px", ["1px", "1px", "1px", "1px"]),
      ("1px 2px", ["1px", "2px", "1px", "2px"]),
      ("1px 2px 3px", ["1px", "2px", "3px", "2px"]),
      ("1px 2px 3px 4px", ["1px", "2px", "3px", "4px"]),
    ] {
      let split = split_shorthand(&decl("margin", css)).unwrap();
      assert_eq!(
        values(&split),
        vec![
          ("margin-top".to_string(), expected[0].to_string()),
          ("margin-right".to_string(), expected[1].to_string()),
          ("margin-bottom".to_string(), expected[2].to_string()),
          ("margin-left".to_string(), expected[3].to_string()),
        ],
        "for {:?}",
        css
      );
    }
  }

  #[test]
  fn border_matches_by_value_class_in_any_order() {
    let split = split_shorthand(&decl("border", "red solid 2px")).unwrap();
    assert_eq!(
      values(&split),
      vec![
        ("border-width".to_string(), "2px".to_string()),
        ("border-style".to_string(), "solid".to_string()),
        ("border-color".to_string(), "red".to_string()),
      ]
    );
  }

  #[test]
  fn missing_members_take_their_defaults() {
    let split = split_shorthand(&decl("outline", "dotted")).unwrap();
    assert_eq!(
      values(&split),
      vec![
        ("outline-width".to_string(), "medium".to_string()),
        ("outline-style".to_string(), "dotted".to_string()),
        ("outline-color".to_string(), "invert".to_string()),
      ]
    );
  }

  #[test]
  fn background_picks_up_urls_and_position_rest() {
    let split = split_shorthand(&decl("background", "#fff url(bg.png) no-repeat fixed 0 50%")).unwrap();
    let values = values(&split);
    assert_eq!(values[0], ("background-color".to_string(), "#fff".to_string()));
    assert_eq!(values[1], ("background-image".to_string(), "url(bg.png)".to_string()));
    assert_eq!(values[2], ("background-repeat".to_string(), "no-repeat".to_string()));
    assert_eq!(values[3], ("background-attachment".to_string(), "fixed".to_string()));
    assert_eq!(values[4], ("background-position".to_string(), "0 50%".to_string()));
  }

  #[test]
  fn important_carries_over() {
    let mut declaration = decl("padding", "1em");
    declaration.important = true;
    let split = split_shorthand(&declaration).unwrap();
    assert!(split.iter().all(|d| d.important));
  }

  #[test]
  fn non_shorthands_are_not_split() {
    assert!(split_shorthand(&decl("color", "red")).is_none());
  }

  #[test]
  fn callers_can_register_descriptors() {
    register_shorthand(ShorthandDescriptor {
      property: "gap".into(),
      sub_properties: vec![
        SubProperty::new("row-gap", ValueMatcher::Length, "normal"),
        SubProperty::new("column-gap", ValueMatcher::Length, "normal"),
      ],
      box_sides: false,
    });
    let split = split_shorthand(&decl("gap", "1em 2em")).unwrap();
    assert_eq!(split.len(), 2);
    assert!(with_registry(|r| r.is_shorthand("GAP")));
  }
}
