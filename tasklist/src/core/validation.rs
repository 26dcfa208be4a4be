//! Field validation collaborator.
//!
//! The status engine only asks one question of this module: does a page hold
//! a currently-valid value for every field it declares? [`PageValidator`] is
//! that seam. [`FieldRules`] is the built-in implementation covering the rule
//! set used by declarative form schemas.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::core::schema::Page;
use crate::core::types::Answers;

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^£?(\d{1,3}(,\d{3})+|\d+)(\.\d{2})?$").expect("currency pattern compiles")
});

/// Decides whether a page is complete for the given answers.
pub trait PageValidator {
    /// True iff every field declared on `page` holds a valid value in `answers`.
    fn is_valid_page(&self, answers: &Answers, page: &Page) -> bool;
}

/// Bind a validator to `answers`, yielding a per-page predicate.
///
/// Usable directly with iterator adapters over `&&Page` items, e.g.
/// `pages.iter().all(valid_page_for(validator, answers))`.
pub fn valid_page_for<'a>(
    validator: &'a dyn PageValidator,
    answers: &'a Answers,
) -> impl Fn(&&Page) -> bool + 'a {
    move |page| validator.is_valid_page(answers, page)
}

/// A field declared on a page, with the rule its answer must satisfy.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub key: String,
    /// Human-readable name used by error messages in the rendering layer.
    pub name: String,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, rule: FieldRule) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            rule,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Check this field's answer (absent when `value` is `None`).
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        self.rule.accepts(value)
    }
}

/// Validation rule for a single field.
#[derive(Debug, Clone)]
pub enum FieldRule {
    NonEmptyString {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<Regex>,
    },
    OptionalString {
        max_length: Option<usize>,
        pattern: Option<Regex>,
    },
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Currency {
        min: Option<f64>,
        max: Option<f64>,
    },
    Enum {
        valid_values: Vec<String>,
    },
    Date,
}

impl FieldRule {
    pub fn non_empty_string() -> Self {
        FieldRule::NonEmptyString {
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    pub fn optional_string() -> Self {
        FieldRule::OptionalString {
            max_length: None,
            pattern: None,
        }
    }

    pub fn number() -> Self {
        FieldRule::Number {
            min: None,
            max: None,
        }
    }

    pub fn currency() -> Self {
        FieldRule::Currency {
            min: None,
            max: None,
        }
    }

    pub fn one_of<S: AsRef<str>>(values: &[S]) -> Self {
        FieldRule::Enum {
            valid_values: values.iter().map(|v| v.as_ref().to_string()).collect(),
        }
    }

    pub fn accepts(&self, value: Option<&Value>) -> bool {
        let text = value.and_then(as_text);
        let text = text.as_deref().map(str::trim).filter(|t| !t.is_empty());

        match self {
            FieldRule::OptionalString {
                max_length,
                pattern,
            } => match text {
                None => !matches!(value, Some(Value::Array(_) | Value::Object(_))),
                Some(text) => string_fits(text, None, *max_length, pattern.as_ref()),
            },
            FieldRule::NonEmptyString {
                min_length,
                max_length,
                pattern,
            } => text.is_some_and(|text| {
                string_fits(text, *min_length, *max_length, pattern.as_ref())
            }),
            FieldRule::Number { min, max } => text
                .and_then(parse_number)
                .is_some_and(|n| within(n, *min, *max)),
            FieldRule::Currency { min, max } => text
                .filter(|t| CURRENCY_RE.is_match(t))
                .and_then(|t| parse_number(&t.replace(['£', ','], "")))
                .is_some_and(|n| within(n, *min, *max)),
            FieldRule::Enum { valid_values } => {
                text.is_some_and(|text| valid_values.iter().any(|v| v == text))
            }
            FieldRule::Date => {
                text.is_some_and(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok())
            }
        }
    }
}

/// Built-in validator applying each field's [`FieldRule`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRules;

impl PageValidator for FieldRules {
    fn is_valid_page(&self, answers: &Answers, page: &Page) -> bool {
        page.fields
            .iter()
            .all(|field| field.accepts(answers.get(&field.key)))
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn string_fits(
    text: &str,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<&Regex>,
) -> bool {
    let len = text.chars().count();
    min_length.is_none_or(|min| len >= min)
        && max_length.is_none_or(|max| len <= max)
        && pattern.is_none_or(|re| re.is_match(text))
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn within(n: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
}
