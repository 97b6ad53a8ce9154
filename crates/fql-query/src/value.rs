//! Value interpretation.
//!
//! Classifies the value part of a clause into a [`ValueSpec`] according to the
//! kind of the field it targets. Numeric values are parsed and normalized here
//! so every backend translator sees identical bounds:
//!
//! - `>=n`, `>n`, `<=n`, `<n` become comparisons. On integer fields `>n` and
//!   `<n` are rewritten to the closed `>=n+1` and `<=n-1`, since point-based
//!   numeric indexes only support closed ranges.
//! - `[a TO b]` becomes an inclusive range; an empty side or `*` is unbounded.
//! - Anything else must be a plain number.
//!
//! Text values become lower-cased literals, or phrases when quoted.

use std::{cmp::Ordering, fmt, ops::Bound};

use serde::Serialize;
use thiserror::Error;

use crate::schema::{FieldKind, NumericType};

/// A numeric comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
}

impl Operator {
    /// The operator's query syntax.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operators in match order: two-character forms first so `>` never shadows `>=`.
const OPERATORS: [Operator; 4] = [Operator::Ge, Operator::Gt, Operator::Le, Operator::Lt];

/// A parsed number, typed by the field's storage representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// A whole number for integer fields.
    Integer(i64),
    /// A finite floating-point number for float fields.
    Float(f64),
}

impl Number {
    /// Returns the value as `f64`, for comparisons across representations.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Integer(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// An exact value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    /// A lower-cased term for a text field.
    Text(String),
    /// An exact number for a numeric field.
    Number(Number),
}

/// The interpreted value of a clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSpec {
    /// Exact or term match.
    Literal(Literal),
    /// Ordered phrase terms; never empty.
    Phrase(Vec<String>),
    /// Numeric comparison against a single bound.
    Comparison(Operator, Number),
    /// Inclusive numeric range; `None` leaves a side unbounded.
    Range {
        /// Lower bound.
        low: Option<Number>,
        /// Upper bound.
        high: Option<Number>,
    },
}

impl ValueSpec {
    /// Creates a text literal.
    pub fn text(term: impl Into<String>) -> Self {
        Self::Literal(Literal::Text(term.into()))
    }

    /// Creates a numeric literal.
    pub fn number(number: Number) -> Self {
        Self::Literal(Literal::Number(number))
    }

    /// Creates a phrase from its terms.
    pub fn phrase<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        Self::Phrase(terms.into_iter().map(Into::into).collect())
    }

    /// Returns true for values that only make sense on numeric fields.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Literal(Literal::Number(_)) | Self::Comparison(..) | Self::Range { .. }
        )
    }

    /// Expresses a numeric value as a pair of bounds.
    ///
    /// Exact numbers become a single-point closed range. Returns `None` for
    /// text literals and phrases.
    pub fn bounds(&self) -> Option<(Bound<Number>, Bound<Number>)> {
        let bounds = match self {
            Self::Literal(Literal::Number(n)) => (Bound::Included(*n), Bound::Included(*n)),
            Self::Comparison(Operator::Gt, n) => (Bound::Excluded(*n), Bound::Unbounded),
            Self::Comparison(Operator::Ge, n) => (Bound::Included(*n), Bound::Unbounded),
            Self::Comparison(Operator::Lt, n) => (Bound::Unbounded, Bound::Excluded(*n)),
            Self::Comparison(Operator::Le, n) => (Bound::Unbounded, Bound::Included(*n)),
            Self::Range { low, high } => (
                low.map_or(Bound::Unbounded, Bound::Included),
                high.map_or(Bound::Unbounded, Bound::Included),
            ),
            Self::Literal(Literal::Text(_)) | Self::Phrase(_) => return None,
        };
        Some(bounds)
    }

    /// Formats the value in query syntax.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Literal(Literal::Text(term)) => term.clone(),
            Self::Literal(Literal::Number(n)) => n.to_string(),
            Self::Phrase(terms) => format!("\"{}\"", terms.join(" ")),
            Self::Comparison(op, n) => format!("{op}{n}"),
            Self::Range { low, high } => {
                let side = |n: Option<Number>| n.map_or_else(|| "*".to_string(), |n| n.to_string());
                format!("[{} TO {}]", side(*low), side(*high))
            }
        }
    }
}

/// Why a value could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Nothing to interpret.
    #[error("value is empty")]
    Empty,

    /// A comparison operator with no number after it.
    #[error("expected a number after '{0}'")]
    MissingOperand(Operator),

    /// Not a whole number.
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    /// Not a finite number.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// Bracketed, but not `[low TO high]`.
    #[error("expected '[low TO high]', found '{0}'")]
    MalformedRange(String),

    /// The low side of a range is above the high side.
    #[error("lower bound {low} is greater than upper bound {high}")]
    InvertedRange {
        /// Lower bound as written.
        low: String,
        /// Upper bound as written.
        high: String,
    },

    /// A strict integer comparison whose closed form does not fit in `i64`.
    #[error("'{op}{value}' cannot be expressed as a closed integer bound")]
    Overflow {
        /// The strict operator.
        op: Operator,
        /// The operand.
        value: i64,
    },
}

impl ValueError {
    /// The part of `raw` that caused the error.
    pub fn offending<'a>(&'a self, raw: &'a str) -> &'a str {
        match self {
            Self::NotAnInteger(text) | Self::NotANumber(text) => text,
            _ => raw,
        }
    }
}

/// Interprets a clause value against a field kind.
///
/// `quoted` is true when the value was written inside double quotes; the
/// quotes must already be stripped from `value`.
pub fn interpret(value: &str, quoted: bool, kind: FieldKind) -> Result<ValueSpec, ValueError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValueError::Empty);
    }

    match kind {
        FieldKind::Numeric(ty) => interpret_numeric(value, ty),
        FieldKind::Text if quoted => Ok(ValueSpec::phrase(
            value.split_whitespace().map(str::to_lowercase),
        )),
        FieldKind::Text => Ok(ValueSpec::text(value.to_lowercase())),
    }
}

/// Interprets a value on a numeric field.
fn interpret_numeric(value: &str, ty: NumericType) -> Result<ValueSpec, ValueError> {
    if let Some((op, operand)) = split_operator(value) {
        return comparison(op, operand.trim(), ty);
    }

    if let Some(inner) = value.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| ValueError::MalformedRange(value.to_string()))?;
        return range(inner, value, ty);
    }

    parse_number(value, ty).map(ValueSpec::number)
}

/// Splits a leading comparison operator from its operand.
fn split_operator(value: &str) -> Option<(Operator, &str)> {
    OPERATORS
        .iter()
        .find_map(|op| value.strip_prefix(op.symbol()).map(|rest| (*op, rest)))
}

/// Builds a comparison, closing strict integer bounds.
fn comparison(op: Operator, operand: &str, ty: NumericType) -> Result<ValueSpec, ValueError> {
    if operand.is_empty() {
        return Err(ValueError::MissingOperand(op));
    }

    let number = parse_number(operand, ty)?;
    let overflow = |value| ValueError::Overflow { op, value };

    match (op, number) {
        (Operator::Gt, Number::Integer(n)) => n
            .checked_add(1)
            .map(|bound| ValueSpec::Comparison(Operator::Ge, Number::Integer(bound)))
            .ok_or_else(|| overflow(n)),
        (Operator::Lt, Number::Integer(n)) => n
            .checked_sub(1)
            .map(|bound| ValueSpec::Comparison(Operator::Le, Number::Integer(bound)))
            .ok_or_else(|| overflow(n)),
        _ => Ok(ValueSpec::Comparison(op, number)),
    }
}

/// Parses the inside of `[low TO high]`.
fn range(inner: &str, raw: &str, ty: NumericType) -> Result<ValueSpec, ValueError> {
    let words: Vec<&str> = inner.split_whitespace().collect();
    let (low, high) = match words.as_slice() {
        [low, "TO", high] => (Some(*low), Some(*high)),
        ["TO", high] => (None, Some(*high)),
        [low, "TO"] => (Some(*low), None),
        ["TO"] => (None, None),
        _ => return Err(ValueError::MalformedRange(raw.to_string())),
    };

    let bound = |side: Option<&str>| match side {
        None | Some("*") => Ok(None),
        Some(text) => parse_number(text, ty).map(Some),
    };
    let (low, high) = (bound(low)?, bound(high)?);

    if let (Some(l), Some(h)) = (low, high)
        && l > h
    {
        return Err(ValueError::InvertedRange {
            low: l.to_string(),
            high: h.to_string(),
        });
    }

    Ok(ValueSpec::Range { low, high })
}

/// Parses a number in the field's representation.
fn parse_number(text: &str, ty: NumericType) -> Result<Number, ValueError> {
    match ty {
        NumericType::Integer => text
            .parse::<i64>()
            .map(Number::Integer)
            .map_err(|_| ValueError::NotAnInteger(text.to_string())),
        NumericType::Float => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Number::Float)
            .ok_or_else(|| ValueError::NotANumber(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INT: FieldKind = FieldKind::Numeric(NumericType::Integer);
    const FLOAT: FieldKind = FieldKind::Numeric(NumericType::Float);

    fn int(n: i64) -> Number {
        Number::Integer(n)
    }

    fn float(x: f64) -> Number {
        Number::Float(x)
    }

    #[test]
    fn text_literal_is_lowercased() {
        assert_eq!(
            interpret("SciFi", false, FieldKind::Text),
            Ok(ValueSpec::text("scifi"))
        );
    }

    #[test]
    fn quoted_text_is_phrase() {
        assert_eq!(
            interpret("Blade  Runner", true, FieldKind::Text),
            Ok(ValueSpec::phrase(["blade", "runner"]))
        );
    }

    #[test]
    fn operators_on_text_are_literal() {
        assert_eq!(
            interpret(">=2000", false, FieldKind::Text),
            Ok(ValueSpec::text(">=2000"))
        );
    }

    #[test]
    fn empty_value() {
        assert_eq!(interpret("  ", false, INT), Err(ValueError::Empty));
        assert_eq!(interpret("", true, FieldKind::Text), Err(ValueError::Empty));
    }

    #[test]
    fn integer_comparisons() {
        assert_eq!(
            interpret(">=2000", false, INT),
            Ok(ValueSpec::Comparison(Operator::Ge, int(2000)))
        );
        assert_eq!(
            interpret("<=1999", false, INT),
            Ok(ValueSpec::Comparison(Operator::Le, int(1999)))
        );
    }

    #[test]
    fn strict_integer_comparisons_are_closed() {
        assert_eq!(
            interpret(">2000", false, INT),
            Ok(ValueSpec::Comparison(Operator::Ge, int(2001)))
        );
        assert_eq!(
            interpret("<2000", false, INT),
            Ok(ValueSpec::Comparison(Operator::Le, int(1999)))
        );
    }

    #[test]
    fn strict_float_comparisons_stay_open() {
        assert_eq!(
            interpret(">8", false, FLOAT),
            Ok(ValueSpec::Comparison(Operator::Gt, float(8.0)))
        );
        assert_eq!(
            interpret("<7.5", false, FLOAT),
            Ok(ValueSpec::Comparison(Operator::Lt, float(7.5)))
        );
    }

    #[test]
    fn comparison_overflow() {
        let value = format!(">{}", i64::MAX);
        assert_eq!(
            interpret(&value, false, INT),
            Err(ValueError::Overflow {
                op: Operator::Gt,
                value: i64::MAX
            })
        );
    }

    #[test]
    fn comparison_errors() {
        assert_eq!(
            interpret(">=abc", false, INT),
            Err(ValueError::NotAnInteger("abc".into()))
        );
        assert_eq!(
            interpret(">=", false, INT),
            Err(ValueError::MissingOperand(Operator::Ge))
        );
        assert_eq!(
            interpret(">7.5", false, INT),
            Err(ValueError::NotAnInteger("7.5".into()))
        );
    }

    #[test]
    fn inclusive_range() {
        assert_eq!(
            interpret("[7 TO 9]", false, FLOAT),
            Ok(ValueSpec::Range {
                low: Some(float(7.0)),
                high: Some(float(9.0))
            })
        );
    }

    #[test]
    fn open_ranges() {
        assert_eq!(
            interpret("[2000 TO ]", false, INT),
            Ok(ValueSpec::Range {
                low: Some(int(2000)),
                high: None
            })
        );
        assert_eq!(
            interpret("[ TO 2000]", false, INT),
            Ok(ValueSpec::Range {
                low: None,
                high: Some(int(2000))
            })
        );
        assert_eq!(
            interpret("[* TO 5]", false, INT),
            Ok(ValueSpec::Range {
                low: None,
                high: Some(int(5))
            })
        );
    }

    #[test]
    fn range_keyword_is_case_sensitive() {
        assert_eq!(
            interpret("[7 to 9]", false, INT),
            Err(ValueError::MalformedRange("[7 to 9]".into()))
        );
    }

    #[test]
    fn malformed_ranges() {
        assert!(matches!(
            interpret("[7 TO 9", false, INT),
            Err(ValueError::MalformedRange(_))
        ));
        assert!(matches!(
            interpret("[7 9]", false, INT),
            Err(ValueError::MalformedRange(_))
        ));
        assert_eq!(
            interpret("[a TO 9]", false, INT),
            Err(ValueError::NotAnInteger("a".into()))
        );
    }

    #[test]
    fn inverted_range() {
        assert_eq!(
            interpret("[9 TO 7]", false, INT),
            Err(ValueError::InvertedRange {
                low: "9".into(),
                high: "7".into()
            })
        );
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(interpret("2024", false, INT), Ok(ValueSpec::number(int(2024))));
        assert_eq!(interpret("8", false, FLOAT), Ok(ValueSpec::number(float(8.0))));
        assert_eq!(
            interpret("2024", true, INT),
            Ok(ValueSpec::number(int(2024)))
        );
        assert_eq!(
            interpret("nan", false, FLOAT),
            Err(ValueError::NotANumber("nan".into()))
        );
    }

    #[test]
    fn bounds_of_numeric_values() {
        assert_eq!(
            ValueSpec::Comparison(Operator::Gt, float(8.0)).bounds(),
            Some((Bound::Excluded(float(8.0)), Bound::Unbounded))
        );
        assert_eq!(
            ValueSpec::number(int(3)).bounds(),
            Some((Bound::Included(int(3)), Bound::Included(int(3))))
        );
        assert_eq!(
            ValueSpec::Range {
                low: None,
                high: Some(int(9))
            }
            .bounds(),
            Some((Bound::Unbounded, Bound::Included(int(9))))
        );
        assert_eq!(ValueSpec::text("x").bounds(), None);
    }

    #[test]
    fn query_string_form() {
        assert_eq!(
            ValueSpec::Comparison(Operator::Ge, int(2000)).to_query_string(),
            ">=2000"
        );
        assert_eq!(
            ValueSpec::Range {
                low: Some(float(7.5)),
                high: None
            }
            .to_query_string(),
            "[7.5 TO *]"
        );
        assert_eq!(
            ValueSpec::phrase(["blade", "runner"]).to_query_string(),
            "\"blade runner\""
        );
    }

    #[test]
    fn offending_text() {
        let err = ValueError::NotAnInteger("abc".into());
        assert_eq!(err.offending(">=abc"), "abc");
        let err = ValueError::MalformedRange("[1 2]".into());
        assert_eq!(err.offending("[1 2]"), "[1 2]");
    }
}
