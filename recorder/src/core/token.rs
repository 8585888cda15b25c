//! Input tokens accepted by the class-name resolver.
//!
//! A [`Token`] is a closed, recursive variant over everything a caller may
//! pass: text, numbers, booleans, absence markers, nested sequences and
//! label-to-flag mappings. Truthiness follows JavaScript rules so that
//! conditional expressions such as `is_active.then_some("active")` drop out
//! of the result instead of contributing a label.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One value passed to [`resolve`](crate::core::class_names::resolve).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `null` / `undefined` / `None`.
    Absent,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Nested tokens, resolved recursively.
    Sequence(Vec<Token>),
    /// Labels paired with inclusion flags, kept in insertion order.
    Mapping(Vec<(String, Token)>),
    /// Any shape the resolver has no rule for. Always skipped.
    Unsupported,
}

impl Token {
    /// Build a mapping token from `(label, flag)` pairs, preserving their order.
    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Token>,
    {
        Token::Mapping(
            pairs
                .into_iter()
                .map(|(label, flag)| (label.into(), flag.into()))
                .collect(),
        )
    }

    /// JavaScript truthiness.
    ///
    /// Falsy: `Absent`, `false`, `0`, `-0`, `NaN` and the empty string.
    /// Everything else is truthy, including empty sequences and mappings.
    pub fn is_truthy(&self) -> bool {
        match self {
            Token::Absent => false,
            Token::Bool(value) => *value,
            Token::Number(value) => *value != 0.0 && !value.is_nan(),
            Token::Text(value) => !value.is_empty(),
            Token::Sequence(_) | Token::Mapping(_) | Token::Unsupported => true,
        }
    }

    /// The single label a text or numeric token contributes, if any.
    pub fn label(&self) -> Option<Cow<'_, str>> {
        if !self.is_truthy() {
            return None;
        }
        match self {
            Token::Text(value) => Some(Cow::Borrowed(value.as_str())),
            Token::Number(value) => Some(Cow::Owned(number_to_text(*value))),
            _ => None,
        }
    }
}

/// Render a number exactly as JavaScript's `Number.prototype.toString` does:
/// shortest round-trip digits, exponent form outside `[1e-6, 1e21)`, and
/// `Infinity` for infinities.
fn number_to_text(value: f64) -> String {
    ryu_js::Buffer::new().format(value).to_string()
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Token::Text(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Token::Text(value)
    }
}

impl From<&String> for Token {
    fn from(value: &String) -> Self {
        Token::Text(value.clone())
    }
}

impl From<bool> for Token {
    fn from(value: bool) -> Self {
        Token::Bool(value)
    }
}

macro_rules! number_token_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Token {
                fn from(value: $ty) -> Self {
                    Token::Number(f64::from(value))
                }
            }
        )*
    };
}

number_token_from!(i8, i16, i32, u8, u16, u32, f64);

impl From<f32> for Token {
    /// Keeps the shortest decimal form of the `f32`, so `0.1f32` labels as
    /// `0.1` rather than the digits of its widened binary value.
    fn from(value: f32) -> Self {
        let shortest = ryu_js::Buffer::new().format(value).to_string();
        Token::Number(shortest.parse().unwrap_or_else(|_| f64::from(value)))
    }
}

macro_rules! wide_number_token_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Token {
                #[allow(clippy::cast_precision_loss)]
                fn from(value: $ty) -> Self {
                    Token::Number(value as f64)
                }
            }
        )*
    };
}

wide_number_token_from!(i64, u64, isize, usize);

impl<T: Into<Token>> From<Option<T>> for Token {
    fn from(value: Option<T>) -> Self {
        value.map_or(Token::Absent, Into::into)
    }
}

impl<T: Into<Token>> From<Vec<T>> for Token {
    fn from(values: Vec<T>) -> Self {
        Token::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Token>, const N: usize> From<[T; N]> for Token {
    fn from(values: [T; N]) -> Self {
        Token::Sequence(values.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for Token {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Token::Absent,
            Value::Bool(value) => Token::Bool(value),
            Value::Number(number) => number.as_f64().map_or(Token::Unsupported, Token::Number),
            Value::String(value) => Token::Text(value),
            Value::Array(values) => Token::from(values),
            Value::Object(map) => Token::mapping(map),
        }
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Token::from)
    }
}
