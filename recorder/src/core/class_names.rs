//! Conditional class-name concatenation.
//!
//! [`resolve`] flattens a list of [`Token`]s into one space-separated class
//! string. Falsy tokens contribute nothing, text and numbers contribute
//! themselves, sequences are resolved recursively and mappings contribute
//! the labels whose flag is truthy. Nothing here can fail: unsupported
//! shapes are dropped.

use crate::core::token::Token;

/// Resolve tokens into a space-separated class string.
///
/// Labels appear in the order of a left-to-right, depth-first walk of the
/// input, joined by single spaces. Falsy tokens and empty containers add no
/// unit, so they never introduce extra separators. Text is copied verbatim,
/// so whitespace inside a text token survives into the result. Feeding the
/// result back in as a single text token returns it unchanged.
pub fn resolve(tokens: &[Token]) -> String {
    let mut units: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(unit) = resolve_one(token) {
            units.push(unit);
        }
    }
    units.join(" ")
}

/// The unit one token adds to the accumulator, already space-joined.
fn resolve_one(token: &Token) -> Option<String> {
    if !token.is_truthy() {
        return None;
    }
    let unit = match token {
        Token::Text(_) | Token::Number(_) => token.label()?.into_owned(),
        Token::Sequence(items) => resolve(items),
        Token::Mapping(pairs) => truthy_labels(pairs),
        Token::Absent | Token::Bool(_) | Token::Unsupported => return None,
    };
    (!unit.is_empty()).then_some(unit)
}

fn truthy_labels(pairs: &[(String, Token)]) -> String {
    pairs
        .iter()
        .filter(|(_, flag)| flag.is_truthy())
        .map(|(label, _)| label.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Variadic front end to [`resolve`].
///
/// Each argument is converted with `Token::from`, so string slices, numbers,
/// booleans, `Option`s, vectors, arrays and JSON values can be mixed freely.
///
/// ```
/// use screen_recorder::ccc;
///
/// let active = true;
/// let disabled = false;
/// assert_eq!(
///     ccc!("btn", active.then_some("active"), disabled.then_some("disabled")),
///     "btn active"
/// );
/// ```
#[macro_export]
macro_rules! ccc {
    () => {
        ::std::string::String::new()
    };
    ($($token:expr),+ $(,)?) => {
        $crate::core::class_names::resolve(&[
            $($crate::core::token::Token::from($token)),+
        ])
    };
}

/// Build a [`Token::Mapping`] from `label => flag` pairs.
///
/// ```
/// use screen_recorder::{ccc, class_map};
///
/// assert_eq!(ccc!(class_map! { "x" => true, "y" => false }), "x");
/// ```
#[macro_export]
macro_rules! class_map {
    ($($label:expr => $flag:expr),* $(,)?) => {
        $crate::core::token::Token::Mapping(::std::vec![
            $((
                ::std::string::String::from($label),
                $crate::core::token::Token::from($flag),
            )),*
        ])
    };
}
