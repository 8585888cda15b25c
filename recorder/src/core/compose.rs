//! Left-to-right and right-to-left function composition.

/// A boxed unary function over `T`.
pub type Unary<'a, T> = Box<dyn Fn(T) -> T + 'a>;

/// Compose `fns` left to right: `pipe([f, g])(x) == g(f(x))`.
///
/// An empty list yields the identity function.
pub fn pipe<'a, T: 'a>(fns: impl IntoIterator<Item = Unary<'a, T>>) -> impl Fn(T) -> T + 'a {
    let fns: Vec<Unary<'a, T>> = fns.into_iter().collect();
    move |input| fns.iter().fold(input, |acc, f| f(acc))
}

/// Compose `fns` right to left: `compose([f, g])(x) == f(g(x))`.
///
/// An empty list yields the identity function.
pub fn compose<'a, T: 'a>(fns: impl IntoIterator<Item = Unary<'a, T>>) -> impl Fn(T) -> T + 'a {
    let fns: Vec<Unary<'a, T>> = fns.into_iter().collect();
    move |input| fns.iter().rev().fold(input, |acc, f| f(acc))
}
