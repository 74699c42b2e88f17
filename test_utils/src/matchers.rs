use std::fmt::Debug;

use prost_reflect::ReflectMessage;

use crate::create_from_text;

/// Something an assertion can check a value against, and explain itself with
/// when the check fails.
pub trait Matcher<T: ?Sized> {
    fn matches(&self, actual: &T) -> bool;

    fn describe(&self) -> String;

    fn describe_negation(&self) -> String;
}

/// Matches a message whose canonical binary encoding equals the encoding of
/// the expected text proto.
///
/// IMPORTANT: only use this for messages whose encoding is deterministic.
/// prost stores `map<,>` fields in a `HashMap`, so a message with two or more
/// map entries can encode its entries in any order and fail to match an equal
/// message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtoStringMatcher {
    expected: String,
}

impl ProtoStringMatcher {
    pub fn new<S: Into<String>>(expected: S) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn from_message<M: ReflectMessage>(expected: &M) -> Self {
        Self::new(expected.transcode_to_dynamic().to_text_format())
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn describe(&self) -> String {
        self.expected.clone()
    }

    pub fn describe_negation(&self) -> String {
        format!("not equal to expected message: {}", self.expected)
    }
}

impl<T> Matcher<T> for ProtoStringMatcher
where
    T: ReflectMessage + Default,
{
    fn matches(&self, actual: &T) -> bool {
        // Reparse so that formatting of the expected text does not matter.
        let expected = create_from_text::<T>(&self.expected);
        expected.encode_to_vec() == actual.encode_to_vec()
    }

    fn describe(&self) -> String {
        ProtoStringMatcher::describe(self)
    }

    fn describe_negation(&self) -> String {
        ProtoStringMatcher::describe_negation(self)
    }
}

pub fn equals_proto<S: Into<String>>(expected: S) -> ProtoStringMatcher {
    ProtoStringMatcher::new(expected)
}

pub fn equals_proto_message<M: ReflectMessage>(expected: &M) -> ProtoStringMatcher {
    ProtoStringMatcher::from_message(expected)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Not<M>(M);

pub fn not<M>(matcher: M) -> Not<M> {
    Not(matcher)
}

impl<T: ?Sized, M: Matcher<T>> Matcher<T> for Not<M> {
    fn matches(&self, actual: &T) -> bool {
        !self.0.matches(actual)
    }

    fn describe(&self) -> String {
        self.0.describe_negation()
    }

    fn describe_negation(&self) -> String {
        self.0.describe()
    }
}

/// Failure message for `actual` against `matcher`, or `None` when it matches.
#[doc(hidden)]
pub fn explain_mismatch<T, M>(actual: &T, matcher: &M, expression: &str) -> Option<String>
where
    T: Debug + ?Sized,
    M: Matcher<T>,
{
    if matcher.matches(actual) {
        return None;
    }
    Some(format!(
        "Value of: {expression}\nExpected: {}\n  Actual: {actual:?}",
        matcher.describe()
    ))
}

/// Panics with the matcher's description when `actual` does not match.
///
/// ```ignore
/// assert_that!(spec, equals_proto(r#"name: "resnet" version: 3"#));
/// assert_that!(spec, not(equals_proto_message(&other)));
/// ```
#[macro_export]
macro_rules! assert_that {
    ($actual:expr, $matcher:expr $(,)?) => {{
        if let Some(message) =
            $crate::matchers::explain_mismatch(&$actual, &$matcher, stringify!($actual))
        {
            panic!("{}", message);
        }
    }};
}
