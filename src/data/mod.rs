// Data adapter: how caller values are seen by the expander
//
// Callers describe their data through `Variable`. The adapter looks names up
// in a root value and classifies what it finds as a scalar, a list or an
// associative array.

mod impls;
mod json;
mod record;

use std::borrow::Cow;

pub use impls::Rendered;
pub use record::{Field, Record};
pub(crate) use record::describe;

/// A value that can be substituted into a URI template.
///
/// The adapter checks the three capabilities in order, once per value:
/// [`encode_text`](Variable::encode_text), then [`render`](Variable::render),
/// then [`shape`](Variable::shape). A value answering either of the first two
/// is always a scalar, whatever its shape.
pub trait Variable {
    /// Custom text encoding. Takes priority over everything else and may fail.
    fn encode_text(&self) -> Option<anyhow::Result<String>> {
        None
    }

    /// Human-readable rendering.
    fn render(&self) -> Option<String> {
        None
    }

    /// Structural view of the value.
    fn shape(&self) -> Shape<'_>;
}

/// Structural classification of a [`Variable`].
pub enum Shape<'a> {
    /// Missing, `None` or null. The variable is skipped.
    Undefined,
    Scalar(Cow<'a, str>),
    List(Vec<&'a dyn Variable>),
    /// Key/value mapping, visited in ascending key order.
    Map(&'a dyn Associative),
    /// Structured record, visited in declared field order.
    Record(&'a dyn Record),
}

/// A key/value mapping with string keys.
pub trait Associative {
    fn get(&self, key: &str) -> Option<&dyn Variable>;

    /// All entries, in any order.
    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Variable)>;
}

/// Text of a scalar or of a list member. Custom encoding failures are kept
/// in place so the expander can stop exactly where they occur.
pub(crate) type Text<'a> = anyhow::Result<Cow<'a, str>>;

/// A variable after lookup and classification.
#[derive(Debug)]
pub(crate) enum Value<'a> {
    Scalar(Text<'a>),
    /// Defined members only.
    List(Vec<Text<'a>>),
    /// Defined pairs only, in visiting order.
    Associative(Vec<(Cow<'a, str>, Text<'a>)>),
}

#[cfg(test)]
impl Value<'_> {
    /// A failed scalar counts as empty.
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(Ok(s)) => s.is_empty(),
            Value::Scalar(Err(_)) => true,
            Value::List(items) => items.is_empty(),
            Value::Associative(pairs) => pairs.is_empty(),
        }
    }
}

/// Find `name` in the root `data`.
pub(crate) fn lookup<'a>(data: &'a dyn Variable, name: &str) -> Option<&'a dyn Variable> {
    match data.shape() {
        Shape::Map(map) => map.get(name),
        Shape::Record(record) => {
            let index = describe(record.fields()).index_of(name)?;
            record.field(index)
        }
        Shape::Undefined | Shape::Scalar(_) | Shape::List(_) => None,
    }
}

/// Classify a looked-up variable. `None` means undefined.
///
/// Classification never fails. Encoding errors surface in the [`Text`] of the
/// scalar or member that produced them.
pub(crate) fn resolve(variable: Option<&dyn Variable>) -> Option<Value<'_>> {
    let variable = variable?;
    if let Some(text) = variable.encode_text() {
        return Some(Value::Scalar(text.map(Cow::Owned)));
    }
    if let Some(text) = variable.render() {
        return Some(Value::Scalar(Ok(Cow::Owned(text))));
    }

    let value = match variable.shape() {
        Shape::Undefined => return None,
        Shape::Scalar(s) => Value::Scalar(Ok(s)),
        Shape::List(items) => Value::List(items.into_iter().filter_map(coerce).collect()),
        Shape::Map(map) => Value::Associative(defined_pairs(sorted_entries(map))),
        Shape::Record(record) => Value::Associative(defined_pairs(record_entries(record))),
    };
    Some(value)
}

/// Render a list member or pair value as text. `None` means undefined.
///
/// Nested composites flatten to their members joined with `,`.
fn coerce(variable: &dyn Variable) -> Option<Text<'_>> {
    Some(match resolve(Some(variable))? {
        Value::Scalar(text) => text,
        Value::List(items) => join(items.into_iter()),
        Value::Associative(pairs) => join(pairs.into_iter().flat_map(|(k, v)| [Ok(k), v])),
    })
}

fn join<'a>(parts: impl Iterator<Item = Text<'a>>) -> Text<'a> {
    let parts = parts.collect::<anyhow::Result<Vec<_>>>()?;
    Ok(Cow::Owned(parts.join(",")))
}

fn sorted_entries(map: &dyn Associative) -> Vec<(Cow<'_, str>, &dyn Variable)> {
    let mut entries = map.entries();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
}

fn record_entries(record: &dyn Record) -> Vec<(Cow<'_, str>, &dyn Variable)> {
    let descriptor = describe(record.fields());
    descriptor
        .names()
        .filter_map(|(index, name)| Some((Cow::Borrowed(name), record.field(index)?)))
        .collect()
}

fn defined_pairs<'a>(
    entries: Vec<(Cow<'a, str>, &'a dyn Variable)>,
) -> Vec<(Cow<'a, str>, Text<'a>)> {
    entries
        .into_iter()
        .filter_map(|(key, variable)| Some((key, coerce(variable)?)))
        .collect()
}

#[cfg(test)]
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        fn text_eq(a: &Text<'_>, b: &Text<'_>) -> bool {
            match (a, b) {
                (Ok(a), Ok(b)) => a == b,
                (Err(a), Err(b)) => a.to_string() == b.to_string(),
                _ => false,
            }
        }
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => text_eq(a, b),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(a, b)| text_eq(a, b))
            }
            (Value::Associative(a), Value::Associative(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && text_eq(va, vb))
            }
            _ => false,
        }
    }
}
