// serde_json values as template data

use std::borrow::Cow;

use serde_json::{Map, Value};

use super::{Associative, Shape, Variable};

impl Variable for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Undefined,
            Value::Bool(b) => Shape::Scalar(Cow::Owned(b.to_string())),
            Value::Number(n) => Shape::Scalar(Cow::Owned(n.to_string())),
            Value::String(s) => Shape::Scalar(Cow::Borrowed(s.as_str())),
            Value::Array(items) => Shape::List(items.iter().map(|v| v as &dyn Variable).collect()),
            Value::Object(map) => Shape::Map(map),
        }
    }
}

impl Associative for Map<String, Value> {
    fn get(&self, key: &str) -> Option<&dyn Variable> {
        Map::get(self, key).map(|v| v as &dyn Variable)
    }

    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Variable)> {
        self.iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), v as &dyn Variable))
            .collect()
    }
}

impl Variable for Map<String, Value> {
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }
}
