// Variable implementations for standard library types

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use super::{Associative, Shape, Variable};

/// Expands a value through its [`Display`](fmt::Display) implementation.
///
/// Rendering takes priority over the value's shape, so a wrapped collection
/// becomes a single scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered<T>(pub T);

impl<T: fmt::Display> Variable for Rendered<T> {
    fn render(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Cow::Owned(self.0.to_string()))
    }
}

impl Variable for () {
    fn shape(&self) -> Shape<'_> {
        Shape::Undefined
    }
}

impl Variable for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Cow::Borrowed(self))
    }
}

impl Variable for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Cow::Borrowed(self.as_str()))
    }
}

impl Variable for Cow<'_, str> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Cow::Borrowed(&**self))
    }
}

macro_rules! impl_scalar_via_to_string {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Variable for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

impl_scalar_via_to_string!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

// Indirection is transparent: every capability is forwarded to the target.
macro_rules! impl_forwarding {
    ($($ptr:ident),*) => {
        $(
            impl<T: Variable + ?Sized> Variable for $ptr<T> {
                fn encode_text(&self) -> Option<anyhow::Result<String>> {
                    (**self).encode_text()
                }

                fn render(&self) -> Option<String> {
                    (**self).render()
                }

                fn shape(&self) -> Shape<'_> {
                    (**self).shape()
                }
            }
        )*
    };
}

impl_forwarding!(Box, Rc, Arc);

impl<T: Variable + ?Sized> Variable for &T {
    fn encode_text(&self) -> Option<anyhow::Result<String>> {
        (**self).encode_text()
    }

    fn render(&self) -> Option<String> {
        (**self).render()
    }

    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }
}

impl<T: Variable> Variable for Option<T> {
    fn encode_text(&self) -> Option<anyhow::Result<String>> {
        self.as_ref()?.encode_text()
    }

    fn render(&self) -> Option<String> {
        self.as_ref()?.render()
    }

    fn shape(&self) -> Shape<'_> {
        match self {
            Some(inner) => inner.shape(),
            None => Shape::Undefined,
        }
    }
}

fn list_of<'a, T: Variable + 'a>(items: impl Iterator<Item = &'a T>) -> Shape<'a> {
    Shape::List(items.map(|item| item as &dyn Variable).collect())
}

impl<T: Variable> Variable for [T] {
    fn shape(&self) -> Shape<'_> {
        list_of(self.iter())
    }
}

impl<T: Variable, const N: usize> Variable for [T; N] {
    fn shape(&self) -> Shape<'_> {
        list_of(self.iter())
    }
}

impl<T: Variable> Variable for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        list_of(self.iter())
    }
}

impl<T: Variable> Variable for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        list_of(self.iter())
    }
}

impl<K, V, S> Associative for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Variable,
    S: BuildHasher,
{
    fn get(&self, key: &str) -> Option<&dyn Variable> {
        HashMap::get(self, key).map(|v| v as &dyn Variable)
    }

    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Variable)> {
        self.iter()
            .map(|(k, v)| (Cow::Borrowed(k.borrow()), v as &dyn Variable))
            .collect()
    }
}

impl<K, V, S> Variable for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Variable,
    S: BuildHasher,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }
}

impl<K, V> Associative for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Variable,
{
    fn get(&self, key: &str) -> Option<&dyn Variable> {
        BTreeMap::get(self, key).map(|v| v as &dyn Variable)
    }

    fn entries(&self) -> Vec<(Cow<'_, str>, &dyn Variable)> {
        self.iter()
            .map(|(k, v)| (Cow::Borrowed(k.borrow()), v as &dyn Variable))
            .collect()
    }
}

impl<K, V> Variable for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Variable,
{
    fn shape(&self) -> Shape<'_> {
        Shape::Map(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(v: &dyn Variable) -> Option<String> {
        match v.shape() {
            Shape::Scalar(s) => Some(s.into_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_scalars_use_default_text() {
        assert_eq!(scalar(&100), Some("100".to_string()));
        assert_eq!(scalar(&true), Some("true".to_string()));
        assert_eq!(scalar(&1.5), Some("1.5".to_string()));
        assert_eq!(scalar(&'x'), Some("x".to_string()));
        assert_eq!(scalar(&String::from("s")), Some("s".to_string()));
    }

    #[test]
    fn test_option_and_pointers_forward() {
        assert!(matches!(None::<&str>.shape(), Shape::Undefined));
        assert_eq!(scalar(&Some("x")), Some("x".to_string()));
        assert_eq!(scalar(&Box::new(7u8)), Some("7".to_string()));
        assert_eq!(scalar(&Arc::new("a")), Some("a".to_string()));
        assert_eq!(scalar(&Rc::new(Some(Box::new("deep")))), Some("deep".to_string()));
        assert!(matches!(Some(None::<String>).shape(), Shape::Undefined));
    }

    #[test]
    fn test_rendered_wins_over_shape() {
        let wrapped = Rendered(42);
        assert_eq!(wrapped.render(), Some("42".to_string()));
        assert_eq!(Some(Rendered("x")).render(), Some("x".to_string()));
    }

    #[test]
    fn test_collections_are_composite() {
        assert!(matches!(vec!["a"].shape(), Shape::List(items) if items.len() == 1));
        assert!(matches!(["a", "b"].shape(), Shape::List(items) if items.len() == 2));
        let mut map = BTreeMap::new();
        map.insert("k".to_string(), 1);
        assert!(matches!(map.shape(), Shape::Map(_)));
        assert!(Associative::get(&map, "k").is_some());
        assert!(Associative::get(&map, "missing").is_none());
    }
}
