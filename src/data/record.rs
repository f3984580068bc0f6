// Structured records and their cached field descriptors

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use super::Variable;

/// Rename value that excludes a field from expansion.
const SKIP: &str = "-";

/// Declared field of a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    name: &'static str,
    rename: Option<&'static str>,
}

impl Field {
    pub const fn new(name: &'static str) -> Self {
        Self { name, rename: None }
    }

    /// Use `name` as the key instead of the field name. `"-"` excludes the field.
    pub const fn rename(self, name: &'static str) -> Self {
        Self {
            rename: Some(name),
            ..self
        }
    }

    /// Exclude the field from lookups and associative expansion.
    pub const fn skip(self) -> Self {
        self.rename(SKIP)
    }

    /// The key this field is visible under, if any.
    pub fn key(&self) -> Option<String> {
        match self.rename {
            Some(SKIP) => None,
            Some(rename) => Some(rename.to_string()),
            None => Some(lowercase_first(self.name)),
        }
    }
}

fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A value with named fields in a fixed declared order.
///
/// Usually implemented through the [`record!`](crate::record) macro.
pub trait Record {
    /// Declared fields. Must return the same table on every call.
    fn fields(&self) -> &'static [Field];

    /// The value of the field at `index` in [`fields`](Record::fields).
    fn field(&self, index: usize) -> Option<&dyn Variable>;
}

/// Resolved names of a record shape.
#[derive(Debug)]
pub(crate) struct StructDescriptor {
    /// One slot per declared field; `None` for excluded fields.
    field_names: Vec<Option<String>>,
    index_lookup: HashMap<String, usize>,
}

impl StructDescriptor {
    fn build(fields: &[Field]) -> Self {
        let mut field_names = Vec::with_capacity(fields.len());
        let mut index_lookup = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            let key = field.key();
            if let Some(key) = &key {
                index_lookup.insert(key.clone(), index);
            }
            field_names.push(key);
        }
        Self {
            field_names,
            index_lookup,
        }
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index_lookup.get(name).copied()
    }

    /// Visible field names with their indexes, in declared order.
    pub(crate) fn names(&self) -> impl Iterator<Item = (usize, &str)> {
        self.field_names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| Some((index, name.as_deref()?)))
    }
}

/// Field tables are `'static`, so their address identifies a record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ShapeKey {
    addr: usize,
    len: usize,
}

impl ShapeKey {
    fn of(fields: &'static [Field]) -> Self {
        Self {
            addr: fields.as_ptr() as usize,
            len: fields.len(),
        }
    }
}

type DescriptorCache = RwLock<HashMap<ShapeKey, &'static StructDescriptor>>;

fn cache() -> &'static DescriptorCache {
    static DESCRIPTORS: OnceLock<DescriptorCache> = OnceLock::new();
    DESCRIPTORS.get_or_init(Default::default)
}

/// Descriptor for a record shape, built on first use and kept for the life of
/// the process.
pub(crate) fn describe(fields: &'static [Field]) -> &'static StructDescriptor {
    let key = ShapeKey::of(fields);
    if let Some(descriptor) = cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return *descriptor;
    }

    let mut descriptors = cache().write().unwrap_or_else(PoisonError::into_inner);
    *descriptors.entry(key).or_insert_with(|| {
        tracing::trace!(fields = fields.len(), "built record descriptor");
        Box::leak(Box::new(StructDescriptor::build(fields)))
    })
}

/// Implement [`Record`] and [`Variable`] for a struct by listing its fields.
///
/// Fields are visited in the order listed. `field = "key"` overrides the key
/// and `field = "-"` excludes the field.
///
/// ```
/// use std::collections::HashMap;
///
/// struct Keys {
///     semi: String,
///     dot: String,
///     comma: String,
/// }
///
/// uritemplate::record!(Keys { semi, dot, comma });
///
/// let keys = Keys { semi: ";".into(), dot: ".".into(), comma: ",".into() };
/// let mut data = HashMap::new();
/// data.insert("keys", keys);
/// assert_eq!(
///     uritemplate::expand("{keys*}", &data).unwrap(),
///     "semi=%3B,dot=.,comma=%2C"
/// );
/// ```
///
/// Generic structs list their impl parameters in brackets first:
///
/// ```
/// use uritemplate::Variable;
///
/// struct Page<T> {
///     items: Vec<T>,
///     next: Option<u32>,
/// }
///
/// uritemplate::record!([T: Variable] Page<T> { items, next = "cursor" });
///
/// let page = Page { items: vec!["a", "b"], next: Some(2) };
/// assert_eq!(
///     uritemplate::expand("{?items*,cursor}", &page).unwrap(),
///     "?items=a&items=b&cursor=2"
/// );
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident $(<$lt:lifetime>)? { $($field:ident $(= $rename:literal)?),* $(,)? }) => {
        $crate::record!([$($lt)?] $ty $(<$lt>)? { $($field $(= $rename)?),* });
    };
    ([$($generics:tt)*] $ty:ty { $($field:ident $(= $rename:literal)?),* $(,)? }) => {
        impl<$($generics)*> $crate::Record for $ty {
            fn fields(&self) -> &'static [$crate::Field] {
                static FIELDS: &[$crate::Field] = &[
                    $($crate::record!(@field $field $(, $rename)?)),*
                ];
                FIELDS
            }

            fn field(&self, index: usize) -> ::std::option::Option<&dyn $crate::Variable> {
                let fields: &[&dyn $crate::Variable] = &[$(&self.$field),*];
                fields.get(index).copied()
            }
        }

        impl<$($generics)*> $crate::Variable for $ty {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Record(self)
            }
        }
    };
    (@field $field:ident) => {
        $crate::Field::new(stringify!($field))
    };
    (@field $field:ident, $rename:literal) => {
        $crate::Field::new(stringify!($field)).rename($rename)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    static FIELDS: &[Field] = &[
        Field::new("Semi"),
        Field::new("Dot").rename("period"),
        Field::new("secret").skip(),
        Field::new("Comma"),
    ];

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::new("Semi").key(), Some("semi".to_string()));
        assert_eq!(Field::new("already").key(), Some("already".to_string()));
        assert_eq!(Field::new("Éclair").key(), Some("éclair".to_string()));
        assert_eq!(Field::new("X").rename("Y").key(), Some("Y".to_string()));
        assert_eq!(Field::new("X").skip().key(), None);
        assert_eq!(Field::new("X").rename("-").key(), None);
    }

    #[test]
    fn test_descriptor_keeps_declared_order() {
        let descriptor = describe(FIELDS);
        let names: Vec<(usize, &str)> = descriptor.names().collect();
        assert_eq!(names, vec![(0, "semi"), (1, "period"), (3, "comma")]);
        assert_eq!(descriptor.index_of("comma"), Some(3));
        assert_eq!(descriptor.index_of("Dot"), None);
        assert_eq!(descriptor.index_of("dot"), None);
        assert_eq!(descriptor.index_of("secret"), None);
    }

    #[test]
    fn test_descriptor_is_cached() {
        let first = describe(FIELDS);
        let second = describe(FIELDS);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_descriptor_concurrent_population() {
        static SHARED: &[Field] = &[Field::new("a"), Field::new("b")];
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| describe(SHARED) as *const StructDescriptor as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
