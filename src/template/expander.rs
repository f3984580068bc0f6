// Variable expansion: formats resolved values per operator rules

use super::ast::{Expression, Modifier, Operator, Stop, VarSpec};
use super::encoding;
use crate::data::{lookup, resolve, Value, Variable};
use crate::error::ErrorKind;

/// Expand every variable of `expr` into `out`.
///
/// On failure everything written so far is kept, including the part of the
/// failing variable before the bad value, and the unparsed rest of the
/// expression is echoed back.
pub fn expand_expression(
    out: &mut String,
    expr: &Expression<'_>,
    data: &dyn Variable,
) -> Result<(), ErrorKind> {
    let mut expander = Expander::new(out, expr.operator);
    let mut first = true;

    for spec in &expr.var_specs {
        let value = resolve(lookup(data, spec.name));
        first = match expander.expand_variable(first, value, spec) {
            Ok(first) => first,
            Err(source) => {
                expander.echo_remainder(expr.remainder(spec.end));
                return Err(ErrorKind::Render {
                    expression: expr.source.to_string(),
                    variable: spec.name.to_string(),
                    source,
                });
            }
        };
    }

    match &expr.stop {
        None => Ok(()),
        Some(stop) => {
            expander.echo_remainder(expr.remainder(stop.resume()));
            let expression = expr.source.to_string();
            Err(match *stop {
                Stop::MissingVariableName { .. } => ErrorKind::MissingVariableName { expression },
                Stop::UnexpectedCharacter { character, .. } => ErrorKind::UnexpectedCharacter {
                    expression,
                    character,
                },
            })
        }
    }
}

pub struct Expander<'o> {
    out: &'o mut String,
    operator: Operator,
}

impl<'o> Expander<'o> {
    pub fn new(out: &'o mut String, operator: Operator) -> Self {
        Self { out, operator }
    }

    /// Append one variable. Returns whether the next defined variable is
    /// still the first of the expression.
    ///
    /// Output is written as values are visited. A value that fails to encode
    /// stops the variable there and the error is returned.
    pub fn expand_variable(
        &mut self,
        first: bool,
        value: Option<Value<'_>>,
        spec: &VarSpec<'_>,
    ) -> anyhow::Result<bool> {
        let Some(value) = value else {
            return Ok(first);
        };

        if first {
            if let Some(lead) = self.operator.lead() {
                self.out.push(lead);
            }
        } else {
            self.out.push(self.operator.separator());
        }

        match (value, spec.is_exploded()) {
            (Value::Scalar(text), _) => {
                let text = match text {
                    Ok(text) => text,
                    Err(err) => {
                        self.write_name(spec.name, true);
                        return Err(err);
                    }
                };
                self.write_name(spec.name, text.is_empty());
                let text: &str = &text;
                let text = match spec.modifier {
                    Modifier::Prefix(n) => encoding::prefix(text, usize::from(n)),
                    Modifier::None | Modifier::Explode => text,
                };
                self.write_value(text);
            }
            (Value::List(items), false) => {
                self.write_name(spec.name, items.is_empty());
                for (i, item) in items.into_iter().enumerate() {
                    let item = item?;
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_value(&item);
                }
            }
            (Value::Associative(pairs), false) => {
                self.write_name(spec.name, pairs.is_empty());
                for (i, (key, item)) in pairs.into_iter().enumerate() {
                    let item = item?;
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_value(&key);
                    self.out.push(',');
                    self.write_value(&item);
                }
            }
            (Value::List(items), true) => {
                for (i, item) in items.into_iter().enumerate() {
                    let item = item?;
                    if i > 0 {
                        self.out.push(self.operator.separator());
                    }
                    self.write_name(spec.name, item.is_empty());
                    self.write_value(&item);
                }
            }
            (Value::Associative(pairs), true) => {
                for (i, (key, item)) in pairs.into_iter().enumerate() {
                    let item = item?;
                    if i > 0 {
                        self.out.push(self.operator.separator());
                    }
                    if self.operator.is_named() {
                        self.write_name(&key, item.is_empty());
                    } else {
                        self.write_value(&key);
                        self.out.push('=');
                    }
                    self.write_value(&item);
                }
            }
        }

        Ok(false)
    }

    /// Re-emit unparsed expression text as `{op...}`.
    pub fn echo_remainder(&mut self, rest: &str) {
        if rest.is_empty() {
            return;
        }
        self.out.push('{');
        if let Some(op) = self.operator.as_char() {
            self.out.push(op);
        }
        self.out.push_str(rest);
        self.out.push('}');
    }

    fn write_name(&mut self, name: &str, empty: bool) {
        if !self.operator.is_named() {
            return;
        }
        encoding::write_name(self.out, name);
        if !empty || self.operator.names_empty_with_equals() {
            self.out.push('=');
        }
    }

    fn write_value(&mut self, value: &str) {
        encoding::write_value(self.out, value, self.operator.allows_reserved());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn spec(name: &str, modifier: Modifier) -> VarSpec<'_> {
        VarSpec {
            name,
            modifier,
            end: 0,
        }
    }

    fn expand_one(op: Operator, value: Value<'_>, modifier: Modifier) -> String {
        let mut out = String::new();
        Expander::new(&mut out, op)
            .expand_variable(true, Some(value), &spec("v", modifier))
            .unwrap();
        out
    }

    fn expand_failing(op: Operator, value: Value<'_>, modifier: Modifier) -> String {
        let mut out = String::new();
        let result = Expander::new(&mut out, op).expand_variable(false, Some(value), &spec("v", modifier));
        assert_eq!(result.unwrap_err().to_string(), "bad value");
        out
    }

    fn list(items: &[&'static str]) -> Value<'static> {
        Value::List(items.iter().map(|s| Ok(Cow::Borrowed(*s))).collect())
    }

    fn scalar(s: &'static str) -> Value<'static> {
        Value::Scalar(Ok(Cow::Borrowed(s)))
    }

    fn bad() -> anyhow::Result<Cow<'static, str>> {
        Err(anyhow::anyhow!("bad value"))
    }

    #[test]
    fn test_undefined_keeps_first_flag() {
        let mut out = String::new();
        let mut expander = Expander::new(&mut out, Operator::Query);
        assert!(expander.expand_variable(true, None, &spec("x", Modifier::None)).unwrap());
        assert!(!expander.expand_variable(false, None, &spec("x", Modifier::None)).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_scalar_punctuation_per_operator() {
        let cases = [
            (Operator::Simple, "val"),
            (Operator::Reserved, "val"),
            (Operator::Fragment, "#val"),
            (Operator::Label, ".val"),
            (Operator::Path, "/val"),
            (Operator::PathParam, ";v=val"),
            (Operator::Query, "?v=val"),
            (Operator::QueryContinuation, "&v=val"),
        ];
        for (op, want) in cases {
            assert_eq!(expand_one(op, scalar("val"), Modifier::None), want, "operator {:?}", op);
        }
    }

    #[test]
    fn test_empty_scalar_naming() {
        assert_eq!(expand_one(Operator::PathParam, scalar(""), Modifier::None), ";v");
        assert_eq!(expand_one(Operator::Query, scalar(""), Modifier::None), "?v=");
        assert_eq!(expand_one(Operator::QueryContinuation, scalar(""), Modifier::None), "&v=");
    }

    #[test]
    fn test_prefix_applies_to_scalars_only() {
        assert_eq!(expand_one(Operator::Simple, scalar("value"), Modifier::Prefix(3)), "val");
        let value = list(&["red", "green"]);
        assert_eq!(expand_one(Operator::Simple, value, Modifier::Prefix(1)), "red,green");
    }

    #[test]
    fn test_exploded_list_units() {
        assert_eq!(expand_one(Operator::Path, list(&["a", "b"]), Modifier::Explode), "/a/b");
        assert_eq!(expand_one(Operator::Query, list(&["a", "b"]), Modifier::Explode), "?v=a&v=b");
        assert_eq!(expand_one(Operator::PathParam, list(&["a", "b"]), Modifier::Explode), ";v=a;v=b");
        assert_eq!(expand_one(Operator::Simple, list(&["a", "b"]), Modifier::Explode), "a,b");
    }

    #[test]
    fn test_associative_units() {
        let pairs = || Value::Associative(vec![("k".into(), Ok("x y".into())), ("e".into(), Ok("".into()))]);
        assert_eq!(expand_one(Operator::Simple, pairs(), Modifier::None), "k,x%20y,e,");
        assert_eq!(expand_one(Operator::Simple, pairs(), Modifier::Explode), "k=x%20y,e=");
        assert_eq!(expand_one(Operator::PathParam, pairs(), Modifier::Explode), ";k=x%20y;e");
        assert_eq!(expand_one(Operator::Query, pairs(), Modifier::Explode), "?k=x%20y&e=");
    }

    #[test]
    fn test_failing_scalar_keeps_separator_and_name() {
        assert_eq!(expand_failing(Operator::Simple, Value::Scalar(bad()), Modifier::None), ",");
        assert_eq!(expand_failing(Operator::Query, Value::Scalar(bad()), Modifier::None), "&v=");
        assert_eq!(expand_failing(Operator::PathParam, Value::Scalar(bad()), Modifier::None), ";v");
    }

    #[test]
    fn test_failing_member_keeps_earlier_members() {
        let members = || Value::List(vec![Ok("ok".into()), bad(), Ok("never".into())]);
        assert_eq!(expand_failing(Operator::Simple, members(), Modifier::None), ",ok");
        assert_eq!(expand_failing(Operator::Query, members(), Modifier::None), "&v=ok");
        assert_eq!(expand_failing(Operator::Path, members(), Modifier::Explode), "/ok");

        let pairs = || Value::Associative(vec![("a".into(), Ok("1".into())), ("b".into(), bad())]);
        assert_eq!(expand_failing(Operator::Simple, pairs(), Modifier::None), ",a,1");
        assert_eq!(expand_failing(Operator::Query, pairs(), Modifier::Explode), "&a=1");
    }

    #[test]
    fn test_echo_remainder() {
        let mut out = String::new();
        let mut expander = Expander::new(&mut out, Operator::Query);
        expander.echo_remainder("");
        expander.echo_remainder(",b");
        assert_eq!(out, "{?,b}");
    }
}
