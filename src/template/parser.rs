// Expression parser for `{...}` clauses

use super::ast::{Expression, Modifier, Operator, Stop, VarSpec, RESERVED_OPERATORS};
use super::encoding::{cut_percent_escape, is_var_char};
use crate::error::ErrorKind;

/// Longest digit run accepted by the prefix modifier.
const MAX_PREFIX_DIGITS: usize = 4;

/// Return the clause from the leading `{` through the first `}`.
pub fn find_clause(input: &str) -> Option<&str> {
    input.find('}').map(|end| &input[..=end])
}

pub struct ExpressionParser<'t> {
    body: &'t str,
    pos: usize,
}

impl<'t> ExpressionParser<'t> {
    /// Parse a complete clause such as `{?x,y*}`.
    ///
    /// An `Err` means nothing in the clause can be expanded and the caller
    /// echoes it verbatim. Failures after the first variable are reported
    /// through [`Expression::stop`] instead.
    pub fn parse(source: &'t str) -> Result<Expression<'t>, ErrorKind> {
        let inner = source
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(source);

        let mut operator = Operator::Simple;
        let mut reserved = None;
        let mut body = inner;
        if let Some(c) = inner.chars().next() {
            if let Some(op) = Operator::from_char(c) {
                operator = op;
                body = &inner[1..];
            } else if RESERVED_OPERATORS.contains(c) {
                reserved = Some(c);
                body = &inner[1..];
            }
        }

        if body.is_empty() {
            return Err(ErrorKind::EmptyExpression);
        }
        if let Some(operator) = reserved {
            return Err(ErrorKind::ReservedOperator {
                expression: source.to_string(),
                operator,
            });
        }

        let mut parser = Self { body, pos: 0 };
        let first = parser
            .parse_var_spec()
            .ok_or_else(|| ErrorKind::MissingVariableName {
                expression: source.to_string(),
            })?;

        let mut var_specs = vec![first];
        let mut stop = None;
        while let Some(c) = parser.peek_char() {
            if c != ',' {
                stop = Some(Stop::UnexpectedCharacter {
                    resume: parser.pos,
                    character: c,
                });
                break;
            }
            parser.pos += 1;
            match parser.parse_var_spec() {
                Some(spec) => var_specs.push(spec),
                None => {
                    stop = Some(Stop::MissingVariableName { resume: parser.pos });
                    break;
                }
            }
        }

        Ok(Expression {
            source,
            body,
            operator,
            var_specs,
            stop,
        })
    }

    fn parse_var_spec(&mut self) -> Option<VarSpec<'t>> {
        let start = self.pos;
        if !self.eat_var_char() {
            return None;
        }

        loop {
            if self.peek_char() == Some('.') {
                let dot = self.pos;
                self.pos += 1;
                if !self.eat_var_char() {
                    // A dot must be followed by a name character.
                    self.pos = dot;
                    break;
                }
                continue;
            }
            if !self.eat_var_char() {
                break;
            }
        }

        let name = &self.body[start..self.pos];
        let modifier = self.parse_modifier();
        Some(VarSpec {
            name,
            modifier,
            end: self.pos,
        })
    }

    fn eat_var_char(&mut self) -> bool {
        let rest = &self.body[self.pos..];
        match rest.chars().next() {
            Some('%') => {
                let (seq, _, well_formed) = cut_percent_escape(rest);
                if well_formed {
                    self.pos += seq.len();
                }
                well_formed
            }
            Some(c) if is_var_char(c) => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn parse_modifier(&mut self) -> Modifier {
        let rest = &self.body[self.pos..];
        match rest.chars().next() {
            Some('*') => {
                self.pos += 1;
                Modifier::Explode
            }
            Some(':') => {
                let digits_len = rest[1..]
                    .bytes()
                    .take(MAX_PREFIX_DIGITS)
                    .take_while(u8::is_ascii_digit)
                    .count();
                let digits = &rest[1..1 + digits_len];
                if digits.is_empty() || digits.starts_with('0') {
                    return Modifier::None;
                }
                match digits.parse() {
                    Ok(n) => {
                        self.pos += 1 + digits_len;
                        Modifier::Prefix(n)
                    }
                    Err(_) => Modifier::None,
                }
            }
            _ => Modifier::None,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.body[self.pos..].chars().next()
    }
}
