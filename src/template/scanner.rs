// Template scanner: single left-to-right pass over the template

use super::encoding::{cut_percent_escape, is_literal, write_literal};
use super::expander::expand_expression;
use super::parser::{find_clause, ExpressionParser};
use crate::data::Variable;
use crate::error::ErrorKind;

pub struct Scanner<'t, 'd> {
    template: &'t str,
    pos: usize,
    data: &'d dyn Variable,
    output: String,
    first_error: Option<ErrorKind>,
}

impl<'t, 'd> Scanner<'t, 'd> {
    pub fn new(template: &'t str, data: &'d dyn Variable) -> Self {
        Self {
            template,
            pos: 0,
            data,
            output: String::with_capacity(template.len()),
            first_error: None,
        }
    }

    /// Scan the whole template. Always produces output, plus the first error
    /// met along the way.
    pub fn run(mut self) -> (String, Option<ErrorKind>) {
        while let Some(c) = self.peek_char() {
            match c {
                '{' => self.scan_expression(),
                '%' => self.scan_percent_escape(),
                c if is_literal(c) => {
                    write_literal(&mut self.output, c);
                    self.pos += c.len_utf8();
                }
                c => {
                    self.record(ErrorKind::IllegalCharacter(c));
                    self.pos += c.len_utf8();
                }
            }
        }
        (self.output, self.first_error)
    }

    fn scan_expression(&mut self) {
        let template = self.template;
        let rest = &template[self.pos..];
        let Some(clause) = find_clause(rest) else {
            self.output.push_str(rest);
            self.pos = template.len();
            self.record(ErrorKind::UnterminatedExpression);
            return;
        };
        self.pos += clause.len();

        let result = match ExpressionParser::parse(clause) {
            Ok(expr) => expand_expression(&mut self.output, &expr, self.data),
            Err(kind) => {
                self.output.push_str(clause);
                Err(kind)
            }
        };
        if let Err(kind) = result {
            self.record(kind);
        }
    }

    // Escapes in literal text are consumed without being copied to the output.
    fn scan_percent_escape(&mut self) {
        let template = self.template;
        let (seq, _, well_formed) = cut_percent_escape(&template[self.pos..]);
        self.pos += seq.len();
        if !well_formed {
            self.record(ErrorKind::MalformedPercentEscape(seq.to_string()));
        }
    }

    fn record(&mut self, kind: ErrorKind) {
        if self.first_error.is_some() {
            tracing::trace!(template = self.template, error = %kind, "suppressed later expansion error");
            return;
        }
        tracing::debug!(template = self.template, error = %kind, "uri template expansion error");
        self.first_error = Some(kind);
    }

    fn peek_char(&self) -> Option<char> {
        self.template[self.pos..].chars().next()
    }
}
