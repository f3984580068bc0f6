// URI template expansion (RFC 6570, level 4)
//
// The scanner walks the template once. Each `{...}` clause goes through the
// parser and then the expander, which writes straight into the output buffer.

mod ast;
mod encoding;
mod expander;
mod parser;
mod scanner;

use std::fmt;
use std::str::FromStr;

use crate::data::Variable;
use crate::error::ExpandError;
use parser::{find_clause, ExpressionParser};
use scanner::Scanner;

/// Expand `template` against `data`.
///
/// On error the returned [`ExpandError`] still carries the best-effort
/// expansion through [`ExpandError::output`].
pub fn expand<D: Variable + ?Sized>(template: &str, data: &D) -> Result<String, ExpandError> {
    let data: &dyn Variable = &data;
    match Scanner::new(template, data).run() {
        (output, None) => Ok(output),
        (output, Some(kind)) => Err(ExpandError::new(template, kind, output)),
    }
}

/// An owned URI template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UriTemplate {
    template: String,
}

impl UriTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    pub fn expand<D: Variable + ?Sized>(&self, data: &D) -> Result<String, ExpandError> {
        expand(&self.template, data)
    }

    /// Distinct variable names in order of first appearance.
    ///
    /// Clauses that cannot be parsed contribute nothing; a clause that stops
    /// part way contributes the names before the failure.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            let Some(clause) = find_clause(&rest[start..]) else {
                break;
            };
            if let Ok(expr) = ExpressionParser::parse(clause) {
                for spec in &expr.var_specs {
                    if !names.contains(&spec.name) {
                        names.push(spec.name);
                    }
                }
            }
            rest = &rest[start + clause.len()..];
        }
        names
    }
}

impl FromStr for UriTemplate {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for UriTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
