// Syntax types for URI template expressions

use std::fmt;

/// Expression operator, selected by the first character after `{`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// No operator: `{var}`
    Simple,
    /// `{+var}`
    Reserved,
    /// `{#var}`
    Fragment,
    /// `{.var}`
    Label,
    /// `{/var}`
    Path,
    /// `{;var}`
    PathParam,
    /// `{?var}`
    Query,
    /// `{&var}`
    QueryContinuation,
}

/// Operator characters RFC 6570 sets aside for future extensions.
pub const RESERVED_OPERATORS: &str = "=,!@|";

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Reserved),
            '#' => Some(Operator::Fragment),
            '.' => Some(Operator::Label),
            '/' => Some(Operator::Path),
            ';' => Some(Operator::PathParam),
            '?' => Some(Operator::Query),
            '&' => Some(Operator::QueryContinuation),
            _ => None,
        }
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Operator::Simple => None,
            Operator::Reserved => Some('+'),
            Operator::Fragment => Some('#'),
            Operator::Label => Some('.'),
            Operator::Path => Some('/'),
            Operator::PathParam => Some(';'),
            Operator::Query => Some('?'),
            Operator::QueryContinuation => Some('&'),
        }
    }

    /// Written once before the first variable that produces output.
    pub fn lead(self) -> Option<char> {
        match self {
            Operator::Simple | Operator::Reserved => None,
            other => other.as_char(),
        }
    }

    /// Written between units of output.
    pub fn separator(self) -> char {
        match self {
            Operator::Simple | Operator::Reserved | Operator::Fragment => ',',
            Operator::Label => '.',
            Operator::Path => '/',
            Operator::PathParam => ';',
            Operator::Query | Operator::QueryContinuation => '&',
        }
    }

    /// Named operators prefix each unit with `name=`.
    pub fn is_named(self) -> bool {
        matches!(
            self,
            Operator::PathParam | Operator::Query | Operator::QueryContinuation
        )
    }

    /// Whether reserved characters in values are left unescaped.
    pub fn allows_reserved(self) -> bool {
        matches!(self, Operator::Reserved | Operator::Fragment)
    }

    /// Whether `=` is written after the name of an empty value.
    pub fn names_empty_with_equals(self) -> bool {
        !matches!(self, Operator::PathParam)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_char() {
            Some(c) => write!(f, "{}", c),
            None => Ok(()),
        }
    }
}

/// Value modifier of a variable specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modifier {
    #[default]
    None,
    /// `var*`
    Explode,
    /// `var:N`, keep the first N code points
    Prefix(u16),
}

/// A single variable reference inside an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec<'t> {
    pub name: &'t str,
    pub modifier: Modifier,
    /// Byte offset in the expression body just past this specification.
    pub end: usize,
}

impl VarSpec<'_> {
    pub fn is_exploded(&self) -> bool {
        self.modifier == Modifier::Explode
    }
}

/// Grammar failure after at least one variable was parsed.
///
/// The variables before the failure still expand; the body from `resume`
/// onwards is echoed back into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stop {
    MissingVariableName { resume: usize },
    UnexpectedCharacter { resume: usize, character: char },
}

impl Stop {
    pub fn resume(&self) -> usize {
        match self {
            Stop::MissingVariableName { resume } | Stop::UnexpectedCharacter { resume, .. } => {
                *resume
            }
        }
    }
}

/// A parsed `{...}` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression<'t> {
    /// The whole clause, braces included.
    pub source: &'t str,
    /// The clause without braces or operator.
    pub body: &'t str,
    pub operator: Operator,
    pub var_specs: Vec<VarSpec<'t>>,
    pub stop: Option<Stop>,
}

impl<'t> Expression<'t> {
    /// Unparsed body text from `offset` on.
    pub fn remainder(&self, offset: usize) -> &'t str {
        &self.body[offset..]
    }
}
