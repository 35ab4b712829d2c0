//! Table query descriptions and their REST encoding.
//!
//! DESIGN
//! ======
//! A query is plain data: table, projection, filters, ordering. Backends
//! either encode it as PostgREST query pairs (`to_query_pairs`) or evaluate it
//! directly against JSON rows (`Filter::matches`). Keeping both in one place
//! means the in-memory backend and the REST backend agree on semantics.

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;

use std::cmp::Ordering;

use serde_json::Value;

// =============================================================================
// FILTERS
// =============================================================================

/// A row predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column = value`, compared as text.
    Eq { column: String, value: String },
    /// `column ILIKE pattern`, where `%` matches any run of characters, `_`
    /// any single character and `\` makes the next character literal.
    ILike { column: String, pattern: String },
    /// Any of the inner filters matches.
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(column: &str, value: impl ToString) -> Self {
        Self::Eq { column: column.to_owned(), value: value.to_string() }
    }

    /// Case-insensitive substring match. Wildcards in `needle` match
    /// themselves.
    #[must_use]
    pub fn contains(column: &str, needle: &str) -> Self {
        Self::ILike { column: column.to_owned(), pattern: format!("%{}%", escape_like(needle)) }
    }

    /// Case-insensitive substring match across several columns.
    #[must_use]
    pub fn contains_any(columns: &[&str], needle: &str) -> Self {
        Self::Or(columns.iter().map(|c| Self::contains(c, needle)).collect())
    }

    /// Evaluate this filter against a JSON row.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        match self {
            Self::Eq { column, value } => row.get(column).and_then(value_as_text).is_some_and(|v| v == *value),
            Self::ILike { column, pattern } => row
                .get(column)
                .and_then(value_as_text)
                .is_some_and(|v| ilike(&v, pattern)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(row)),
        }
    }

    /// Encode as a `(key, value)` query pair.
    fn to_pair(&self) -> (String, String) {
        match self {
            Self::Or(filters) => {
                let inner: Vec<String> = filters.iter().map(Self::to_inline).collect();
                ("or".to_owned(), format!("({})", inner.join(",")))
            }
            Self::Eq { column, value } => (column.clone(), format!("eq.{value}")),
            Self::ILike { column, pattern } => (column.clone(), format!("ilike.{}", star_pattern(pattern))),
        }
    }

    /// Encode for use inside an `or=(...)` group.
    fn to_inline(&self) -> String {
        match self {
            Self::Or(filters) => {
                let inner: Vec<String> = filters.iter().map(Self::to_inline).collect();
                format!("or({})", inner.join(","))
            }
            Self::Eq { column, value } => format!("{column}.eq.{}", quote_reserved(value)),
            Self::ILike { column, pattern } => {
                format!("{column}.ilike.{}", quote_reserved(&star_pattern(pattern)))
            }
        }
    }
}

/// Render a JSON scalar as the text the backend would compare against.
fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Escape LIKE metacharacters so `text` only matches itself.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Rewrite a LIKE pattern for PostgREST, which reads `*` as `%`.
///
/// An escaped `\%` becomes `\*` and so still reaches SQL as a literal
/// percent. A literal `*` cannot be expressed and is sent as `_`.
fn star_pattern(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| match c {
            '%' => '*',
            '*' => '_',
            other => other,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    Any,
    One,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::Any,
            '_' => LikeToken::One,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// SQL `ILIKE`: `%` any run, `_` one character, `\` escapes.
fn ilike(haystack: &str, pattern: &str) -> bool {
    let text: Vec<char> = haystack.to_lowercase().chars().collect();
    let tokens = like_tokens(&pattern.to_lowercase());

    // Greedy match with a single backtrack point at the last `%`.
    let (mut t, mut p) = (0, 0);
    let mut resume: Option<(usize, usize)> = None;
    while t < text.len() {
        match tokens.get(p) {
            Some(LikeToken::Any) => {
                resume = Some((p, t));
                p += 1;
            }
            Some(LikeToken::One) => {
                t += 1;
                p += 1;
            }
            Some(LikeToken::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match resume {
                Some((star, from)) => {
                    p = star + 1;
                    t = from + 1;
                    resume = Some((star, from + 1));
                }
                None => return false,
            },
        }
    }
    tokens[p..].iter().all(|token| *token == LikeToken::Any)
}

/// Double-quote values containing characters PostgREST treats as syntax.
fn quote_reserved(value: &str) -> String {
    if value.contains([',', '.', ':', '(', ')', '"', '\\', ' ']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_owned()
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

/// A related table embedded into each result row, joined on a foreign key
/// column of the base table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub table: String,
    pub columns: Vec<String>,
    /// Column on the base table referencing the embedded table's `id`.
    pub foreign_key: String,
}

impl Embed {
    #[must_use]
    pub fn new(table: &str, columns: &[&str], foreign_key: &str) -> Self {
        Self {
            table: table.to_owned(),
            columns: columns.iter().map(|c| (*c).to_owned()).collect(),
            foreign_key: foreign_key.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub ascending: bool,
}

// =============================================================================
// SELECT
// =============================================================================

/// A read against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub table: String,
    /// Base-table columns; `*` for all.
    pub columns: String,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Option<(String, Order)>,
    pub limit: Option<usize>,
}

impl Select {
    #[must_use]
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            columns: "*".to_owned(),
            embeds: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn columns(mut self, columns: &str) -> Self {
        columns.clone_into(&mut self.columns);
        self
    }

    #[must_use]
    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(Filter::eq(column, value))
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_owned(), Order { ascending }));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The `select=` projection string, e.g. `*,profiles(full_name)`.
    #[must_use]
    pub fn projection(&self) -> String {
        let mut parts = vec![self.columns.clone()];
        parts.extend(self.embeds.iter().map(|e| format!("{}({})", e.table, e.columns.join(","))));
        parts.join(",")
    }

    /// PostgREST query pairs for this select.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_owned(), self.projection())];
        pairs.extend(self.filters.iter().map(Filter::to_pair));
        if let Some((column, order)) = &self.order {
            let dir = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_owned(), format!("{column}.{dir}")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }
        pairs
    }

    /// True when every filter matches the row.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }

    /// Compare two rows by this select's ordering.
    #[must_use]
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let Some((column, order)) = &self.order else {
            return Ordering::Equal;
        };
        compare_values(a.get(column), b.get(column), order.ascending)
    }
}

/// Nulls sort last in either direction; numbers numerically; everything else
/// as text.
fn compare_values(a: Option<&Value>, b: Option<&Value>, ascending: bool) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    let ord = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => value_as_text(x).cmp(&value_as_text(y)),
    };
    if ascending { ord } else { ord.reverse() }
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// An update of matching rows in one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub values: Value,
    pub filters: Vec<Filter>,
}

impl Update {
    #[must_use]
    pub fn table(table: &str, values: Value) -> Self {
        Self { table: table.to_owned(), values, filters: Vec::new() }
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.filters.iter().map(Filter::to_pair).collect()
    }
}

/// A delete of matching rows in one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delete {
    pub table: String,
    pub filters: Vec<Filter>,
}

impl Delete {
    #[must_use]
    pub fn from(table: &str) -> Self {
        Self { table: table.to_owned(), filters: Vec::new() }
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.filters.iter().map(Filter::to_pair).collect()
    }
}
