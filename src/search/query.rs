use crate::search::filter::SearchFilters;
use std::fmt;

/// Scalar compared by a clause
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Text(s) => f.write_str(s),
        }
    }
}

/// One condition delegated to the hosted query API
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Eq { column: &'static str, value: Literal },
    Gte { column: &'static str, value: i64 },
    Lte { column: &'static str, value: i64 },
    /// Case-insensitive pattern; `%` is the wildcard, `\` escapes
    ILike { column: &'static str, pattern: String },
    In { column: &'static str, values: Vec<Literal> },
}

impl Clause {
    pub fn column(&self) -> &'static str {
        match self {
            Clause::Eq { column, .. }
            | Clause::Gte { column, .. }
            | Clause::Lte { column, .. }
            | Clause::ILike { column, .. }
            | Clause::In { column, .. } => column,
        }
    }
}

/// Translate filters into remote clauses, one per constrained field
///
/// Amenities stay local: the hosted API has no containment operator.
pub fn to_remote_query(filters: &SearchFilters) -> Vec<Clause> {
    let mut clauses = Vec::new();

    if !filters.city.is_empty() {
        clauses.push(Clause::ILike {
            column: "city",
            pattern: format!("%{}%", escape_like(&filters.city)),
        });
    }

    if filters.min_price > 0 {
        clauses.push(Clause::Gte {
            column: "price",
            value: filters.min_price,
        });
    }

    if filters.max_price < i64::MAX {
        clauses.push(Clause::Lte {
            column: "price",
            value: filters.max_price,
        });
    }

    if !filters.bedrooms.is_empty() {
        clauses.push(Clause::In {
            column: "bedrooms",
            values: filters
                .bedrooms
                .iter()
                .map(|b| Literal::Int(i64::from(*b)))
                .collect(),
        });
    }

    if !filters.property_types.is_empty() {
        clauses.push(Clause::In {
            column: "property_type",
            values: filters
                .property_types
                .iter()
                .map(|t| Literal::Text(t.as_str().to_string()))
                .collect(),
        });
    }

    if filters.max_distance < u32::MAX {
        clauses.push(Clause::Lte {
            column: "walking_time",
            value: i64::from(filters.max_distance),
        });
    }

    let flags = [
        ("furnished", filters.furnished),
        ("parking", filters.parking),
        ("verified", filters.verified),
    ];
    for (column, flag) in flags {
        if let Some(value) = flag {
            clauses.push(Clause::Eq {
                column,
                value: Literal::Bool(value),
            });
        }
    }

    clauses
}

/// Escape LIKE metacharacters so the pattern is a literal substring
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Sort direction on `created_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    NewestFirst,
}

/// Full property fetch: base scope, filter clauses and ordering
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    pub clauses: Vec<Clause>,
    pub order: Option<Order>,
}

impl PropertyQuery {
    /// Available listings matching the filters, newest first
    pub fn from_filters(filters: &SearchFilters) -> Self {
        let mut clauses = vec![Clause::Eq {
            column: "available",
            value: Literal::Bool(true),
        }];
        clauses.extend(to_remote_query(filters));

        Self {
            clauses,
            order: Some(Order::NewestFirst),
        }
    }

    /// Specific rows regardless of availability
    pub fn by_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            clauses: vec![Clause::In {
                column: "id",
                values: ids.into_iter().map(|id| Literal::Text(id.into())).collect(),
            }],
            order: Some(Order::NewestFirst),
        }
    }
}
