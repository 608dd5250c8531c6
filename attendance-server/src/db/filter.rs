//! Dynamic WHERE clause builder
//!
//! Conditions are written with `?` placeholders and renumbered to Postgres
//! `$n` when the clause is rendered, so filters can be appended in any order.

use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::{QueryAs, QueryScalar};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Uuid(Uuid),
}

#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    conditions: Vec<String>,
    bindings: Vec<FilterValue>,
}

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition; bind its `?` values right after
    pub fn add_condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    pub fn bind_text(&mut self, value: impl Into<String>) -> &mut Self {
        self.bindings.push(FilterValue::Text(value.into()));
        self
    }

    pub fn bind_i64(&mut self, value: i64) -> &mut Self {
        self.bindings.push(FilterValue::Integer(value));
        self
    }

    pub fn bind_uuid(&mut self, value: Uuid) -> &mut Self {
        self.bindings.push(FilterValue::Uuid(value));
        self
    }

    /// Soft-delete predicate for a table alias
    pub fn alive(&mut self, alias: &str) -> &mut Self {
        self.conditions.push(format!("{alias}.deleted_at IS NULL"));
        self
    }

    /// Case-insensitive substring match on one column
    pub fn add_contains(&mut self, field: &str, needle: &str) -> &mut Self {
        self.conditions.push(format!("{field} ILIKE ?"));
        self.bindings
            .push(FilterValue::Text(format!("%{}%", escape_like(needle))));
        self
    }

    /// Rendered WHERE clause (empty if there are no conditions)
    pub fn build_where_clause(&self) -> String {
        if self.conditions.is_empty() {
            return String::new();
        }
        let mut n = 0;
        let mut out = String::from(" WHERE ");
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                out.push_str(" AND ");
            }
            for ch in condition.chars() {
                if ch == '?' {
                    n += 1;
                    out.push('$');
                    out.push_str(&n.to_string());
                } else {
                    out.push(ch);
                }
            }
        }
        out
    }

    /// `LIMIT $a OFFSET $b` numbered after the filter's own bindings
    pub fn limit_offset_clause(&self) -> String {
        let next = self.bindings.len();
        format!(" LIMIT ${} OFFSET ${}", next + 1, next + 2)
    }

    pub fn apply_bindings_as<'q, O>(
        &self,
        mut query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> QueryAs<'q, Postgres, O, PgArguments> {
        for binding in &self.bindings {
            query = match binding {
                FilterValue::Text(s) => query.bind(s.clone()),
                FilterValue::Integer(i) => query.bind(*i),
                FilterValue::Uuid(u) => query.bind(*u),
            };
        }
        query
    }

    pub fn apply_bindings_scalar<'q, O>(
        &self,
        mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> QueryScalar<'q, Postgres, O, PgArguments> {
        for binding in &self.bindings {
            query = match binding {
                FilterValue::Text(s) => query.bind(s.clone()),
                FilterValue::Integer(i) => query.bind(*i),
                FilterValue::Uuid(u) => query.bind(*u),
            };
        }
        query
    }
}

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_where_clause() {
        let filter = QueryFilter::new();
        assert_eq!(filter.build_where_clause(), "");
        assert_eq!(filter.limit_offset_clause(), " LIMIT $1 OFFSET $2");
    }

    #[test]
    fn test_placeholders_are_renumbered() {
        let mut filter = QueryFilter::new();
        filter
            .alive("p")
            .add_condition("u.status = ?")
            .bind_text("active")
            .add_condition("p.created_at >= ? AND p.created_at < ?")
            .bind_i64(0)
            .bind_i64(86_400_000);
        assert_eq!(
            filter.build_where_clause(),
            " WHERE p.deleted_at IS NULL AND u.status = $1 AND p.created_at >= $2 AND p.created_at < $3"
        );
        assert_eq!(filter.limit_offset_clause(), " LIMIT $4 OFFSET $5");
    }

    #[test]
    fn test_contains_escapes_wildcards() {
        let mut filter = QueryFilter::new();
        filter.add_contains("u.email", "50%_off");
        assert_eq!(filter.build_where_clause(), " WHERE u.email ILIKE $1");
        assert_eq!(
            filter.bindings,
            vec![FilterValue::Text("%50\\%\\_off%".to_string())]
        );
    }
}
