//! Search and ordering for list operations.

use sea_orm::Order;

use crate::{EngineError, ResultEngine};

/// Options accepted by every `list_*` operation.
///
/// - `search`: case-insensitive substring matched against the resource search
///   fields.
/// - `ordering`: one field name, prefixed with `-` for descending order.
#[derive(Clone, Debug, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl ListQuery {
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    /// The trimmed search term, if any.
    pub(crate) fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Resolve `ordering` against the fields a resource can be sorted by.
    ///
    /// Defaults to ascending `id` when no ordering is requested.
    pub(crate) fn resolve_ordering(
        &self,
        allowed: &[&'static str],
    ) -> ResultEngine<(&'static str, Order)> {
        let Some(raw) = self.ordering.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(("id", Order::Asc));
        };

        let (name, order) = match raw.strip_prefix('-') {
            Some(name) => (name, Order::Desc),
            None => (raw, Order::Asc),
        };

        allowed
            .iter()
            .find(|field| **field == name)
            .map(|field| (*field, order))
            .ok_or_else(|| EngineError::InvalidQuery(format!("cannot order by \"{name}\"")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[&str] = &["id", "name"];

    #[test]
    fn default_ordering_is_id_ascending() {
        let (field, order) = ListQuery::default().resolve_ordering(FIELDS).unwrap();

        assert_eq!(field, "id");
        assert_eq!(order, Order::Asc);
    }

    #[test]
    fn leading_dash_means_descending() {
        let (field, order) = ListQuery::default()
            .ordering("-name")
            .resolve_ordering(FIELDS)
            .unwrap();

        assert_eq!(field, "name");
        assert_eq!(order, Order::Desc);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = ListQuery::default()
            .ordering("price")
            .resolve_ordering(FIELDS)
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::InvalidQuery("cannot order by \"price\"".to_string())
        );
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(ListQuery::default().search("   ").search_term(), None);
        assert_eq!(ListQuery::default().search(" ab ").search_term(), Some("ab"));
    }
}
