/// Options for reading items from a collection.
///
/// Each field maps onto the Directus query parameter of the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Field names, `-` prefix for descending.
    pub sort: Vec<String>,
    pub limit: Option<u32>,
    pub fields: Vec<String>,
    /// Full-text search performed by the backend.
    pub search: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort.push(field.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() {
            None
        } else {
            Some(term)
        };
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.sort.is_empty() {
            params.push(("sort", self.sort.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("fields", self.fields.join(",")));
        }
        if let Some(ref term) = self.search {
            params.push(("search", term.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_have_no_params() {
        assert!(QueryOptions::new().to_params().is_empty());
    }

    #[test]
    fn test_params() {
        let options = QueryOptions::new()
            .sort("-date_created")
            .sort("name")
            .limit(25)
            .fields(["id", "name"])
            .search("berlin");

        assert_eq!(
            options.to_params(),
            vec![
                ("sort", "-date_created,name".to_string()),
                ("limit", "25".to_string()),
                ("fields", "id,name".to_string()),
                ("search", "berlin".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_ignored() {
        assert_eq!(QueryOptions::new().search("   ").search, None);
    }
}
