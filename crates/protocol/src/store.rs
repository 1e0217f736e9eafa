use std::collections::HashMap;

/// Read-only view of the knowledge store's manually curated categories.
///
/// The category-alignment scorer needs the user-assigned categories for a
/// file; this trait is the single seam to that collaborator. Implementations
/// must be cheap and infallible: a file without curation returns an empty
/// list, never an error.
pub trait CategoryProvider: Send + Sync {
    fn manual_categories(&self, file_id: &str) -> Vec<String>;
}

/// In-memory `CategoryProvider` for hosts that already hold the category
/// map, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCategories {
    by_file: HashMap<String, Vec<String>>,
}

impl StaticCategories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(
        mut self,
        file_id: impl Into<String>,
        categories: impl IntoIterator<Item = String>,
    ) -> Self {
        self.by_file
            .insert(file_id.into(), categories.into_iter().collect());
        self
    }
}

impl CategoryProvider for StaticCategories {
    fn manual_categories(&self, file_id: &str) -> Vec<String> {
        self.by_file.get(file_id).cloned().unwrap_or_default()
    }
}
