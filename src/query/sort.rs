use crate::query::params::{Sort, SortField, SortOrder};

impl Sort {
    /// Next sort after a click on `column`.
    ///
    /// Unsorted column: ascending. Active ascending column: descending.
    /// Active descending column: back to the default (`createdAt desc`).
    /// When the clicked column already is the default, the reset would change
    /// nothing, so it flips to ascending instead.
    pub fn clicked(self, column: SortField) -> Sort {
        let default = Sort::default();
        if self.field != column {
            return Sort::new(column, SortOrder::Asc);
        }
        match self.order {
            SortOrder::Asc => Sort::new(column, SortOrder::Desc),
            SortOrder::Desc if self == default => Sort::new(column, SortOrder::Asc),
            SortOrder::Desc => default,
        }
    }
}
