//! The incident list query: parameters, cursor history, sort cycling,
//! debounced search and the state those drive.

pub mod cursor;
pub mod debounce;
pub mod executor;
pub mod params;
pub mod sort;
pub mod state;

pub use cursor::{Cursor, CursorStack};
pub use debounce::{Debouncer, Ticket};
pub use executor::QueryExecutor;
pub use params::{CountsQuery, Filters, ListQuery, PageSizes, Sort, SortField, SortOrder};
pub use state::{Applied, CountsSummary, FetchRequest, FilterChange, Generation, ListState};
