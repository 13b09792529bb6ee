pub mod aggregate;
pub mod filter;
pub mod git;
pub mod store;


pub use aggregate::{aggregate, AuthorTotals, ChartData, FileTypeBreakdown};
pub use filter::{AuthorSelection, FilterState};
pub use git::{generate_document, write_document};
pub use store::DataStore;
