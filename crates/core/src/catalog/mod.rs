pub mod facets;
pub mod filter;

pub use facets::{facets, CatalogFacets};
pub use filter::{filter_and_sort, CatalogFilter, Selection, ALL};
