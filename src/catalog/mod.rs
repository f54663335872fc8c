//! Client-side catalog pipeline.
//!
//! [`source`] fetches a [`RawBundle`], [`normalize`] flattens it into
//! [`NormalizedShip`] records, [`filter`] and [`sort`] derive the visible
//! list, and [`Catalog`] ties them together as a small state machine.

pub mod coordinator;
pub mod filter;
pub mod normalize;
pub mod sort;
pub mod source;
pub mod types;

pub use coordinator::{Catalog, CatalogState};
pub use filter::{FilterState, filter};
pub use normalize::normalize;
pub use sort::{SortDirection, SortKey, SortState, sort};
pub use source::{CatalogSource, HttpCatalogSource};
pub use types::{NormalizedShip, RawBundle, RawNation, RawShip, RawVehicleType, ShipType};
