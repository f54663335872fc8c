//! Drydock - caching proxy and catalog pipeline for the Wargaming
//! encyclopedia API.
//!
//! The server half fronts the upstream API with a disk cache: each
//! `GET /api/<path>` is answered from a fresh cache record when one exists
//! and forwarded upstream otherwise. The client half turns the proxied
//! resources into a filterable, sortable list of ships.
//!
//! # Proxy Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use drydock::cache::{CacheConfig, DiskCache};
//! use drydock::proxy::CacheProxy;
//! use drydock::server::{AppState, build_router};
//! use drydock::upstream::{UpstreamClient, UpstreamConfig};
//!
//! #[tokio::main]
//! async fn main() -> drydock::Result<()> {
//!     let cache = DiskCache::new(&CacheConfig::default())?;
//!     let upstream = UpstreamClient::new(&UpstreamConfig::default())?;
//!     let proxy = CacheProxy::new(Arc::new(cache), Arc::new(upstream));
//!
//!     let app = build_router(AppState::new(proxy));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3001")
//!         .await
//!         .map_err(|e| drydock::DrydockError::Configuration(e.to_string()))?;
//!     axum::serve(listener, app)
//!         .await
//!         .map_err(|e| drydock::DrydockError::Configuration(e.to_string()))?;
//!     Ok(())
//! }
//! ```
//!
//! # Catalog Example
//!
//! ```rust,no_run
//! use drydock::catalog::{Catalog, HttpCatalogSource, ShipType, SortKey};
//!
//! #[tokio::main]
//! async fn main() -> drydock::Result<()> {
//!     let source = HttpCatalogSource::new("http://127.0.0.1:3001/api")?;
//!     let mut catalog = Catalog::new(source);
//!     catalog.load().await?;
//!
//!     catalog.toggle_type(ShipType::Battleship);
//!     catalog.set_sort_key(SortKey::Name);
//!     for ship in catalog.view() {
//!         println!("{} (tier {})", ship.display_name, ship.tier);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod proxy;
pub mod server;
pub mod telemetry;
pub mod upstream;

pub use error::{CacheError, DrydockError, Result, UpstreamError};

/// Crate version, reported by `/health` and the binaries.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
