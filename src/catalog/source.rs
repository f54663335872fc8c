//! Transport that assembles a [`RawBundle`] from the proxy.
//!
//! One load cycle fetches four resources concurrently. Each response must
//! be an HTTP success carrying `{ "status": "ok", "data": ... }`; any
//! failure fails the whole bundle so no partial dataset is ever produced.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::types::{RawBundle, RawNation, RawShip, RawVehicleType};
use crate::{DrydockError, Result};

pub const SHIPS_RESOURCE: &str = "vehicles/";
pub const NATIONS_RESOURCE: &str = "nations/";
pub const VEHICLE_TYPES_RESOURCE: &str = "vehicle_types_common/";
pub const MEDIA_PATH_RESOURCE: &str = "media_path/";

/// Default proxy API root.
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3001/api";

/// Source of raw catalog data for one load cycle.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_bundle(&self) -> Result<RawBundle>;
}

/// [`CatalogSource`] that reads through the drydock proxy.
#[derive(Clone)]
pub struct HttpCatalogSource {
    http: Client,
    api_url: String,
}

impl HttpCatalogSource {
    /// `api_url` is the proxy's API root, e.g. `http://127.0.0.1:3001/api`.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DrydockError::Http(e.to_string()))?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_resource<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        let url = format!("{}/{resource}", self.api_url);
        debug!(%url, "fetching catalog resource");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| DrydockError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DrydockError::Api {
                status: status.as_u16(),
                resource: resource.to_string(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| DrydockError::Http(e.to_string()))?;
        unwrap_envelope(body, resource)
    }
}

/// Extract `data` from an `{ status: "ok", data }` envelope.
pub fn unwrap_envelope<T: DeserializeOwned>(mut body: Value, resource: &str) -> Result<T> {
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if status != "ok" {
        return Err(DrydockError::BadEnvelope {
            status: status.to_string(),
            resource: resource.to_string(),
        });
    }
    let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    Ok(serde_json::from_value(data)?)
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_bundle(&self) -> Result<RawBundle> {
        let (ships, nations, vehicle_types, media_path) = tokio::try_join!(
            self.fetch_resource::<BTreeMap<String, RawShip>>(SHIPS_RESOURCE),
            self.fetch_resource::<Vec<RawNation>>(NATIONS_RESOURCE),
            self.fetch_resource::<HashMap<String, RawVehicleType>>(VEHICLE_TYPES_RESOURCE),
            self.fetch_resource::<String>(MEDIA_PATH_RESOURCE),
        )?;

        Ok(RawBundle {
            ships,
            nations,
            vehicle_types,
            media_path,
        })
    }
}
