//! Model catalog: discovery, routing table, atomic publication.
//!
//! `CatalogService` polls every provider's listing endpoint concurrently,
//! normalizes the responses into namespaced `provider/model` ids, and
//! publishes the result as an immutable snapshot. Request handlers read the
//! snapshot without locking against a build; the published reference is the
//! only shared mutable state.

pub mod normalize;


use crate::registry::ProviderConfig;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;

/// Resolution target for one namespaced model id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub provider_key: String,
    pub upstream_host: String,
    pub chat_path: Option<String>,
    pub image_path: Option<String>,
    /// The provider's own, non-namespaced id, sent back upstream.
    pub target_model_id: String,
}

impl Route {
    /// Base origin for upstream calls, mirroring `ProviderConfig::origin`.
    pub fn origin(&self) -> String {
        if self.upstream_host.contains("://") {
            self.upstream_host.clone()
        } else {
            format!("https://{}", self.upstream_host)
        }
    }
}

/// Immutable mapping of namespaced model id to route.
///
/// A table is built fresh per refresh cycle and swapped wholesale; it is
/// never mutated after publication.
#[derive(Debug, Default)]
pub struct RoutingTable {
    entries: HashMap<String, Route>,
}

impl RoutingTable {
    /// Exact-match lookup only; no prefix or partial resolution.
    pub fn get(&self, namespaced_id: &str) -> Option<&Route> {
        self.entries.get(namespaced_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Route)> {
        self.entries.iter()
    }
}

/// Builds and publishes the routing table.
pub struct CatalogService {
    providers: Vec<ProviderConfig>,
    client: Client,
    table: RwLock<Option<Arc<RoutingTable>>>,
    build_lock: Mutex<()>,
}

impl CatalogService {
    pub fn new(providers: Vec<ProviderConfig>, client: Client) -> Self {
        Self {
            providers,
            client,
            table: RwLock::new(None),
            build_lock: Mutex::new(()),
        }
    }

    /// Current published table, if any build has succeeded yet.
    pub fn snapshot(&self) -> Option<Arc<RoutingTable>> {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Build if no table has ever been published. Returns immediately when a
    /// build is already in flight; the caller answers from the current
    /// (possibly absent) snapshot.
    pub async fn ensure_populated(&self) {
        if self.snapshot().is_none() {
            self.refresh().await;
        }
    }

    /// Rebuild the routing table from every provider and publish the result.
    ///
    /// Single-flight: a refresh arriving while one is running is dropped.
    /// An empty build never replaces the published table.
    pub async fn refresh(&self) {
        let Ok(_guard) = self.build_lock.try_lock() else {
            tracing::debug!("catalog build already in flight, dropping refresh");
            return;
        };

        let fetches = self.providers.iter().map(|provider| async move {
            let ids = match self.fetch_provider(provider).await {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::warn!(provider = %provider.key, error = %e, "catalog fetch failed");
                    Vec::new()
                }
            };
            (provider, ids)
        });

        // All fetches settle before merging; a slow provider never blocks
        // using the others' results.
        let results = futures::future::join_all(fetches).await;

        let mut entries = HashMap::new();
        for (provider, ids) in results {
            for raw_id in ids {
                let namespaced = format!("{}/{}", provider.key, raw_id);
                entries.insert(
                    namespaced,
                    Route {
                        provider_key: provider.key.clone(),
                        upstream_host: provider.upstream_host.clone(),
                        chat_path: provider.chat_path.clone(),
                        image_path: provider.image_path.clone(),
                        target_model_id: raw_id,
                    },
                );
            }
        }

        let table = RoutingTable { entries };
        if table.is_empty() {
            tracing::warn!("catalog build produced no models, keeping previous table");
            return;
        }

        tracing::info!(models = table.len(), "catalog published");
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(table));
    }

    /// Fetch and normalize one provider's model listing.
    ///
    /// Providers without a models path are static: no call, no entries.
    async fn fetch_provider(&self, provider: &ProviderConfig) -> Result<Vec<String>, reqwest::Error> {
        let Some(models_path) = &provider.models_path else {
            return Ok(Vec::new());
        };

        let url = format!("{}{}", provider.origin(), models_path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(response.error_for_status().unwrap_err());
        }

        let payload: Value = response.json().await?;
        Ok(normalize::extract_model_ids(&payload))
    }
}
