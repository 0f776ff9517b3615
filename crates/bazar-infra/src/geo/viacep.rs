//! ViaCEP postal-code lookup client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use bazar_core::domain::Location;
use bazar_core::ports::{Cache, LookupError, PostalCodeLookup};

const DEFAULT_BASE_URL: &str = "https://viacep.com.br";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the ViaCEP service. Requests are bounded by a 5s
/// timeout and never retried automatically; callers surface the failure
/// and the user may retry.
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ViaCepBody {
    #[serde(default)]
    erro: bool,
    #[serde(default)]
    localidade: Option<String>,
    #[serde(default)]
    uf: Option<String>,
    #[serde(default)]
    bairro: Option<String>,
}

impl ViaCepClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client");

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn normalize(cep: &str) -> Result<String, LookupError> {
        let digits: String = cep.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 8 {
            return Err(LookupError::Malformed(cep.to_string()));
        }
        Ok(digits)
    }
}

impl Default for ViaCepClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<Option<Location>, LookupError> {
        let digits = Self::normalize(cep)?;
        let url = format!("{}/ws/{}/json/", self.base_url, digits);

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else {
                LookupError::Upstream(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(LookupError::Upstream(format!(
                "status {}",
                response.status()
            )));
        }

        let body: ViaCepBody = response
            .json()
            .await
            .map_err(|e| LookupError::Upstream(e.to_string()))?;

        if body.erro {
            return Ok(None);
        }

        match (body.localidade, body.uf) {
            (Some(city), Some(state)) => Ok(Some(Location {
                cep: digits,
                city,
                state,
                neighborhood: body.bairro.filter(|b| !b.is_empty()),
            })),
            _ => Ok(None),
        }
    }
}

/// Caching decorator over any postal lookup. Both hits and not-found
/// results are cached; a CEP's locality effectively never changes.
pub struct CachedPostalLookup {
    inner: Arc<dyn PostalCodeLookup>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl CachedPostalLookup {
    pub fn new(inner: Arc<dyn PostalCodeLookup>, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    fn cache_key(digits: &str) -> String {
        format!("cep:{digits}")
    }
}

#[async_trait]
impl PostalCodeLookup for CachedPostalLookup {
    async fn lookup(&self, cep: &str) -> Result<Option<Location>, LookupError> {
        let digits = ViaCepClient::normalize(cep)?;
        let key = Self::cache_key(&digits);

        if let Some(cached) = self.cache.get(&key).await {
            if let Ok(location) = serde_json::from_str::<Option<Location>>(&cached) {
                return Ok(location);
            }
        }

        let result = self.inner.lookup(&digits).await?;

        if let Ok(serialized) = serde_json::to_string(&result) {
            if let Err(e) = self.cache.set(&key, &serialized, Some(self.ttl)).await {
                tracing::warn!(error = %e, "Failed to cache postal lookup");
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_normalize_accepts_masked_cep() {
        assert_eq!(ViaCepClient::normalize("01310-100").unwrap(), "01310100");
        assert!(matches!(
            ViaCepClient::normalize("1310-100"),
            Err(LookupError::Malformed(_))
        ));
    }

    struct CountingLookup {
        calls: AtomicUsize,
        result: Option<Location>,
    }

    #[async_trait]
    impl PostalCodeLookup for CountingLookup {
        async fn lookup(&self, _cep: &str) -> Result<Option<Location>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    #[tokio::test]
    async fn test_cached_lookup_hits_upstream_once() {
        let upstream = Arc::new(CountingLookup {
            calls: AtomicUsize::new(0),
            result: Some(Location {
                cep: "01310100".to_string(),
                city: "São Paulo".to_string(),
                state: "SP".to_string(),
                neighborhood: Some("Bela Vista".to_string()),
            }),
        });
        let cached = CachedPostalLookup::new(
            upstream.clone(),
            Arc::new(InMemoryCache::new()),
            Duration::from_secs(60),
        );

        let first = cached.lookup("01310-100").await.unwrap();
        let second = cached.lookup("01310100").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_cached_too() {
        let upstream = Arc::new(CountingLookup {
            calls: AtomicUsize::new(0),
            result: None,
        });
        let cached = CachedPostalLookup::new(
            upstream.clone(),
            Arc::new(InMemoryCache::new()),
            Duration::from_secs(60),
        );

        assert!(cached.lookup("99999999").await.unwrap().is_none());
        assert!(cached.lookup("99999999").await.unwrap().is_none());
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }
}
