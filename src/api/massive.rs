// ============================================================================
// API Client : Massive (cotations forex)
// ============================================================================
// Récupère le catalogue des paires et les barres historiques
//
// Endpoints :
// - GET /v3/reference/tickers?market=fx&active=true&limit=N
// - GET /v2/aggs/ticker/{ticker}/range/{multiplier}/{timespan}/{from}/{to}
//
// CONCEPTS RUST :
// 1. async/await : les appels réseau ne bloquent pas le thread
// 2. Result<T, MarketDataError> : chaque panne HTTP devient une variante typée
// 3. Serde : désérialisation JSON automatique
// ============================================================================

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::api::{AggregatesResponse, MarketDataClient, TickersResponse};
use crate::config::Config;
use crate::error::{MarketDataError, Result};
use crate::models::Timespan;
use crate::utils::DateRange;

/// Corps d'erreur renvoyé par le fournisseur (l'un ou l'autre champ)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Client HTTP pour l'API Massive
///
/// CONCEPT RUST : reqwest::Client est un Arc interne
/// - Le cloner est peu coûteux et partage le pool de connexions
#[derive(Debug, Clone)]
pub struct MassiveClient {
    http: reqwest::Client,
    config: Config,
}

impl MassiveClient {
    /// Construit le client à partir de la configuration
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MarketDataError::Config(e.to_string()))?;

        debug!(?config, "Created Massive HTTP client");
        Ok(Self { http, config })
    }

    /// Envoie un GET et désérialise la réponse
    ///
    /// La clé API est ajoutée en paramètre `apiKey` et n'est jamais loggée.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(url = %url, ?query, "Sending HTTP request to Massive");

        let mut request = self.http.get(&url).query(query);
        if let Some(api_key) = &self.config.api_key {
            request = request.query(&[("apiKey", api_key)]);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let err = error_from_response(status, &body);
            error!(status = %status, error = %err, "Massive returned error status");
            return Err(err);
        }

        decode_body(&body)
    }
}

#[async_trait]
impl MarketDataClient for MassiveClient {
    #[instrument(skip(self))]
    async fn list_forex_tickers(&self, limit: u32) -> Result<TickersResponse> {
        let query = [
            ("market", "fx".to_string()),
            ("active", "true".to_string()),
            ("limit", limit.to_string()),
        ];

        let response: TickersResponse = self.get_json("/v3/reference/tickers", &query).await?;
        info!(
            tickers = response.results.as_ref().map(|r| r.len()).unwrap_or(0),
            "Fetched forex tickers"
        );
        Ok(response)
    }

    #[instrument(skip(self, timespan), fields(timespan = %timespan))]
    async fn get_aggregates(
        &self,
        ticker: &str,
        multiplier: u32,
        timespan: Timespan,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AggregatesResponse> {
        let range = DateRange {
            from,
            to,
            multiplier,
            timespan,
        };
        let path = aggregates_path(ticker, &range);
        let query = [
            ("adjusted", "true".to_string()),
            ("sort", "asc".to_string()),
        ];

        let response: AggregatesResponse = self.get_json(&path, &query).await?;
        info!(results_count = ?response.results_count, "Fetched aggregates");
        Ok(response)
    }
}

/// Construit le chemin de l'endpoint des agrégats
fn aggregates_path(ticker: &str, range: &DateRange) -> String {
    format!(
        "/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
        ticker,
        range.multiplier,
        range.timespan.as_str(),
        range.from_param(),
        range.to_param()
    )
}

/// Erreur reqwest -> MarketDataError
///
/// Connexion, timeout ou envoi échoué : aucune réponse n'a atteint le client.
///
/// L'URL est retirée du message : elle porte la clé API en paramètre.
fn transport_error(e: reqwest::Error) -> MarketDataError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        MarketDataError::Network
    } else {
        MarketDataError::Api(e.without_url().to_string())
    }
}

/// Réponse non-2xx -> MarketDataError, en lisant le message du fournisseur
fn error_from_response(status: StatusCode, body: &str) -> MarketDataError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .or_else(|| status.canonical_reason().map(str::to_string));

    MarketDataError::from_status(status.as_u16(), message)
}

/// Désérialise un corps JSON de succès
fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| MarketDataError::Api(format!("Invalid response from Massive: {}", e)))
}

// ============================================================================
// Tests unitaires
// ============================================================================
