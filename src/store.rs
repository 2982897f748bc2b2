// ============================================================================
// Market Data Store
// ============================================================================
// Possède la sélection courante (paire + période), orchestre les appels au
// client de données et expose l'état à l'interface.
//
// CONCEPTS RUST :
// 1. Mutabilité intérieure : Mutex<Inner> permet des méthodes async en &self,
//    donc plusieurs fetchs peuvent se chevaucher (changements rapides de période)
// 2. RAII : LoadingGuard décrémente le compteur de fetchs en vol dans Drop,
//    le "loading" est donc toujours remis à false, succès ou échec
// 3. Jamais de MutexGuard tenu pendant un .await
//
// PATTERN : état primaire + dérivations pures
// - MarketState ne stocke que l'état primaire
// - Les métriques (variation, prix courant, devises) sont recalculées à chaque
//   lecture, jamais mises à jour indépendamment
//
// CONCURRENCE : compteur de génération
// - Chaque fetch historique reçoit un numéro croissant
// - Une réponse dont le numéro n'est plus le dernier émis est ignorée :
//   une réponse lente ne peut pas écraser une réponse plus récente
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::api::{MarketDataClient, TickerDescriptor};
use crate::config::DEFAULT_TICKERS_LIMIT;
use crate::error::MarketDataError;
use crate::models::bar::{is_chronological, sort_chronologically};
use crate::models::pair::parse_currency_pair;
use crate::models::{AggregateBar, CatalogEntry, CurrencyPair, PriceChange, Timeframe};
use crate::utils::calculate_date_range;

// ============================================================================
// MarketState : état primaire + dérivations
// ============================================================================

/// Photographie de l'état du store
///
/// L'interface reçoit des copies (snapshot) : elle ne peut pas modifier l'état
/// du store, seul le store écrit.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketState {
    /// Catalogue des paires forex disponibles
    pub available_pairs: Vec<CatalogEntry>,

    /// Paire sélectionnée
    pub selection: CurrencyPair,

    /// Période sélectionnée
    pub timeframe: Timeframe,

    /// Série historique courante (triée par timestamp croissant)
    pub historical_data: Vec<AggregateBar>,

    /// Dernier prix connu (close de la dernière barre reçue)
    pub last_price: Option<f64>,

    /// Message de la dernière opération échouée
    pub error: Option<String>,

    /// Vrai tant qu'au moins une opération est en cours
    pub loading: bool,

    /// Places de cotation affichées
    pub exchanges: Vec<String>,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            available_pairs: Vec::new(),
            selection: CurrencyPair::default(),
            timeframe: Timeframe::default(),
            historical_data: Vec::new(),
            last_price: None,
            error: None,
            loading: false,
            exchanges: vec!["Forex.com".to_string()],
        }
    }
}

impl MarketState {
    /// Ticker effectif : "C:" + base + quote
    pub fn selected_ticker(&self) -> String {
        self.selection.ticker()
    }

    /// Variation entre le premier et le dernier close de la série
    pub fn price_change(&self) -> PriceChange {
        PriceChange::from_series(&self.historical_data)
    }

    /// Prix courant
    ///
    /// Dernier close de la série, sinon dernier prix connu, sinon 0.
    pub fn current_price(&self) -> f64 {
        self.historical_data
            .last()
            .map(|bar| bar.close)
            .or(self.last_price)
            .unwrap_or(0.0)
    }

    /// Codes devises distincts présents dans le catalogue, triés
    ///
    /// Seuls les tickers dont le corps (sans "C:") fait 6 caractères comptent.
    pub fn unique_currencies(&self) -> Vec<String> {
        let mut currencies = BTreeSet::new();

        for entry in &self.available_pairs {
            let (base, quote) = parse_currency_pair(&entry.ticker);
            if !base.is_empty() && !quote.is_empty() {
                currencies.insert(base);
                currencies.insert(quote);
            }
        }

        currencies.into_iter().collect()
    }

    /// Table code devise -> nom affichable
    ///
    /// Parcourt le catalogue dans l'ordre : en cas de collision, la dernière
    /// entrée gagne.
    pub fn currency_names(&self) -> BTreeMap<String, String> {
        let mut names = BTreeMap::new();

        for entry in &self.available_pairs {
            if let (Some(symbol), Some(name)) = (&entry.base_currency_symbol, &entry.base_currency_name) {
                names.insert(symbol.clone(), name.clone());
            }
            if let (Some(symbol), Some(name)) = (&entry.currency_symbol, &entry.currency_name) {
                names.insert(symbol.clone(), name.clone());
            }
        }

        names
    }
}

/// Projette un ticker du fournisseur dans le format du catalogue
fn to_catalog_entry(descriptor: TickerDescriptor) -> CatalogEntry {
    let name = if descriptor.name.trim().is_empty() {
        descriptor.ticker.clone()
    } else {
        descriptor.name
    };

    CatalogEntry {
        ticker: descriptor.ticker,
        name,
        currency_symbol: descriptor.currency_symbol,
        currency_name: descriptor.currency_name,
        base_currency_symbol: descriptor.base_currency_symbol,
        base_currency_name: descriptor.base_currency_name,
    }
}

// ============================================================================
// MarketDataStore
// ============================================================================

/// État protégé par le mutex
#[derive(Debug, Default)]
struct Inner {
    state: MarketState,

    /// Nombre d'opérations en cours (loading = in_flight > 0)
    in_flight: usize,

    /// Dernière génération de fetch historique émise
    latest_generation: u64,
}

impl Inner {
    /// Début d'opération : loading à true, erreur effacée
    fn begin_operation(&mut self) {
        self.in_flight += 1;
        self.state.loading = true;
        self.state.error = None;
    }

    fn end_operation(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.loading = self.in_flight > 0;
    }
}

/// Remet le loading à jour quand l'opération se termine, quelle que soit l'issue
struct LoadingGuard<'a> {
    store: &'a MarketDataStore,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.lock().end_operation();
    }
}

/// Store des données de marché
///
/// Créé une fois par session et passé par référence (ou Arc) à l'interface.
pub struct MarketDataStore {
    client: Arc<dyn MarketDataClient>,
    tickers_limit: u32,
    inner: Mutex<Inner>,
}

impl MarketDataStore {
    /// Crée un store vide (EUR/USD, 15 minutes)
    pub fn new(client: Arc<dyn MarketDataClient>) -> Self {
        Self::with_tickers_limit(client, DEFAULT_TICKERS_LIMIT)
    }

    /// Crée un store avec une limite de catalogue explicite
    pub fn with_tickers_limit(client: Arc<dyn MarketDataClient>, tickers_limit: u32) -> Self {
        Self {
            client,
            tickers_limit,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Un panic pendant une mise à jour ne doit pas bloquer l'interface
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copie de l'état courant
    pub fn snapshot(&self) -> MarketState {
        self.lock().state.clone()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Charge le catalogue des paires forex
    ///
    /// En cas d'échec, le catalogue précédent est conservé tel quel.
    pub async fn fetch_available_pairs(&self) {
        self.lock().begin_operation();
        let _loading = LoadingGuard { store: self };

        let result = self.client.list_forex_tickers(self.tickers_limit).await;

        let mut inner = self.lock();
        match result {
            Ok(response) => match response.results {
                Some(results) => {
                    let catalog: Vec<CatalogEntry> = results
                        .into_iter()
                        .filter(|descriptor| CatalogEntry::is_forex(&descriptor.ticker))
                        .map(to_catalog_entry)
                        .collect();

                    info!(pairs = catalog.len(), "Available pairs loaded");
                    inner.state.available_pairs = catalog;
                }
                None => {
                    warn!("Ticker response has no results, keeping previous catalog");
                }
            },
            Err(e) => {
                error!(error = %e, "Failed to fetch available pairs");
                inner.state.error = Some(e.to_string());
            }
        }
    }

    /// Charge la série historique
    ///
    /// `ticker` et `timeframe` remplacent la sélection courante pour cet appel
    /// seulement ; la sélection n'est pas modifiée.
    pub async fn fetch_historical_data(&self, ticker: Option<&str>, timeframe: Option<Timeframe>) {
        let (ticker, timeframe, generation) = {
            let mut inner = self.lock();
            let ticker = ticker
                .filter(|t| !t.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| inner.state.selected_ticker());
            let timeframe = timeframe.unwrap_or(inner.state.timeframe);

            inner.latest_generation += 1;
            inner.begin_operation();
            (ticker, timeframe, inner.latest_generation)
        };
        let _loading = LoadingGuard { store: self };

        let range = calculate_date_range(timeframe);
        debug!(
            ticker = %ticker,
            timeframe = %timeframe,
            from = %range.from,
            to = %range.to,
            generation,
            "Fetching historical data"
        );

        let result = self
            .client
            .get_aggregates(&ticker, range.multiplier, range.timespan, range.from, range.to)
            .await;

        let mut inner = self.lock();
        if generation != inner.latest_generation {
            warn!(
                ticker = %ticker,
                generation,
                latest = inner.latest_generation,
                "Discarding stale historical data response"
            );
            return;
        }

        match result {
            Ok(response) => match response.into_bars() {
                Some(mut bars) if !bars.is_empty() => {
                    if !is_chronological(&bars) {
                        warn!(ticker = %ticker, "Bars out of order, sorting by timestamp");
                        sort_chronologically(&mut bars);
                    }

                    info!(ticker = %ticker, timeframe = %timeframe, bars = bars.len(), "Historical data loaded");
                    inner.state.last_price = bars.last().map(|bar| bar.close);
                    inner.state.historical_data = bars;
                }
                _ => {
                    warn!(ticker = %ticker, timeframe = %timeframe, "No bars for this range");
                    inner.state.historical_data.clear();
                    inner.state.error = Some(MarketDataError::NoData.to_string());
                }
            },
            Err(e) => {
                if e.is_empty_result() {
                    warn!(ticker = %ticker, "Client reported no data for this range");
                } else {
                    error!(ticker = %ticker, error = %e, "Failed to fetch historical data");
                }
                inner.state.historical_data.clear();
                inner.state.error = Some(e.to_string());
            }
        }
    }

    /// Change la paire sélectionnée puis recharge la série
    ///
    /// Le fetch est attendu : à la fin de l'appel, l'état est cohérent.
    /// Des codes invalides sont refusés (erreur affichée, pas de fetch).
    pub async fn set_selected_pair(&self, base: &str, quote: &str) {
        let pair = match CurrencyPair::new(base, quote) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(base, quote, error = %e, "Rejected currency pair");
                self.lock().state.error = Some(e.to_string());
                return;
            }
        };

        info!(pair = %pair, "Selected pair changed");
        self.lock().state.selection = pair;
        self.fetch_historical_data(None, None).await;
    }

    /// Change la période sélectionnée puis recharge la série
    pub async fn set_timeframe(&self, timeframe: Timeframe) {
        self.select_timeframe(timeframe);
        self.fetch_historical_data(None, None).await;
    }

    /// Écrit la période sélectionnée sans lancer de fetch
    ///
    /// Visible immédiatement par snapshot() : l'interface peut enchaîner
    /// plusieurs changements avant que le fetch ne démarre.
    pub fn select_timeframe(&self, timeframe: Timeframe) {
        info!(timeframe = %timeframe, "Timeframe changed");
        self.lock().state.timeframe = timeframe;
    }

    /// Efface le message d'erreur
    pub fn clear_error(&self) {
        self.lock().state.error = None;
    }

    // ========================================================================
    // Lectures (dérivées, recalculées à chaque appel)
    // ========================================================================

    pub fn selected_ticker(&self) -> String {
        self.lock().state.selected_ticker()
    }

    pub fn price_change(&self) -> PriceChange {
        self.lock().state.price_change()
    }

    pub fn current_price(&self) -> f64 {
        self.lock().state.current_price()
    }

    pub fn unique_currencies(&self) -> Vec<String> {
        self.lock().state.unique_currencies()
    }

    pub fn currency_names(&self) -> BTreeMap<String, String> {
        self.lock().state.currency_names()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use chrono::{Local, NaiveDate};
    use tokio::sync::Notify;

    use crate::api::{AggregatesResponse, TickersResponse};
    use crate::models::Timespan;

    // ------------------------------------------------------------------------
    // Faux client : réponses scriptées + enregistrement des appels
    // ------------------------------------------------------------------------

    #[derive(Debug, Clone, PartialEq)]
    struct AggregatesCall {
        ticker: String,
        multiplier: u32,
        timespan: Timespan,
        from: NaiveDate,
        to: NaiveDate,
    }

    struct ScriptedAggregates {
        result: crate::error::Result<AggregatesResponse>,
        gate: Option<Arc<Notify>>,
    }

    #[derive(Default)]
    struct ScriptedClient {
        aggregates: Mutex<VecDeque<ScriptedAggregates>>,
        tickers: Mutex<VecDeque<crate::error::Result<TickersResponse>>>,
        aggregate_calls: Mutex<Vec<AggregatesCall>>,
        ticker_calls: Mutex<Vec<u32>>,
    }

    impl ScriptedClient {
        fn push_aggregates(&self, result: crate::error::Result<AggregatesResponse>) {
            self.aggregates
                .lock()
                .unwrap()
                .push_back(ScriptedAggregates { result, gate: None });
        }

        fn push_gated_aggregates(&self, result: crate::error::Result<AggregatesResponse>, gate: Arc<Notify>) {
            self.aggregates
                .lock()
                .unwrap()
                .push_back(ScriptedAggregates { result, gate: Some(gate) });
        }

        fn push_tickers(&self, result: crate::error::Result<TickersResponse>) {
            self.tickers.lock().unwrap().push_back(result);
        }

        fn aggregate_calls(&self) -> Vec<AggregatesCall> {
            self.aggregate_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MarketDataClient for ScriptedClient {
        async fn list_forex_tickers(&self, limit: u32) -> crate::error::Result<TickersResponse> {
            self.ticker_calls.lock().unwrap().push(limit);
            self.tickers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(TickersResponse::default()))
        }

        async fn get_aggregates(
            &self,
            ticker: &str,
            multiplier: u32,
            timespan: Timespan,
            from: NaiveDate,
            to: NaiveDate,
        ) -> crate::error::Result<AggregatesResponse> {
            self.aggregate_calls.lock().unwrap().push(AggregatesCall {
                ticker: ticker.to_string(),
                multiplier,
                timespan,
                from,
                to,
            });

            let scripted = self.aggregates.lock().unwrap().pop_front();
            match scripted {
                Some(ScriptedAggregates { result, gate }) => {
                    if let Some(gate) = gate {
                        gate.notified().await;
                    }
                    result
                }
                None => Ok(AggregatesResponse::default()),
            }
        }
    }

    fn setup() -> (Arc<ScriptedClient>, MarketDataStore) {
        let client = Arc::new(ScriptedClient::default());
        let store = MarketDataStore::new(client.clone());
        (client, store)
    }

    fn bars(closes: &[f64]) -> Vec<AggregateBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| AggregateBar::new(1_704_067_200_000 + i as i64 * 60_000, c, c, c, c))
            .collect()
    }

    fn aggregates(closes: &[f64]) -> crate::error::Result<AggregatesResponse> {
        Ok(AggregatesResponse::from_bars("C:EURUSD", &bars(closes)))
    }

    fn descriptor(ticker: &str, base: Option<(&str, &str)>, quote: Option<(&str, &str)>) -> TickerDescriptor {
        TickerDescriptor {
            ticker: ticker.to_string(),
            name: String::new(),
            market: Some("fx".to_string()),
            locale: None,
            currency_symbol: quote.map(|(s, _)| s.to_string()),
            currency_name: quote.map(|(_, n)| n.to_string()),
            base_currency_symbol: base.map(|(s, _)| s.to_string()),
            base_currency_name: base.map(|(_, n)| n.to_string()),
            active: Some(true),
        }
    }

    fn tickers(descriptors: Vec<TickerDescriptor>) -> crate::error::Result<TickersResponse> {
        Ok(TickersResponse {
            status: Some("OK".to_string()),
            count: Some(descriptors.len() as u64),
            results: Some(descriptors),
            next_url: None,
        })
    }

    async fn wait_for_aggregate_calls(client: &ScriptedClient, count: usize) {
        while client.aggregate_calls().len() < count {
            tokio::task::yield_now().await;
        }
    }

    // ------------------------------------------------------------------------
    // État initial et dérivations
    // ------------------------------------------------------------------------

    #[test]
    fn test_initial_state() {
        let (_client, store) = setup();
        let state = store.snapshot();

        assert_eq!(state.selected_ticker(), "C:EURUSD");
        assert_eq!(state.timeframe, Timeframe::FifteenMinutes);
        assert!(state.historical_data.is_empty());
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert_eq!(state.exchanges, vec!["Forex.com".to_string()]);
        assert_eq!(store.current_price(), 0.0);
        assert_eq!(store.price_change(), PriceChange::default());
    }

    #[test]
    fn test_current_price_falls_back_to_last_price() {
        let mut state = MarketState::default();
        state.last_price = Some(1.0842);
        assert_eq!(state.current_price(), 1.0842);

        state.historical_data = bars(&[1.1, 1.2]);
        assert_eq!(state.current_price(), 1.2);
    }

    #[test]
    fn test_unique_currencies() {
        let mut state = MarketState::default();
        state.available_pairs = vec![
            to_catalog_entry(descriptor("C:GBPJPY", None, None)),
            to_catalog_entry(descriptor("C:EURUSD", None, None)),
            to_catalog_entry(descriptor("C:USDJPY", None, None)),
            to_catalog_entry(descriptor("C:XAUUSDX", None, None)),
        ];

        assert_eq!(state.unique_currencies(), vec!["EUR", "GBP", "JPY", "USD"]);
    }

    #[test]
    fn test_currency_names_last_write_wins() {
        let mut state = MarketState::default();
        state.available_pairs = vec![
            to_catalog_entry(descriptor("C:EURUSD", Some(("EUR", "Euro")), Some(("USD", "US Dollar")))),
            to_catalog_entry(descriptor("C:GBPUSD", Some(("GBP", "British Pound")), Some(("USD", "United States Dollar")))),
            to_catalog_entry(descriptor("C:CHFJPY", None, Some(("JPY", "Japanese Yen")))),
        ];

        let names = state.currency_names();
        assert_eq!(names.get("EUR").map(String::as_str), Some("Euro"));
        assert_eq!(names.get("USD").map(String::as_str), Some("United States Dollar"));
        assert_eq!(names.get("JPY").map(String::as_str), Some("Japanese Yen"));
        assert_eq!(names.get("CHF"), None);
    }

    // ------------------------------------------------------------------------
    // fetch_historical_data
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_fetch_historical_data_success() {
        let (client, store) = setup();
        client.push_aggregates(aggregates(&[1.1000, 1.2100]));

        store.fetch_historical_data(None, None).await;

        let state = store.snapshot();
        assert_eq!(state.historical_data.len(), 2);
        assert_eq!(state.last_price, Some(1.2100));
        assert_eq!(state.error, None);
        assert!(!state.loading);

        let change = store.price_change();
        assert!((change.value - 0.11).abs() < 1e-9);
        assert!((change.percentage - 10.0).abs() < 1e-9);

        let calls = client.aggregate_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].ticker, "C:EURUSD");
        assert_eq!(calls[0].multiplier, 15);
        assert_eq!(calls[0].timespan, Timespan::Minute);
        assert_eq!(calls[0].to, Local::now().date_naive());
        assert!(calls[0].from < calls[0].to);
    }

    #[tokio::test]
    async fn test_fetch_overrides_do_not_change_selection() {
        let (client, store) = setup();
        client.push_aggregates(aggregates(&[150.0, 151.0]));

        store.fetch_historical_data(Some("C:USDJPY"), Some(Timeframe::OneMonth)).await;

        let calls = client.aggregate_calls();
        assert_eq!(calls[0].ticker, "C:USDJPY");
        assert_eq!(calls[0].timespan, Timespan::Month);

        let state = store.snapshot();
        assert_eq!(state.selected_ticker(), "C:EURUSD");
        assert_eq!(state.timeframe, Timeframe::FifteenMinutes);
    }

    #[tokio::test]
    async fn test_fetch_sorts_out_of_order_bars() {
        let (client, store) = setup();
        let mut series = bars(&[1.0, 2.0, 3.0]);
        series.reverse();
        client.push_aggregates(Ok(AggregatesResponse::from_bars("C:EURUSD", &series)));

        store.fetch_historical_data(None, None).await;

        let state = store.snapshot();
        assert_eq!(state.historical_data.first().map(|b| b.close), Some(1.0));
        assert_eq!(state.current_price(), 3.0);
    }

    #[tokio::test]
    async fn test_fetch_empty_result_sets_no_data_error() {
        let (client, store) = setup();
        client.push_aggregates(aggregates(&[1.1, 1.2]));
        client.push_aggregates(aggregates(&[]));

        store.fetch_historical_data(None, None).await;
        store.fetch_historical_data(None, None).await;

        let state = store.snapshot();
        assert!(state.historical_data.is_empty());
        assert_eq!(state.error, Some(MarketDataError::NoData.to_string()));
        assert!(!state.loading);
        // Le dernier prix connu survit à une série vide
        assert_eq!(state.current_price(), 1.2);
    }

    #[tokio::test]
    async fn test_fetch_malformed_result_sets_no_data_error() {
        let (client, store) = setup();
        client.push_aggregates(Ok(AggregatesResponse {
            results: Some(serde_json::json!({"unexpected": true})),
            ..AggregatesResponse::default()
        }));

        store.fetch_historical_data(None, None).await;

        assert_eq!(store.error(), Some(MarketDataError::NoData.to_string()));
        assert!(store.snapshot().historical_data.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_series() {
        let (client, store) = setup();
        client.push_aggregates(aggregates(&[1.1, 1.2]));
        client.push_aggregates(Err(MarketDataError::RateLimited));

        store.fetch_historical_data(None, None).await;
        store.fetch_historical_data(None, None).await;

        let state = store.snapshot();
        assert!(state.historical_data.is_empty());
        assert_eq!(state.error, Some(MarketDataError::RateLimited.to_string()));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_next_fetch_clears_previous_error() {
        let (client, store) = setup();
        client.push_aggregates(Err(MarketDataError::Network));
        client.push_aggregates(aggregates(&[1.1, 1.2]));

        store.fetch_historical_data(None, None).await;
        assert!(store.error().is_some());

        store.fetch_historical_data(None, None).await;
        assert_eq!(store.error(), None);
    }

    // ------------------------------------------------------------------------
    // Sélection
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_set_selected_pair_fetches_once() {
        let (client, store) = setup();
        client.push_aggregates(aggregates(&[180.0, 181.0]));

        store.set_selected_pair("GBP", "JPY").await;

        assert_eq!(store.selected_ticker(), "C:GBPJPY");
        let calls = client.aggregate_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].ticker, "C:GBPJPY");

        let state = store.snapshot();
        assert_eq!(state.historical_data.len(), 2);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_set_selected_pair_rejects_invalid_codes() {
        let (client, store) = setup();

        store.set_selected_pair("GB", "JPY").await;

        assert_eq!(store.selected_ticker(), "C:EURUSD");
        assert!(client.aggregate_calls().is_empty());
        assert!(store.error().unwrap().contains("Invalid currency pair"));
    }

    #[tokio::test]
    async fn test_set_timeframe_fetches_with_new_resolution() {
        let (client, store) = setup();
        client.push_aggregates(aggregates(&[1.0, 1.1]));

        store.set_timeframe(Timeframe::OneWeek).await;

        assert_eq!(store.snapshot().timeframe, Timeframe::OneWeek);
        let calls = client.aggregate_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].multiplier, 1);
        assert_eq!(calls[0].timespan, Timespan::Week);
    }

    #[test]
    fn test_select_timeframe_steps_from_latest_selection() {
        let (client, store) = setup();

        // Deux pressions rapides sur 'l' avant tout fetch
        store.select_timeframe(store.snapshot().timeframe.next());
        store.select_timeframe(store.snapshot().timeframe.next());

        assert_eq!(store.snapshot().timeframe, Timeframe::OneDay);
        assert!(client.aggregate_calls().is_empty());
    }

    #[tokio::test]
    async fn test_clear_error() {
        let (client, store) = setup();
        client.push_aggregates(Err(MarketDataError::Unauthorized));
        store.fetch_historical_data(None, None).await;
        assert!(store.error().is_some());

        store.clear_error();
        assert_eq!(store.error(), None);
    }

    // ------------------------------------------------------------------------
    // Chevauchement de fetchs
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let client = Arc::new(ScriptedClient::default());
        let store = Arc::new(MarketDataStore::new(client.clone()));

        // Premier fetch (lent) : bloqué jusqu'au notify
        let gate = Arc::new(Notify::new());
        client.push_gated_aggregates(aggregates(&[9.0, 9.5]), gate.clone());
        // Second fetch (rapide)
        client.push_aggregates(aggregates(&[1.1, 1.2]));

        let slow = tokio::spawn({
            let store = store.clone();
            async move { store.set_timeframe(Timeframe::OneHour).await }
        });
        wait_for_aggregate_calls(&client, 1).await;

        store.set_timeframe(Timeframe::OneDay).await;
        assert_eq!(store.current_price(), 1.2);
        // Le premier fetch est toujours en vol
        assert!(store.is_loading());

        gate.notify_one();
        slow.await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.current_price(), 1.2);
        assert_eq!(state.last_price, Some(1.2));
        assert_eq!(state.timeframe, Timeframe::OneDay);
        assert_eq!(state.error, None);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_clear_fresh_series() {
        let client = Arc::new(ScriptedClient::default());
        let store = Arc::new(MarketDataStore::new(client.clone()));

        let gate = Arc::new(Notify::new());
        client.push_gated_aggregates(Err(MarketDataError::Server { status: 503 }), gate.clone());
        client.push_aggregates(aggregates(&[1.1, 1.2]));

        let slow = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_historical_data(None, None).await }
        });
        wait_for_aggregate_calls(&client, 1).await;

        store.fetch_historical_data(None, None).await;
        gate.notify_one();
        slow.await.unwrap();

        let state = store.snapshot();
        assert_eq!(state.historical_data.len(), 2);
        assert_eq!(state.error, None);
        assert!(!state.loading);
    }

    // ------------------------------------------------------------------------
    // fetch_available_pairs
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_fetch_available_pairs_filters_forex() {
        let (client, store) = setup();
        client.push_tickers(tickers(vec![
            descriptor("C:EURUSD", Some(("EUR", "Euro")), Some(("USD", "United States Dollar"))),
            descriptor("X:BTCUSD", None, None),
            descriptor("C:GBPJPY", None, None),
        ]));

        store.fetch_available_pairs().await;

        let state = store.snapshot();
        assert_eq!(state.available_pairs.len(), 2);
        assert_eq!(state.available_pairs[0].ticker, "C:EURUSD");
        // Nom vide -> ticker
        assert_eq!(state.available_pairs[1].name, "C:GBPJPY");
        assert_eq!(state.unique_currencies(), vec!["EUR", "GBP", "JPY", "USD"]);
        assert!(!state.loading);
        assert_eq!(*client.ticker_calls.lock().unwrap(), vec![DEFAULT_TICKERS_LIMIT]);
    }

    #[tokio::test]
    async fn test_fetch_available_pairs_failure_keeps_catalog() {
        let (client, store) = setup();
        client.push_tickers(tickers(vec![descriptor("C:EURUSD", None, None)]));
        client.push_tickers(Err(MarketDataError::Server { status: 500 }));

        store.fetch_available_pairs().await;
        let before = store.snapshot().available_pairs;

        store.fetch_available_pairs().await;

        let state = store.snapshot();
        assert_eq!(state.available_pairs, before);
        assert_eq!(state.error, Some(MarketDataError::Server { status: 500 }.to_string()));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_fetch_available_pairs_without_results_keeps_catalog() {
        let (client, store) = setup();
        client.push_tickers(tickers(vec![descriptor("C:EURUSD", None, None)]));
        client.push_tickers(Ok(TickersResponse::default()));

        store.fetch_available_pairs().await;
        store.fetch_available_pairs().await;

        assert_eq!(store.snapshot().available_pairs.len(), 1);
        assert_eq!(store.error(), None);
    }

    #[tokio::test]
    async fn test_tickers_limit_is_forwarded() {
        let client = Arc::new(ScriptedClient::default());
        let store = MarketDataStore::with_tickers_limit(client.clone(), 25);

        store.fetch_available_pairs().await;

        assert_eq!(*client.ticker_calls.lock().unwrap(), vec![25]);
    }
}
