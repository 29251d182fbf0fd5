//! Debounced, cancellable address autocomplete.
//!
//! Each call to [`AddressAutocomplete::suggest`] takes a new generation
//! token. A query only reaches the resolver after the debounce delay and only
//! if no newer query arrived in the meantime; its results are dropped when a
//! newer query started while the search was in flight. Suggestions therefore
//! always belong to the latest text the dispatcher typed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tripdesk_domain::error::TripDeskError;
use tripdesk_domain::place::{PlaceSuggestion, ResolvedAddress};
use tripdesk_domain::wizard::WizardSession;

use crate::ports::AddressResolver;

/// Quiet period after the last keystroke before the resolver is queried.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
/// Shortest trimmed text worth a query.
pub const DEFAULT_MIN_CHARS: usize = 3;

/// Address suggestions for the origin and destination fields of one wizard.
pub struct AddressAutocomplete<A> {
    resolver: A,
    debounce: Duration,
    min_chars: usize,
    generation: AtomicU64,
}

impl<A: AddressResolver> AddressAutocomplete<A> {
    /// Create the service with [`DEFAULT_DEBOUNCE`] and [`DEFAULT_MIN_CHARS`].
    pub fn new(resolver: A) -> Self {
        Self::with_settings(resolver, DEFAULT_DEBOUNCE, DEFAULT_MIN_CHARS)
    }

    /// Create the service with an explicit debounce delay and minimum length.
    pub fn with_settings(resolver: A, debounce: Duration, min_chars: usize) -> Self {
        Self {
            resolver,
            debounce,
            min_chars,
            generation: AtomicU64::new(0),
        }
    }

    /// Suggestions for `text`.
    ///
    /// Text shorter than the minimum (after trimming) yields an empty list
    /// without querying. `Ok(None)` means the query was superseded by a
    /// newer one or by [`cancel`](Self::cancel).
    ///
    /// # Errors
    ///
    /// Returns the resolver's error for a query that was still current.
    #[tracing::instrument(skip(self))]
    pub async fn suggest(
        &self,
        text: &str,
    ) -> Result<Option<Vec<PlaceSuggestion>>, TripDeskError> {
        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.trim();
        if query.chars().count() < self.min_chars {
            return Ok(Some(Vec::new()));
        }

        tokio::time::sleep(self.debounce).await;
        if !self.is_current(token) {
            tracing::debug!("query superseded before search");
            return Ok(None);
        }

        let suggestions = self.resolver.search(query).await?;
        if !self.is_current(token) {
            tracing::debug!("query superseded during search");
            return Ok(None);
        }
        Ok(Some(suggestions))
    }

    /// Drop every query still waiting or in flight.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Close the wizard: discard the draft of `session` and every
    /// suggestion fetch still waiting or in flight.
    pub fn close_session(&self, session: &mut WizardSession) {
        self.cancel();
        session.close();
    }

    /// Resolve the suggestion the dispatcher picked.
    ///
    /// Pending queries are cancelled first so their late results cannot
    /// overwrite the selection.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn select(&self, place_id: &str) -> Result<ResolvedAddress, TripDeskError> {
        self.cancel();
        self.resolver.resolve(place_id).await
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use tripdesk_domain::error::NotFoundError;

    #[derive(Default)]
    struct RecordingResolver {
        queries: Mutex<Vec<String>>,
        latency: Duration,
    }

    impl RecordingResolver {
        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    impl AddressResolver for RecordingResolver {
        fn search(
            &self,
            text: &str,
        ) -> impl Future<Output = Result<Vec<PlaceSuggestion>, TripDeskError>> + Send {
            self.queries.lock().unwrap().push(text.to_string());
            let suggestion = PlaceSuggestion {
                place_id: format!("place:{text}"),
                main_text: text.to_string(),
                secondary_text: "Medellín, Antioquia".to_string(),
            };
            let latency = self.latency;
            async move {
                tokio::time::sleep(latency).await;
                Ok(vec![suggestion])
            }
        }

        fn resolve(
            &self,
            place_id: &str,
        ) -> impl Future<Output = Result<ResolvedAddress, TripDeskError>> + Send {
            let result = match place_id.strip_prefix("place:") {
                Some(text) => Ok(ResolvedAddress {
                    formatted_address: format!("{text}, Medellín, Antioquia"),
                    lat: 6.2442,
                    lng: -75.5812,
                }),
                None => Err(NotFoundError {
                    entity: "Place",
                    id: place_id.to_string(),
                }
                .into()),
            };
            async move { result }
        }
    }

    fn make_service(latency: Duration) -> AddressAutocomplete<RecordingResolver> {
        AddressAutocomplete::new(RecordingResolver {
            latency,
            ..Default::default()
        })
    }

    #[tokio::test(start_paused = true)]
    async fn should_return_empty_without_querying_when_text_is_short() {
        let svc = make_service(Duration::ZERO);

        let result = svc.suggest("  Ca ").await.unwrap();

        assert_eq!(result, Some(Vec::new()));
        assert!(svc.resolver.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_query_trimmed_text_after_debounce() {
        let svc = make_service(Duration::ZERO);

        let result = svc.suggest(" Calle 10 ").await.unwrap().unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].main_text, "Calle 10");
        assert_eq!(svc.resolver.queries(), vec!["Calle 10".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_only_query_latest_text_when_typing_fast() {
        let svc = make_service(Duration::ZERO);

        let (first, second, third) = tokio::join!(
            svc.suggest("Cal"),
            async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                svc.suggest("Call").await
            },
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                svc.suggest("Calle").await
            },
        );

        assert_eq!(first.unwrap(), None);
        assert_eq!(second.unwrap(), None);
        assert_eq!(third.unwrap().unwrap()[0].main_text, "Calle");
        assert_eq!(svc.resolver.queries(), vec!["Calle".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_drop_results_of_search_overtaken_in_flight() {
        let svc = make_service(Duration::from_millis(500));

        let (slow, fresh) = tokio::join!(svc.suggest("Carrera 43"), async {
            tokio::time::sleep(Duration::from_millis(400)).await;
            svc.suggest("Carrera 43A").await
        });

        assert_eq!(slow.unwrap(), None);
        assert_eq!(fresh.unwrap().unwrap()[0].main_text, "Carrera 43A");
        assert_eq!(svc.resolver.queries().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn should_discard_pending_query_when_cancelled() {
        let svc = make_service(Duration::ZERO);

        let (pending, ()) = tokio::join!(svc.suggest("Avenida Oriental"), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            svc.cancel();
        });

        assert_eq!(pending.unwrap(), None);
        assert!(svc.resolver.queries().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_drop_in_flight_suggestions_when_wizard_closed() {
        let svc = make_service(Duration::from_millis(500));
        let mut session = WizardSession::open_new();
        session
            .edit(|draft| draft.type_origin("Carrera 43"))
            .unwrap();

        let (late, ()) = tokio::join!(svc.suggest("Carrera 43"), async {
            tokio::time::sleep(Duration::from_millis(400)).await;
            svc.close_session(&mut session);
        });

        assert_eq!(late.unwrap(), None);
        assert_eq!(svc.resolver.queries(), vec!["Carrera 43".to_string()]);
        assert!(session.draft().origin_address.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_resolve_selected_suggestion() {
        let svc = make_service(Duration::ZERO);

        let resolved = svc.select("place:Calle 10").await.unwrap();

        assert_eq!(resolved.formatted_address, "Calle 10, Medellín, Antioquia");
        assert!((resolved.lat - 6.2442).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn should_propagate_resolver_error_on_select() {
        let svc = make_service(Duration::ZERO);
        let result = svc.select("unknown").await;
        assert!(matches!(result, Err(TripDeskError::NotFound(_))));
    }
}
