//! Dashboard sessions
//!
//! A session owns one settings slot and one published result. Every change
//! to a derivation input issues a new request ticket and starts a delayed
//! derivation; when it completes, the result is published only if its ticket
//! is still the latest. Results computed from superseded settings are
//! dropped.
//!
//! Sessions nobody has touched for the configured idle timeout are ended by
//! the store, which discards their settings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use shared::{Derivation, DisplaySettings, PricePoint, RequestSequencer, RequestTicket};

use crate::error::{AppError, AppResult};
use crate::services::PredictionService;

/// Result visible to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct PublishedPrediction {
    pub ticket: RequestTicket,
    /// Settings the points were derived from
    pub settings: DisplaySettings,
    pub points: Vec<PricePoint>,
    pub derived_at: DateTime<Utc>,
}

/// Point-in-time copy of a session
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub settings: DisplaySettings,
    pub published: Option<PublishedPrediction>,
    /// A derivation for the current settings has not been published yet
    pub pending: bool,
}

/// Handle on a started derivation; resolves to whether it was published
pub struct DerivationHandle {
    pub ticket: RequestTicket,
    pub task: JoinHandle<bool>,
}

#[derive(Debug)]
struct SessionState {
    settings: DisplaySettings,
    sequencer: RequestSequencer,
    published: Option<PublishedPrediction>,
    last_seen: Instant,
}

pub struct DashboardSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    state: Mutex<SessionState>,
}

impl DashboardSession {
    pub fn new(settings: DisplaySettings) -> Arc<Self> {
        Arc::new(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state: Mutex::new(SessionState {
                settings,
                sequencer: RequestSequencer::new(),
                published: None,
                last_seen: Instant::now(),
            }),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Mark the session as in use
    pub async fn touch(&self) {
        self.state.lock().await.last_seen = Instant::now();
    }

    async fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.state.lock().await.last_seen)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        let pending = match (state.sequencer.latest(), &state.published) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(latest), Some(published)) => published.ticket != latest,
        };

        SessionSnapshot {
            id: self.id,
            created_at: self.created_at,
            settings: state.settings,
            published: state.published.clone(),
            pending,
        }
    }

    /// Replace the settings slot with `update(current)`.
    ///
    /// Starts a derivation when a derivation input changed; presentation-only
    /// changes just replace the settings.
    pub async fn update_settings<F>(
        self: &Arc<Self>,
        service: &PredictionService,
        update: F,
    ) -> (DisplaySettings, Option<DerivationHandle>)
    where
        F: FnOnce(&DisplaySettings) -> DisplaySettings,
    {
        let mut state = self.state.lock().await;
        state.last_seen = Instant::now();
        let next = update(&state.settings);
        let rederive = state.settings.requires_rederive(&next);
        state.settings = next;

        if !rederive {
            tracing::debug!(session = %self.id, "Presentation settings updated");
            return (next, None);
        }

        let ticket = state.sequencer.issue();
        drop(state);

        (next, Some(self.spawn_derivation(service, ticket, next)))
    }

    /// Re-derive for the current settings
    pub async fn refresh(self: &Arc<Self>, service: &PredictionService) -> DerivationHandle {
        let mut state = self.state.lock().await;
        state.last_seen = Instant::now();
        let ticket = state.sequencer.issue();
        let settings = state.settings;
        drop(state);

        self.spawn_derivation(service, ticket, settings)
    }

    fn spawn_derivation(
        self: &Arc<Self>,
        service: &PredictionService,
        ticket: RequestTicket,
        settings: DisplaySettings,
    ) -> DerivationHandle {
        tracing::debug!(
            session = %self.id,
            %ticket,
            crop = %settings.selected_crop,
            timeframe = %settings.selected_timeframe,
            "Derivation requested"
        );

        let session = Arc::clone(self);
        let service = service.clone();
        let task = tokio::spawn(async move {
            let derivation = service.derive_delayed(settings).await;
            session.publish(ticket, settings, derivation).await
        });

        DerivationHandle { ticket, task }
    }

    /// Publish a result unless a newer request has been issued since
    async fn publish(
        &self,
        ticket: RequestTicket,
        settings: DisplaySettings,
        derivation: Derivation,
    ) -> bool {
        let mut state = self.state.lock().await;
        if !state.sequencer.is_current(ticket) {
            tracing::debug!(
                session = %self.id,
                %ticket,
                latest = ?state.sequencer.latest(),
                "Discarding stale derivation"
            );
            return false;
        }

        tracing::info!(
            session = %self.id,
            %ticket,
            points = derivation.points.len(),
            "Derivation published"
        );
        state.published = Some(PublishedPrediction {
            ticket,
            settings,
            points: derivation.points,
            derived_at: Utc::now(),
        });
        true
    }
}

type SessionMap = HashMap<Uuid, Arc<DashboardSession>>;

/// Open dashboard sessions keyed by id
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<SessionMap>>,
    max_sessions: usize,
    /// `None` keeps idle sessions open
    idle_timeout: Option<Duration>,
}

impl SessionStore {
    pub fn new(max_sessions: usize, idle_timeout: Option<Duration>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_sessions,
            idle_timeout,
        }
    }

    /// Open a session with the given settings and start its first derivation
    pub async fn create(
        &self,
        service: &PredictionService,
        settings: DisplaySettings,
    ) -> AppResult<(Arc<DashboardSession>, DerivationHandle)> {
        let session = {
            let mut sessions = self.sessions.write().await;
            if sessions.len() >= self.max_sessions {
                self.evict_idle_in(&mut sessions).await;
            }
            if sessions.len() >= self.max_sessions {
                return Err(AppError::SessionLimitReached(self.max_sessions));
            }
            let session = DashboardSession::new(settings);
            sessions.insert(session.id(), Arc::clone(&session));
            session
        };

        tracing::info!(session = %session.id(), "Session started");
        let handle = session.refresh(service).await;
        Ok((session, handle))
    }

    /// Look up a session and mark it as in use
    pub async fn get(&self, id: Uuid) -> AppResult<Arc<DashboardSession>> {
        let session = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Session".to_string()))?;
        session.touch().await;
        Ok(session)
    }

    /// End a session, discarding its settings
    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(AppError::NotFound("Session".to_string()));
        }
        tracing::info!(session = %id, "Session ended");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// End every session idle for at least the idle timeout
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.evict_idle_in(&mut sessions).await
    }

    async fn evict_idle_in(&self, sessions: &mut SessionMap) -> usize {
        let Some(timeout) = self.idle_timeout else {
            return 0;
        };

        let now = Instant::now();
        let mut expired = Vec::new();
        for (id, session) in sessions.iter() {
            if session.idle_for(now).await >= timeout {
                expired.push(*id);
            }
        }

        for id in &expired {
            sessions.remove(id);
            tracing::info!(session = %id, idle_timeout = ?timeout, "Idle session ended");
        }
        expired.len()
    }

    /// Periodically end idle sessions; `None` when idle sessions are kept
    pub fn spawn_idle_sweep(&self) -> Option<JoinHandle<()>> {
        let timeout = self.idle_timeout?;
        let store = self.clone();

        Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(timeout).await;
                let evicted = store.evict_idle().await;
                if evicted > 0 {
                    let remaining = store.len().await;
                    tracing::debug!(evicted, remaining, "Idle sweep finished");
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Crop, Timeframe};
    use std::time::Duration;

    fn service() -> PredictionService {
        PredictionService::new(
            Arc::new(shared::mock::reference_data()),
            Duration::from_millis(1000),
        )
    }

    fn prices(points: &[PricePoint]) -> Vec<f64> {
        points.iter().map(|p| p.price).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_published_after_latency() {
        let service = service();
        let session = DashboardSession::new(DisplaySettings::default());

        let handle = session.refresh(&service).await;
        let snapshot = session.snapshot().await;
        assert!(snapshot.pending);
        assert!(snapshot.published.is_none());

        assert!(handle.task.await.unwrap());
        let snapshot = session.snapshot().await;
        assert!(!snapshot.pending);
        let published = snapshot.published.unwrap();
        assert_eq!(published.ticket, handle.ticket);
        assert_eq!(published.points.len(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_is_discarded() {
        let service = service();
        let session = DashboardSession::new(DisplaySettings::default());

        let (_, first) = session
            .update_settings(&service, |s| DisplaySettings {
                selected_timeframe: Timeframe::ThreeMonths,
                ..*s
            })
            .await;
        let (_, second) = session
            .update_settings(&service, |s| DisplaySettings {
                selected_timeframe: Timeframe::OneMonth,
                weather_impact_enabled: false,
                ..*s
            })
            .await;

        let first = first.unwrap();
        let second = second.unwrap();
        assert!(second.ticket > first.ticket);

        assert!(!first.task.await.unwrap());
        assert!(second.task.await.unwrap());

        let published = session.snapshot().await.published.unwrap();
        assert_eq!(published.ticket, second.ticket);
        assert_eq!(published.settings.selected_timeframe, Timeframe::OneMonth);
        assert_eq!(prices(&published.points), vec![220.0, 225.0, 230.0, 228.0, 235.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_stale_result_cannot_overwrite() {
        let service = service();
        let session = DashboardSession::new(DisplaySettings::default());

        let older = session.refresh(&service).await;
        let fresh = session.refresh(&service).await;
        assert!(fresh.task.await.unwrap());
        assert!(!older.task.await.unwrap());

        // Replay of the older request arriving after the fresh result
        let replayed = session
            .publish(older.ticket, DisplaySettings::default(), Derivation::default())
            .await;
        assert!(!replayed);

        let published = session.snapshot().await.published.unwrap();
        assert_eq!(published.ticket, fresh.ticket);
        assert_eq!(published.points.len(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_presentation_toggle_does_not_rederive() {
        let service = service();
        let session = DashboardSession::new(DisplaySettings::default());

        let (settings, handle) = session
            .update_settings(&service, |s| DisplaySettings {
                show_confidence_interval: true,
                news_alerts_enabled: false,
                ..*s
            })
            .await;

        assert!(handle.is_none());
        assert!(settings.show_confidence_interval);
        assert!(!session.snapshot().await.pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unpopulated_crop_publishes_empty_result() {
        let service = service();
        let session = DashboardSession::new(DisplaySettings::default());

        let (_, handle) = session
            .update_settings(&service, |s| DisplaySettings {
                selected_crop: Crop::Soybeans,
                ..*s
            })
            .await;
        assert!(handle.unwrap().task.await.unwrap());

        let published = session.snapshot().await.published.unwrap();
        assert!(published.points.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_lifecycle() {
        let service = service();
        let store = SessionStore::new(1, None);

        let (session, handle) = store.create(&service, DisplaySettings::default()).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(handle.task.await.unwrap());

        assert!(matches!(
            store.create(&service, DisplaySettings::default()).await,
            Err(AppError::SessionLimitReached(1))
        ));

        assert_eq!(store.get(session.id()).await.unwrap().id(), session.id());
        store.remove(session.id()).await.unwrap();
        assert!(matches!(store.get(session.id()).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove(session.id()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_frees_its_slot() {
        let service = service();
        let store = SessionStore::new(1, Some(Duration::from_secs(60)));

        let (abandoned, _) = store.create(&service, DisplaySettings::default()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(matches!(
            store.create(&service, DisplaySettings::default()).await,
            Err(AppError::SessionLimitReached(1))
        ));

        tokio::time::sleep(Duration::from_secs(31)).await;
        let (fresh, _) = store.create(&service, DisplaySettings::default()).await.unwrap();
        assert_ne!(fresh.id(), abandoned.id());
        assert_eq!(store.len().await, 1);
        assert!(matches!(store.get(abandoned.id()).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_session_is_kept() {
        let service = service();
        let store = SessionStore::new(10, Some(Duration::from_secs(60)));
        let (session, _) = store.create(&service, DisplaySettings::default()).await.unwrap();

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_secs(40)).await;
            store.get(session.id()).await.unwrap();
        }
        assert_eq!(store.evict_idle().await, 0);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.evict_idle().await, 1);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sweep_runs_in_background() {
        let store = SessionStore::new(10, Some(Duration::from_secs(60)));
        store.create(&service(), DisplaySettings::default()).await.unwrap();

        let sweep = store.spawn_idle_sweep().unwrap();
        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(store.len().await, 0);
        sweep.abort();

        assert!(SessionStore::new(10, None).spawn_idle_sweep().is_none());
    }
}
