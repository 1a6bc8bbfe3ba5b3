//! Fetches per-day predictions for a date range.
//!
//! Each call to [`FetchOrchestrator::fetch_range`] takes a new generation.
//! Starting a newer call cancels the outstanding requests of the previous
//! one, which then returns [`FetchError::Superseded`] without touching the
//! known-failed set or the committed results.

use crate::core::cache::KnownFailedSet;
use crate::core::calendar::{DateRange, enumerate};
use crate::core::error::{FetchError, ProviderError};
use crate::core::prediction::{FetchOutcome, PredictionKey, PredictionProvider};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tracing::debug;

/// Outcomes of the most recent fetch that ran to completion.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSnapshot {
    pub range: DateRange,
    pub room_type_id: String,
    pub outcomes: Vec<FetchOutcome>,
}

pub struct FetchOrchestrator {
    provider: Arc<dyn PredictionProvider>,
    known_failed: KnownFailedSet,
    max_concurrency: usize,
    generation: watch::Sender<u64>,
    latest: Mutex<Option<RangeSnapshot>>,
}

impl FetchOrchestrator {
    pub fn new(provider: Arc<dyn PredictionProvider>, max_concurrency: usize) -> Self {
        Self::with_known_failed(provider, KnownFailedSet::new(), max_concurrency)
    }

    /// Uses an explicitly shared known-failed set instead of a private one.
    pub fn with_known_failed(
        provider: Arc<dyn PredictionProvider>,
        known_failed: KnownFailedSet,
        max_concurrency: usize,
    ) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            provider,
            known_failed,
            max_concurrency: max_concurrency.max(1),
            generation,
            latest: Mutex::new(None),
        }
    }

    pub fn known_failed(&self) -> &KnownFailedSet {
        &self.known_failed
    }

    pub async fn latest(&self) -> Option<RangeSnapshot> {
        self.latest.lock().await.clone()
    }

    pub async fn fetch_range(
        &self,
        range: &DateRange,
        room_type_id: &str,
    ) -> Result<Vec<FetchOutcome>, FetchError> {
        self.fetch_range_with_progress(range, room_type_id, &|| {})
            .await
    }

    /// Like [`Self::fetch_range`], calling `on_progress` once per finished day.
    pub async fn fetch_range_with_progress(
        &self,
        range: &DateRange,
        room_type_id: &str,
        on_progress: &(dyn Fn() + Send + Sync),
    ) -> Result<Vec<FetchOutcome>, FetchError> {
        let days = enumerate(range)?;
        let mut generation_rx = self.generation.subscribe();
        let token = self.next_generation();
        debug!(token, days = days.len(), room_type = room_type_id, "Fetching range");

        let superseded = async {
            loop {
                if generation_rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
                if *generation_rx.borrow_and_update() != token {
                    break;
                }
            }
        };

        let fetches = stream::iter(days)
            .map(|date| async move {
                let outcome = self.fetch_day(date, room_type_id, token).await;
                on_progress();
                outcome
            })
            .buffered(self.max_concurrency)
            .collect::<Vec<_>>();

        let outcomes = tokio::select! {
            outcomes = fetches => outcomes,
            _ = superseded => {
                debug!(token, "Range fetch superseded, dropping in-flight requests");
                return Err(FetchError::Superseded);
            }
        };

        let mut latest = self.latest.lock().await;
        if !self.is_current(token) {
            debug!(token, "Range fetch superseded before commit");
            return Err(FetchError::Superseded);
        }
        *latest = Some(RangeSnapshot {
            range: *range,
            room_type_id: room_type_id.to_string(),
            outcomes: outcomes.clone(),
        });
        Ok(outcomes)
    }

    fn next_generation(&self) -> u64 {
        let mut token = 0;
        self.generation.send_modify(|current| {
            *current += 1;
            token = *current;
        });
        token
    }

    fn is_current(&self, token: u64) -> bool {
        *self.generation.borrow() == token
    }

    async fn fetch_day(&self, date: NaiveDate, room_type_id: &str, token: u64) -> FetchOutcome {
        let key = PredictionKey::new(date, room_type_id);
        if self.known_failed.contains(&key).await {
            debug!(%date, room_type = room_type_id, "Skipping known-failed day");
            return FetchOutcome::NotFound(date);
        }

        match self.provider.fetch_prediction(date, room_type_id).await {
            Ok(point) => FetchOutcome::Success(point),
            Err(ProviderError::NotFound) => {
                self.known_failed
                    .insert_if(key, || self.is_current(token))
                    .await;
                FetchOutcome::NotFound(date)
            }
            Err(ProviderError::Transient(reason)) => {
                debug!(%date, room_type = room_type_id, %reason, "Dropping day after failed fetch");
                FetchOutcome::TransientError { date, reason }
            }
        }
    }
}
