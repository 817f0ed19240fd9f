//! In-memory portal used by the pipeline unit tests

use crate::certificate::{render_fixture, Field};
use crate::config::DEFAULT_FIELD_PREFIX;
use crate::pipeline::Transport;
use crate::{Identifier, TransportError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) const STUB_BASE_URL: &str = "http://portal.test/detalles/";

/// Renders a complete certificate page with the given folio
pub(crate) fn certificate_page(folio: &str) -> String {
    render_fixture(
        DEFAULT_FIELD_PREFIX,
        &[
            (Field::InstitutionName, "PREPARATORIA FEDERAL LAZARO CARDENAS"),
            (Field::StudentName, "LUIS ALBERTO GOMEZ DIAZ"),
            (Field::WorkKey, "02DBH0001Z"),
            (Field::Rvoe, "SEMS-118"),
            (Field::Enrollment, "15004411"),
            (Field::GradeAverage, "8.7"),
            (Field::Period, "2015-2018"),
            (Field::CertificateType, "TERMINACION"),
            (Field::Folio, folio),
        ],
    )
}

/// A page without the institution node
pub(crate) fn empty_page() -> String {
    "<html><body><div>No se encontraron resultados</div></body></html>".to_string()
}

#[derive(Default)]
struct StubState {
    pages: HashMap<Identifier, String>,
    failures: HashMap<Identifier, (u32, TransportError)>,
    hanging: HashSet<Identifier>,
    panicking: HashSet<Identifier>,
    calls: HashMap<Identifier, u32>,
}

/// Transport serving pages from memory, keyed by the trailing identifier
#[derive(Clone, Default)]
pub(crate) struct PortalStub {
    state: Arc<Mutex<StubState>>,
    delay: Option<fn(Identifier) -> Duration>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl PortalStub {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `identifier` once any scripted failures are used up
    pub(crate) fn with_page(self, identifier: Identifier, body: String) -> Self {
        self.state.lock().unwrap().pages.insert(identifier, body);
        self
    }

    /// Fails the first `count` requests for `identifier`
    pub(crate) fn failing(self, identifier: Identifier, count: u32, error: TransportError) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(identifier, (count, error));
        self
    }

    /// Never answers requests for `identifier`
    pub(crate) fn hanging(self, identifier: Identifier) -> Self {
        self.state.lock().unwrap().hanging.insert(identifier);
        self
    }

    /// Panics while serving `identifier`
    pub(crate) fn panicking(self, identifier: Identifier) -> Self {
        self.state.lock().unwrap().panicking.insert(identifier);
        self
    }

    /// Delays each response by `delay(identifier)`
    pub(crate) fn with_delay(mut self, delay: fn(Identifier) -> Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self, identifier: Identifier) -> u32 {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(&identifier)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> u32 {
        self.state.lock().unwrap().calls.values().sum()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn serve(&self, identifier: Identifier) -> Result<String, TransportError> {
        let (hang, panic, result) = {
            let mut state = self.state.lock().unwrap();
            *state.calls.entry(identifier).or_insert(0) += 1;

            let scripted_failure = match state.failures.get_mut(&identifier) {
                Some((remaining, error)) if *remaining > 0 => {
                    *remaining -= 1;
                    Some(error.clone())
                }
                _ => None,
            };

            let result = match scripted_failure {
                Some(error) => Err(error),
                None => Ok(state
                    .pages
                    .get(&identifier)
                    .cloned()
                    .unwrap_or_else(empty_page)),
            };

            (
                state.hanging.contains(&identifier),
                state.panicking.contains(&identifier),
                result,
            )
        };

        if panic {
            panic!("stub transport panicked on {}", identifier);
        }

        if hang {
            std::future::pending::<()>().await;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay(identifier)).await;
        }

        result
    }
}

#[async_trait]
impl Transport for PortalStub {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let identifier: Identifier = url
            .strip_prefix(STUB_BASE_URL)
            .and_then(|rest| rest.parse().ok())
            .ok_or_else(|| TransportError::Request(format!("unexpected url {}", url)))?;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let result = self.serve(identifier).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
