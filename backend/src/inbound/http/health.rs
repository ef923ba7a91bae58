//! Process lifecycle endpoints.
//!
//! The service moves through [`Phase::Starting`], [`Phase::Serving`] and
//! [`Phase::Draining`], in that order only. `/health/ready` answers 200 while
//! serving; `/health/live` answers 200 until draining begins. Both bodies
//! carry the current phase and are never cached.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

/// Lifecycle phase reported by the health endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    /// Listener not bound yet.
    Starting = 0,
    /// Accepting user requests.
    Serving = 1,
    /// Shutting down.
    Draining = 2,
}

impl Phase {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Serving,
            _ => Self::Draining,
        }
    }
}

/// Body returned by both health endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthReport {
    /// Phase observed when the request was handled.
    pub status: Phase,
}

/// Shared lifecycle phase.
#[derive(Debug)]
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            phase: AtomicU8::new(Phase::Starting as u8),
        }
    }
}

impl HealthState {
    /// Start in [`Phase::Starting`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        Phase::from_raw(self.phase.load(Ordering::Acquire))
    }

    /// Move from starting to serving. Has no effect once draining.
    pub fn mark_serving(&self) {
        let moved = self
            .phase
            .compare_exchange(
                Phase::Starting as u8,
                Phase::Serving as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if moved {
            info!("serving requests");
        }
    }

    /// Enter the terminal draining phase.
    pub fn mark_draining(&self) {
        let previous = Phase::from_raw(self.phase.swap(Phase::Draining as u8, Ordering::AcqRel));
        if previous != Phase::Draining {
            info!(?previous, "draining");
        }
    }

    /// Whether user requests are being served.
    pub fn is_ready(&self) -> bool {
        self.phase() == Phase::Serving
    }

    /// Whether draining has not begun.
    pub fn is_alive(&self) -> bool {
        self.phase() != Phase::Draining
    }

    fn report(&self, healthy: bool) -> HttpResponse {
        let mut response = if healthy {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(HealthReport {
                status: self.phase(),
            })
    }
}

/// Ready once the listener is bound, until draining.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Serving user requests", body = HealthReport),
        (status = 503, description = "Starting or draining", body = HealthReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.report(state.is_ready())
}

/// Alive until draining begins.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is alive", body = HealthReport),
        (status = 503, description = "Process is draining", body = HealthReport)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.report(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::App;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    struct Observed {
        status: StatusCode,
        cache_control: Option<String>,
        body: Value,
    }

    async fn fetch(state: web::Data<HealthState>, uri: &str) -> Observed {
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(ready)
                .service(live),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;
        let status = res.status();
        let cache_control = res
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = actix_test::read_body_json(res).await;
        Observed {
            status,
            cache_control,
            body,
        }
    }

    #[rstest]
    fn phases_only_move_forward() {
        let state = HealthState::new();
        assert_eq!(state.phase(), Phase::Starting);

        state.mark_serving();
        assert_eq!(state.phase(), Phase::Serving);

        state.mark_draining();
        state.mark_serving();
        assert_eq!(state.phase(), Phase::Draining);
    }

    #[rstest]
    #[case(Phase::Starting, StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case(Phase::Serving, StatusCode::OK, StatusCode::OK)]
    #[case(Phase::Draining, StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn endpoints_follow_the_phase(
        #[case] phase: Phase,
        #[case] readiness: StatusCode,
        #[case] liveness: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        match phase {
            Phase::Starting => {}
            Phase::Serving => state.mark_serving(),
            Phase::Draining => state.mark_draining(),
        }

        let ready_res = fetch(state.clone(), "/health/ready").await;
        let live_res = fetch(state, "/health/live").await;

        assert_eq!(ready_res.status, readiness);
        assert_eq!(live_res.status, liveness);
        let expected = json!({ "status": phase });
        assert_eq!(ready_res.body, expected);
        assert_eq!(live_res.body, expected);
    }

    #[rstest]
    #[case("/health/ready")]
    #[case("/health/live")]
    #[actix_web::test]
    async fn reports_are_not_cached(#[case] uri: &str) {
        let observed = fetch(web::Data::new(HealthState::new()), uri).await;
        assert_eq!(observed.cache_control.as_deref(), Some("no-store"));
    }
}
