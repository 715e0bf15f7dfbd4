//! API route handlers for the gateway.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use ruleta_core::{DrawOutcome, HistoryEntry, Person};
use std::sync::Arc;

use super::error::ApiError;
use super::server::AppState;

fn success() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "success" }))
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "ruleta",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// List the current roster.
pub async fn list_participants(State(state): State<Arc<AppState>>) -> Json<Vec<Person>> {
    Json(state.participants.list())
}

/// Append a participant. The body must be `{ "name": string, "email"?: string | null }`.
pub async fn add_participant(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Person>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let Json(person) = payload?;
    let person = state.participants.append(person)?;
    Ok(Json(person))
}

/// Remove every participant with this name. Unknown names are a no-op.
pub async fn delete_participant(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.participants.remove_by_name(&name)?;
    Ok(success())
}

/// Assignment history, newest first.
pub async fn list_history(State(state): State<Arc<AppState>>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.list())
}

pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.history.clear()?;
    Ok(success())
}

/// Spin the roulette.
pub async fn spin(State(state): State<Arc<AppState>>) -> Result<Json<DrawOutcome>, ApiError> {
    let outcome = state.engine.draw()?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ruleta_core::RuletaConfig;
    use ruleta_core::RuletaError;

    struct TestState {
        state: Arc<AppState>,
        dir: std::path::PathBuf,
    }

    impl Drop for TestState {
        fn drop(&mut self) {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }

    fn test_state() -> TestState {
        let dir = std::env::temp_dir().join(format!("ruleta-test-routes-{}", uuid::Uuid::new_v4()));
        let mut config = RuletaConfig::default();
        config.storage.data_dir = dir.to_string_lossy().into_owned();
        let state = Arc::new(AppState::new(Arc::new(config)).unwrap());
        TestState { state, dir }
    }

    fn add(t: &TestState, name: &str, email: Option<&str>) {
        t.state
            .participants
            .append(Person::new(name, email.map(String::from)))
            .unwrap();
    }

    #[tokio::test]
    async fn test_health_check() {
        let t = test_state();
        let json = health_check(State(t.state.clone())).await.0;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "ruleta");
    }

    #[tokio::test]
    async fn test_add_and_list_participants() {
        let t = test_state();
        let created = add_participant(
            State(t.state.clone()),
            Ok(Json(Person::new("Ana", Some("ana@example.com".into())))),
        )
        .await
        .unwrap();
        assert_eq!(created.0.name, "Ana");

        let list = list_participants(State(t.state.clone())).await.0;
        assert_eq!(list, vec![Person::new("Ana", Some("ana@example.com".into()))]);
    }

    #[tokio::test]
    async fn test_delete_participant() {
        let t = test_state();
        add(&t, "Ana", None);
        add(&t, "Bruno", None);
        add(&t, "Ana", None);

        let json = delete_participant(State(t.state.clone()), Path("Ana".into()))
            .await
            .unwrap()
            .0;
        assert_eq!(json["status"], "success");
        assert_eq!(t.state.participants.list(), vec![Person::new("Bruno", None)]);

        // Unknown name still succeeds.
        assert!(
            delete_participant(State(t.state.clone()), Path("Nadie".into()))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_spin_and_history() {
        let t = test_state();
        add(&t, "Ana", None);
        add(&t, "Bruno", None);

        let outcome = spin(State(t.state.clone())).await.unwrap().0;
        assert_eq!(outcome.participants_left, 1);
        assert!(outcome.week.starts_with("Semana "));

        let history = list_history(State(t.state.clone())).await.0;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, outcome.selected_person.name);
        assert_eq!(history[0].date, outcome.date);

        let json = clear_history(State(t.state.clone())).await.unwrap().0;
        assert_eq!(json["status"], "success");
        assert!(list_history(State(t.state.clone())).await.0.is_empty());
    }

    #[tokio::test]
    async fn test_spin_empty_roster() {
        let t = test_state();
        let err = spin(State(t.state.clone())).await.unwrap_err();
        assert!(matches!(err, ApiError::Domain(RuletaError::NoParticipants)));
    }
}
