use std::sync::Arc;

use axum::routing::{get, patch};
use axum::{Extension, Router};
use users_directory_sdk::UsersDirectoryApi;

use super::handlers;
use crate::infra::events::BroadcastEventPublisher;

/// Prefix every users-directory route is mounted under.
pub const BASE_PATH: &str = "/users-directory/v1";

/// Build the REST router. The static `/users/events` segment takes
/// precedence over `/users/{id}`.
pub fn router(client: Arc<dyn UsersDirectoryApi>, events: BroadcastEventPublisher) -> Router {
    let users = Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/events", get(handlers::user_events))
        .route(
            "/users/{id}",
            patch(handlers::update_user).delete(handlers::delete_user),
        )
        .layer(Extension(client))
        .layer(Extension(events));

    Router::new().nest(BASE_PATH, users)
}
