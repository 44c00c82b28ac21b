use std::convert::Infallible;
use std::sync::Arc;

use axum::Extension;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query};
use axum::http::{StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use tokio_stream::{Stream, StreamExt as _};
use tracing::{field::Empty, info};
use users_directory_sdk::{UpdateUserRequest, UsersDirectoryApi, UsersDirectoryError};
use uuid::Uuid;

use super::dto::{
    CreateUserReq, ListUsersQuery, UpdateUserReq, UserDto, UserEventDto, UsersPageDto,
};
use super::error::{ApiError, ApiResult};
use super::routes::BASE_PATH;
use crate::infra::events::BroadcastEventPublisher;

type Client = Arc<dyn UsersDirectoryApi>;

fn invalid(detail: impl std::fmt::Display, uri: &OriginalUri) -> ApiError {
    ApiError::from(UsersDirectoryError::invalid_argument(detail.to_string())).at(uri.path())
}

fn parse_id(raw: &str, uri: &OriginalUri) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| invalid(format!("malformed user id '{raw}'"), uri))
}

/// Create a new user
#[tracing::instrument(name = "users_directory.create_user", skip_all, fields(request_id = Empty))]
pub async fn create_user(
    Extension(client): Extension<Client>,
    uri: OriginalUri,
    body: Result<Json<CreateUserReq>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(req) = body.map_err(|e| invalid(e.body_text(), &uri))?;
    info!(nickname = %req.nickname, "Creating user");

    let user = client
        .create_user(req.into())
        .await
        .map_err(|e| ApiError::from(e).at(uri.path()))?;
    let location = format!("{BASE_PATH}/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserDto::from(user)),
    )
        .into_response())
}

/// Partially update a user; only masked fields change
#[tracing::instrument(
    name = "users_directory.update_user",
    skip_all,
    fields(user.id = %id, request_id = Empty)
)]
pub async fn update_user(
    Extension(client): Extension<Client>,
    uri: OriginalUri,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserReq>, JsonRejection>,
) -> ApiResult<Json<UserDto>> {
    let id = parse_id(&id, &uri)?;
    let Json(req) = body.map_err(|e| invalid(e.body_text(), &uri))?;
    info!(mask = ?req.update_mask, "Updating user");

    let user = client
        .update_user(UpdateUserRequest {
            id,
            update: req.into(),
        })
        .await
        .map_err(|e| ApiError::from(e).at(uri.path()))?;
    Ok(Json(UserDto::from(user)))
}

/// Delete a user by ID
#[tracing::instrument(
    name = "users_directory.delete_user",
    skip_all,
    fields(user.id = %id, request_id = Empty)
)]
pub async fn delete_user(
    Extension(client): Extension<Client>,
    uri: OriginalUri,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, &uri)?;
    info!("Deleting user");

    client
        .delete_user(id)
        .await
        .map_err(|e| ApiError::from(e).at(uri.path()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// List users page by page
#[tracing::instrument(name = "users_directory.list_users", skip_all, fields(request_id = Empty))]
pub async fn list_users(
    Extension(client): Extension<Client>,
    uri: OriginalUri,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> ApiResult<Json<UsersPageDto>> {
    let Query(query) = query.map_err(|e| invalid(e.body_text(), &uri))?;
    info!(
        page_size = query.page_size,
        continued = query.page_token.is_some(),
        "Listing users"
    );

    let page = client
        .list_users(query.into())
        .await
        .map_err(|e| ApiError::from(e).at(uri.path()))?;
    Ok(Json(UsersPageDto::from(page)))
}

/// SSE endpoint returning a live stream of user lifecycle events.
#[tracing::instrument(name = "users_directory.user_events", skip_all, fields(request_id = Empty))]
pub async fn user_events(
    Extension(events): Extension<BroadcastEventPublisher>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE connection for user events");
    let stream = events.subscribe_stream().filter_map(|event| {
        let dto = UserEventDto::from(&event);
        match Event::default().event(event.kind.as_str()).json_data(&dto) {
            Ok(frame) => Some(Ok::<_, Infallible>(frame)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode user event");
                None
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
