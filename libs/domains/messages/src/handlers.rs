//! HTTP handlers for the Messages API
//!
//! `POST /` is the public contact form. Every other route requires a bearer
//! token.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, JsonBody, JwtAuth, PageQuery, UuidPath,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::MessageResult;
use crate::models::{
    CreateMessage, Message, MessageFilter, MessagePage, MessagePriority, MessageStatus,
    ReplyMessage, StatusCounts, UpdatePriority,
};
use crate::repository::MessageRepository;
use crate::service::{MessageService, MESSAGE_PAGE_SIZE};

#[derive(OpenApi)]
#[openapi(
    paths(
        create_message,
        list_messages,
        get_message,
        mark_read,
        reply_message,
        archive_message,
        update_priority,
        delete_message,
    ),
    components(
        schemas(
            Message,
            CreateMessage,
            ReplyMessage,
            UpdatePriority,
            MessageStatus,
            MessagePriority,
            MessagePage,
            StatusCounts
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Messages", description = "Contact form and support inbox")
    )
)]
pub struct ApiDoc;

type Service<R> = State<Arc<MessageService<R>>>;

pub fn router<R>(service: MessageService<R>, auth: JwtAuth) -> Router
where
    R: MessageRepository + 'static,
{
    let require_auth = middleware::from_fn_with_state(auth, jwt_auth_middleware);

    Router::new()
        .route(
            "/",
            post(create_message).merge(get(list_messages).route_layer(require_auth.clone())),
        )
        .route(
            "/{id}",
            get(get_message)
                .delete(delete_message)
                .route_layer(require_auth.clone()),
        )
        .route("/{id}/read", put(mark_read).route_layer(require_auth.clone()))
        .route("/{id}/reply", put(reply_message).route_layer(require_auth.clone()))
        .route("/{id}/archive", put(archive_message).route_layer(require_auth.clone()))
        .route("/{id}/priority", put(update_priority).route_layer(require_auth))
        .with_state(Arc::new(service))
}

/// Submit the contact form
///
/// Text fields are trimmed and the email lowercased before validation.
#[utoipa::path(
    post,
    path = "",
    tag = "Messages",
    request_body = CreateMessage,
    responses(
        (status = 201, description = "Message received", body = Message),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_message<R: MessageRepository>(
    State(service): Service<R>,
    JsonBody(input): JsonBody<CreateMessage>,
) -> MessageResult<impl IntoResponse> {
    let message = service.create_message(input).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Inbox, newest first, with counts per status
#[utoipa::path(
    get,
    path = "",
    tag = "Messages",
    params(MessageFilter, PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Page of messages", body = MessagePage),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_messages<R: MessageRepository>(
    State(service): Service<R>,
    Query(filter): Query<MessageFilter>,
    Query(page): Query<PageQuery>,
) -> MessageResult<Json<MessagePage>> {
    let messages = service
        .list_messages(filter, page.resolve(MESSAGE_PAGE_SIZE))
        .await?;
    Ok(Json(messages))
}

/// Get a message; a `new` message becomes `read`
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Messages",
    params(("id" = Uuid, Path, description = "Message id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message found", body = Message),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_message<R: MessageRepository>(
    State(service): Service<R>,
    UuidPath(id): UuidPath,
) -> MessageResult<Json<Message>> {
    Ok(Json(service.get_message(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}/read",
    tag = "Messages",
    params(("id" = Uuid, Path, description = "Message id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message marked read", body = Message),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn mark_read<R: MessageRepository>(
    State(service): Service<R>,
    UuidPath(id): UuidPath,
) -> MessageResult<Json<Message>> {
    Ok(Json(service.mark_read(id).await?))
}

/// Mark replied, optionally replacing the internal notes
#[utoipa::path(
    put,
    path = "/{id}/reply",
    tag = "Messages",
    params(("id" = Uuid, Path, description = "Message id")),
    request_body = ReplyMessage,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message marked replied", body = Message),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn reply_message<R: MessageRepository>(
    State(service): Service<R>,
    UuidPath(id): UuidPath,
    JsonBody(input): JsonBody<ReplyMessage>,
) -> MessageResult<Json<Message>> {
    Ok(Json(service.reply(id, input).await?))
}

#[utoipa::path(
    put,
    path = "/{id}/archive",
    tag = "Messages",
    params(("id" = Uuid, Path, description = "Message id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Message archived", body = Message),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn archive_message<R: MessageRepository>(
    State(service): Service<R>,
    UuidPath(id): UuidPath,
) -> MessageResult<Json<Message>> {
    Ok(Json(service.archive(id).await?))
}

/// Change the priority; unknown values are rejected by the body parser
#[utoipa::path(
    put,
    path = "/{id}/priority",
    tag = "Messages",
    params(("id" = Uuid, Path, description = "Message id")),
    request_body = UpdatePriority,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Priority updated", body = Message),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, description = "Unknown priority"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_priority<R: MessageRepository>(
    State(service): Service<R>,
    UuidPath(id): UuidPath,
    JsonBody(input): JsonBody<UpdatePriority>,
) -> MessageResult<Json<Message>> {
    Ok(Json(service.update_priority(id, input.priority).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Messages",
    params(("id" = Uuid, Path, description = "Message id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_message<R: MessageRepository>(
    State(service): Service<R>,
    UuidPath(id): UuidPath,
) -> MessageResult<StatusCode> {
    service.delete_message(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
