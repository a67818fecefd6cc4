use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::{
    auth::{hash_password, issue_tokens, verify_password},
    tasks::{self, CreateTask, UpdateTask},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login",          post(login))
        .route("/auth/refresh",        post(refresh_token))
        .route("/projects",            get(list_projects).post(create_project))
        .route("/projects/:id",        get(get_project).put(update_project).delete(delete_project))
        .route("/projects/:id/tasks",  get(list_tasks).post(create_task))
        .route("/tasks/:id",           get(get_task).put(update_task).delete(delete_task))
        .route("/tasks/:id/complete",  post(complete_task))
        .route("/webhooks",            get(list_webhooks).post(register_webhook))
        .route("/webhooks/:id",        delete(delete_webhook))
        .route("/admin/users",         get(list_users))
        .route("/admin/rate-limits",   get(get_rate_limit_stats).post(reset_rate_limit))
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user = match db::get_user_by_name(&state.db, &req.username).await {
        Ok(Some(u)) => u,
        _ => return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response(),
    };
    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        _ => return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response(),
    }
    let tokens = issue_tokens(&user.id.to_string(), &user.role,
                               &state.config.auth.jwt_secret,
                               state.config.auth.token_expiry_secs).unwrap();
    Json(tokens).into_response()
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

async fn list_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    if let Some(q) = params.q {
        match tasks::search_tasks(&state.db, project_id, &q).await {
            Ok(results) => Json(results).into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    } else {
        match tasks::list_tasks(&state.db, project_id).await {
            Ok(results) => Json(results).into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        }
    }
}

async fn create_task(
    State(state): State<AppState>,
    Path(project_id): Path<i64>,
    Json(req): Json<CreateTask>,
) -> impl IntoResponse {
    match tasks::create_task(&state.db, project_id, req).await {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    let req = UpdateTask { status: Some("done".into()), ..Default::default() };
    match tasks::update_task(&state.db, id, req).await {
        Ok(Some(task)) => {
            // Fire webhook asynchronously
            tokio::spawn(webhooks::notify_task_completed(state.clone(), task.clone()));
            Json(task).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn get_rate_limit_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.rate_limiter.stats()).into_response()
}

async fn reset_rate_limit(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    state.rate_limiter.reset(&user_id);
    StatusCode::NO_CONTENT
}
