use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{FileUploadQuery, SelectTopicRequest},
        response::{ApiResponse, SelectSourceResponse, SessionDto},
    },
};

#[post("/api/sessions")]
pub async fn create_session(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let session = state.session_service.create_session().await?;
    Ok(HttpResponse::Created().json(ApiResponse {
        data: SessionDto::from(&session),
        message: "Session created".to_string(),
    }))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(SessionDto::from(&session)))
}

/// The request body is the raw file content.
#[put("/api/sessions/{id}/source/file")]
pub async fn select_file_source(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<FileUploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    log::info!(
        "[{}] Session {} uploading '{}' ({} bytes)",
        get_request_id(&req).unwrap_or_default(),
        id,
        query.name,
        body.len()
    );

    let session = state
        .session_service
        .select_file_source(&id, &query.name, &body)
        .await?;

    Ok(HttpResponse::Ok().json(SelectSourceResponse {
        data: SessionDto::from(&session),
        message: "File source selected".to_string(),
    }))
}

#[put("/api/sessions/{id}/source/topic")]
pub async fn select_topic_source(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SelectTopicRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    log::info!(
        "[{}] Session {} searching topic '{}'",
        get_request_id(&req).unwrap_or_default(),
        id,
        request.topic
    );

    let session = state
        .session_service
        .select_topic_source(&id, &request.topic)
        .await?;

    Ok(HttpResponse::Ok().json(SelectSourceResponse {
        data: SessionDto::from(&session),
        message: "Topic source selected".to_string(),
    }))
}

#[post("/api/sessions/{id}/restart")]
pub async fn restart_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session = state.session_service.restart(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse {
        data: SessionDto::from(&session),
        message: "Session restarted".to_string(),
    }))
}

#[delete("/api/sessions/{id}")]
pub async fn end_session(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.session_service.end_session(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}
