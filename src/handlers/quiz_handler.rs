use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{quiz_dto::QuizDto, request::SubmitAnswersRequest},
};

/// Marks the session triggered and generates its quiz. Correctness flags are
/// never sent to the client.
#[post("/api/sessions/{id}/quiz")]
pub async fn start_quiz(
    req: HttpRequest,
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req).unwrap_or_default();
    log::info!("[{}] Session {} starting quiz", request_id, id);

    let quiz = state.session_service.start_quiz(&id).await.map_err(|e| {
        log::warn!("[{}] Quiz generation for session {} failed: {}", request_id, id, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(QuizDto::from(&quiz)))
}

#[get("/api/sessions/{id}/quiz")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.session_service.current_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(QuizDto::from(&quiz)))
}

#[post("/api/sessions/{id}/quiz/answers")]
pub async fn submit_answers(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAnswersRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let result = state
        .session_service
        .check_answers(&id, &request.answers)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}
