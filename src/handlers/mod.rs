pub mod health_handler;
pub mod quiz_handler;
pub mod session_handler;

use actix_web::web;

pub use health_handler::health_check;
pub use quiz_handler::{get_quiz, start_quiz, submit_answers};
pub use session_handler::{
    create_session, end_session, get_session, restart_session, select_file_source, select_topic_source,
};

/// Registers every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(create_session)
        .service(get_session)
        .service(select_file_source)
        .service(select_topic_source)
        .service(start_quiz)
        .service(get_quiz)
        .service(submit_answers)
        .service(restart_session)
        .service(end_session);
}
