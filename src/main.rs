use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizgpt_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let max_upload_bytes = config.max_upload_bytes;

    log::info!(
        "Using model {} (streaming: {}, structured output: {}, parser: {:?})",
        config.model,
        config.streaming,
        config.structured_output,
        config.parse_strategy
    );

    let state = web::Data::new(AppState::new(config));

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .app_data(web::JsonConfig::default().limit(64 * 1024))
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(handlers::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
