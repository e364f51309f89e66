use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use gig_match::config::Settings;
use gig_match::core::{Matcher, SkillRegistry};
use gig_match::models::ScoringWeights;
use gig_match::routes::{
    self,
    error::{handle_json_payload_error, handle_query_payload_error},
    matches::AppState,
};
use gig_match::services::CsvDataset;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: &str) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting Gig Match service...");

    let dataset = Arc::new(CsvDataset::from_settings(&settings.data));
    info!("Reading records from {}", settings.data.dir);

    let filter_params = settings.filter.params();
    if filter_params.bits == 0 || filter_params.hashes == 0 {
        warn!("Skill filter needs at least one bit and one hash, clamping");
    }
    let skills = Arc::new(SkillRegistry::new(filter_params));

    let weights = ScoringWeights::from(&settings.scoring.weights);
    let matcher = Matcher::new(weights);

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        dataset,
        skills,
        matcher,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
