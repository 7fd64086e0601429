use actix_web::{web, App, HttpServer};
use dates_informer::config::EnvConfig;
use dates_informer::db::postgres_service::PostgresService;
use dates_informer::routes::configure_routes;
use dates_informer::scheduler::ReminderScheduler;
use dates_informer::utils::mail::{HttpMailer, Mailer};
use std::io;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let config = EnvConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let addr = format!("0.0.0.0:{}", config.port);

    let postgres_service = Arc::new(
        PostgresService::new(&config.db_url)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?,
    );
    let mailer: Arc<dyn Mailer> = Arc::new(
        HttpMailer::new(&config.mail).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );

    let cancel = CancellationToken::new();
    let scheduler = ReminderScheduler::new(
        Arc::clone(&postgres_service),
        Arc::clone(&mailer),
        config.scheduler.poll_interval,
        cancel.child_token(),
    );
    let scheduler_task = tokio::spawn(scheduler.run());

    info!("Starting server on {}", addr);

    let auth_config = config.auth.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(Arc::clone(&postgres_service)))
            .app_data(web::Data::new(Arc::clone(&mailer)))
            .app_data(web::Data::new(auth_config.clone()))
            .configure(configure_routes)
    })
    .bind(addr)?
    .run();

    let result = server.await;

    cancel.cancel();
    if let Err(e) = scheduler_task.await {
        error!(error = %e, "reminder scheduler task ended abnormally");
    }
    info!("Shut down.");
    result
}
