use std::{process, sync::Arc};

use postboard::{
    application::{error::AppError, posts::PostService},
    config,
    infra::{
        error::InfraError,
        http::{self, HttpState},
        store::JsonFileStore,
        telemetry,
    },
    presentation::views::LayoutChrome,
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Check(_) => run_check(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = Arc::new(JsonFileStore::new(settings.storage.data_file.clone()));
    let state = HttpState {
        posts: Arc::new(PostService::new(store)),
        chrome: LayoutChrome {
            site_title: settings.site.title.clone(),
        },
    };
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        addr = %settings.server.addr,
        data_file = %settings.storage.data_file.display(),
        "postboard listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    info!("postboard stopped");
    Ok(())
}

async fn run_check(settings: config::Settings) -> Result<(), AppError> {
    let data_file = settings.storage.data_file;
    let service = PostService::new(Arc::new(JsonFileStore::new(data_file.clone())));
    let summary = service.inspect().await?;

    info!(
        data_file = %data_file.display(),
        count = summary.count,
        next_id = summary.next_id,
        "backing file is valid"
    );
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
