use anyhow::Context;
use clap::Parser;
use push_invoker::core::MessagingGateway;
use push_invoker::domain::model::ErrorResponse;
use push_invoker::utils::error::ErrorSeverity;
use push_invoker::utils::{logger, validation::Validate};
use push_invoker::{
    CliConfig, Dispatcher, DryRunGateway, FcmGateway, NotificationResponse, PushError, Settings,
    TemplateCatalog, TemplateProvider,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // logger
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting push-invoker");

    // settings
    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    // templates
    let catalog = match &settings.templates.path {
        Some(path) => TemplateCatalog::from_file(path).map(Arc::new),
        None => TemplateCatalog::embedded(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => exit_with(&e),
    };
    let templates = TemplateProvider::new(catalog);

    let request = cli
        .notification_request()
        .context("failed to read notification request")?;

    // Ctrl-C stops batches that have not been sent yet
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("🛑 Interrupt received, cancelling dispatch");
            on_signal.cancel();
        }
    });

    let options = settings.dispatch_options();
    let result = if cli.dry_run {
        let dispatcher = Dispatcher::new(Arc::new(DryRunGateway::new()), templates, options);
        run(&dispatcher, request, &cancel).await
    } else {
        let gateway = match FcmGateway::connect(&settings).await {
            Ok(gateway) => gateway,
            Err(e) => exit_with(&e),
        };
        tracing::info!(
            send_url = gateway.send_url(),
            web_app_base_url = settings.notification.web_app_base_url.as_deref().unwrap_or("-"),
            "🚀 FCM gateway initialized"
        );
        let dispatcher = Dispatcher::new(Arc::new(gateway), templates, options);
        run(&dispatcher, request, &cancel).await
    };

    match result {
        Ok(response) => {
            tracing::info!("✅ Dispatch completed: {}/{} delivered", response.success_count, response.total);
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            // a partial delivery still prints what was sent
            let body = match &e {
                PushError::PartialDelivery { completed, .. } => {
                    serde_json::to_value(NotificationResponse {
                        success: false,
                        ..NotificationResponse::from(completed.clone())
                    })?
                }
                _ => serde_json::to_value(ErrorResponse {
                    success: false,
                    error: e.to_string(),
                })?,
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
            exit_with(&e)
        }
    }
}

fn load_settings(cli: &CliConfig) -> push_invoker::Result<Settings> {
    let settings = cli.settings()?;
    if cli.dry_run {
        settings.validate_offline()?;
    } else {
        settings.validate()?;
    }
    tracing::info!("✅ Configuration loaded and validated");
    Ok(settings)
}

async fn run<G: MessagingGateway>(
    dispatcher: &Dispatcher<G>,
    request: push_invoker::NotificationRequest,
    cancel: &CancellationToken,
) -> push_invoker::Result<NotificationResponse> {
    dispatcher
        .dispatch(request, cancel)
        .await
        .map(NotificationResponse::from)
}

fn exit_with(e: &PushError) -> ! {
    tracing::error!(
        "❌ Dispatch failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    // exit code by severity
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 130,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
