mod config;
mod layer;
mod notifier;

use anyhow::Result;
use config::ObservabilityConfig;
use layer::ErrorNotifyLayer;
use notifier::DiscordNotifier;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initializes the tracing registry for one process. Structured logs always
/// go to stdout; errors additionally fan out to a Discord webhook when one
/// is configured.
pub fn init_observability(component: &str) -> Result<()> {
    let config = ObservabilityConfig::from_env(component);

    let notify_layer = config.discord.as_ref().map(|discord| {
        let notifier = DiscordNotifier::spawn(discord.webhook_url.clone());

        ErrorNotifyLayer::new(notifier, config.service_context.clone(), discord.min_level)
            .with_filter(tracing_subscriber::filter::LevelFilter::from_level(
                discord.min_level,
            ))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // ChronoLocal keeps log timestamps in the server timezone, which for this
    // deployment is America/Sao_Paulo.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(notify_layer)
        .with(env_filter)
        .try_init()?;

    for warning in &config.warnings {
        warn!(
            service = %config.service_context.service_name,
            environment = %config.service_context.environment,
            component = %config.service_context.component,
            warning = %warning,
            "Observability config warning"
        );
    }

    info!(
        service = %config.service_context.service_name,
        environment = %config.service_context.environment,
        component = %config.service_context.component,
        discord_alerts = config.discord.is_some(),
        "Observability initialized"
    );

    Ok(())
}
