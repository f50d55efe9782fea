//! Application startup
//!
//! Parse arguments, load configuration, start logging, then walk the host
//! through its startup stages.

use crate::app::cli::args::{Args, Settings};
use crate::app::display::print_startup_report;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{flush_logging, init_logging};
use crate::host::api::{Host, HostConfig, HostContext};
use crate::notifications::api::{DispatchMode, LifecycleEventBus};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

pub async fn startup() -> ExitCode {
    let args = Args::parse();

    let config = match HostConfig::load(args.config_file.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = args.settings(config);

    let use_color = settings
        .color
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    colored::control::set_override(use_color);
    if let Err(e) = init_logging(
        Some(&settings.log_level),
        settings.log_format.as_deref(),
        settings.log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    log::info!(
        "plughost {} (api {}, {}, built {})",
        env!("CARGO_PKG_VERSION"),
        crate::core::version::get_api_version(),
        crate::core::version::git_hash(),
        crate::core::version::build_time()
    );
    log::debug!("Effective settings: {:#?}", settings);

    let code = match run(settings, &args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    };
    flush_logging();
    code
}

/// Start the host, report, raise ProgramReady and run the requested command
pub async fn run(settings: Settings, command: &[String]) -> Result<(), ExitCode> {
    let mode = if settings.synchronous_plugin_events {
        DispatchMode::Synchronous
    } else {
        DispatchMode::Detached
    };
    let bus = Arc::new(LifecycleEventBus::with_mode(mode));
    let mut host = Host::new(bus, settings.plugin_manager);

    let summary = host.start().await.map_err(|e| {
        log_error_with_context(&e, "Host startup failed");
        ExitCode::FAILURE
    })?;
    print_startup_report(
        host.activations(),
        &summary,
        host.plugin_manager().report(),
    );

    host.ready().await.map_err(|e| {
        log_error_with_context(&e, "Host could not signal readiness");
        ExitCode::FAILURE
    })?;

    if let Some((name, rest)) = command.split_first() {
        run_command(host.context(), name, rest)?;
    }
    Ok(())
}

fn run_command(context: &HostContext, name: &str, args: &[String]) -> Result<(), ExitCode> {
    let Some(output) = context.commands.dispatch(name, args) else {
        log::error!("Unknown command '{}'", name);
        return Err(ExitCode::from(2));
    };

    let client = context.client_wrapper.selected();
    for line in output.lines() {
        let line = context.filters.apply(line);
        match &client {
            Some(client) => client.deliver(&line),
            None => println!("{}", line),
        }
    }
    Ok(())
}
