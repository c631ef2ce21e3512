use std::io;
use std::sync::Arc;

use jenkins_engine::{
    CommandTable, FileSettingsSource, HostServices, Notifier, ReqwestStatusClient,
    SettingsSource, StatusController, UpdatePolicy, NOT_ENABLED_WARNING,
};
use jenkins_logging::jenkins_info;

use super::cli::Cli;
use super::console::{self, StdinPicker};
use super::terminal::{SystemBrowser, TerminalNotifier, TerminalSurfaces};

pub async fn run_app(cli: Cli) -> anyhow::Result<()> {
    let folders = cli.folders_or_current();
    jenkins_info!("Watching {:?} (polling every {} min)", folders, cli.polling);

    let lines = console::stdin_lines();
    let commands = CommandTable::new();
    let notifier = Arc::new(TerminalNotifier);
    // In --once mode the final report replaces the live surface output.
    let surfaces = if cli.once {
        TerminalSurfaces::with_writer(Box::new(io::sink()))
    } else {
        TerminalSurfaces::stdout()
    };
    let host = HostServices {
        surfaces: Arc::new(surfaces),
        commands: Arc::new(commands.clone()),
        browser: Arc::new(SystemBrowser),
        notifier: notifier.clone(),
        picker: Arc::new(StdinPicker::new(lines.clone())),
    };

    let settings = Arc::new(FileSettingsSource::new(folders));
    let policy = if cli.once {
        UpdatePolicy::Null
    } else {
        UpdatePolicy::from_minutes(cli.polling)
    };
    let controller = StatusController::new(
        Arc::new(ReqwestStatusClient::default()),
        settings.clone(),
        policy,
        host,
    );

    if !settings.is_enabled().await {
        notifier.warn(NOT_ENABLED_WARNING);
    }

    if cli.once {
        settings.reload().await;
        controller.update_now().await;
        print!("{}", console::render_views(&controller.reconciler().views()));
        controller.dispose();
        return Ok(());
    }

    controller.start().await;
    println!("Type `help` for the list of commands.");
    let result = tokio::select! {
        result = console::run_console(&controller, &commands, lines) => result,
        signal = tokio::signal::ctrl_c() => signal.map_err(anyhow::Error::from),
    };
    controller.dispose();
    result
}
