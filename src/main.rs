#![windows_subsystem = "windows"]

use anyhow::Context;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use process_suspender::services::{
    desktop::{self, NativeFolderPicker, PSTOOLS_DOWNLOAD_URL},
    dispatcher::Action,
    runner::SystemRunner,
    settings::SettingsService,
    shell::{Severity, ShellController, ShellState, StatusReport},
    tools::ToolsLocator,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

slint::include_modules!();

const APP_TITLE: &str = "Process Suspend/Resume";

fn status_kind(severity: Severity) -> StatusKind {
    match severity {
        Severity::Info => StatusKind::Info,
        Severity::Success => StatusKind::Success,
        Severity::Warning => StatusKind::Warning,
        Severity::Error => StatusKind::Error,
    }
}

fn show_report(ui: &AppWindow, report: &StatusReport) {
    ui.set_status_text(report.message.as_str().into());
    ui.set_status_kind(status_kind(report.severity));
}

fn refresh(ui: &AppWindow, shell: &ShellController) {
    let folder = shell
        .tools_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_default();
    ui.set_tools_folder(folder.into());
    ui.set_setup_required(shell.state() == ShellState::AwaitingSetup);
}

/// The folder chooser pumps messages, so a second click can arrive while a
/// callback still holds the controller. Such clicks are dropped.
fn with_shell<R>(
    shell: &RefCell<ShellController>,
    f: impl FnOnce(&mut ShellController) -> R,
) -> Option<R> {
    match shell.try_borrow_mut() {
        Ok(mut guard) => Some(f(&mut guard)),
        Err(_) => {
            tracing::debug!("ignoring input while a dialog is open");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 1. Load config; a broken file stops startup instead of being overwritten later
    let settings = SettingsService::new();
    let config = match settings.load() {
        Ok(config) => config,
        Err(e) => {
            desktop::show_fatal_error(
                APP_TITLE,
                &format!("{e}\n\nFix or delete the file and start again."),
            );
            return Err(e).context("loading configuration");
        }
    };

    let shell = Rc::new(RefCell::new(ShellController::new(
        settings,
        config,
        ToolsLocator::new(),
        Box::new(SystemRunner::default()),
    )));

    // 2. Window state
    let ui = AppWindow::new()?;
    refresh(&ui, &shell.borrow());

    // 3. Suspend / Resume
    for action in [Action::Suspend, Action::Resume] {
        let ui_handle = ui.as_weak();
        let shell = shell.clone();
        let handler = move |input: slint::SharedString| {
            let Some(ui) = ui_handle.upgrade() else { return };
            if let Some(report) = with_shell(&shell, |s| s.run_action(action, &input)) {
                show_report(&ui, &report);
            }
        };
        match action {
            Action::Suspend => ui.on_suspend_requested(handler),
            Action::Resume => ui.on_resume_requested(handler),
        }
    }

    // 4. First-run setup
    let ui_handle = ui.as_weak();
    let shell_setup = shell.clone();
    ui.on_finish_setup(move || {
        let Some(ui) = ui_handle.upgrade() else { return };
        let picker = NativeFolderPicker::new();
        if let Some(report) = with_shell(&shell_setup, |s| s.complete_setup(&picker)) {
            show_report(&ui, &report);
            refresh(&ui, &shell_setup.borrow());
        }
    });

    let ui_handle = ui.as_weak();
    let shell_skip = shell.clone();
    ui.on_skip_setup(move || {
        let Some(ui) = ui_handle.upgrade() else { return };
        if let Some(report) = with_shell(&shell_skip, |s| s.skip_setup()) {
            show_report(&ui, &report);
            refresh(&ui, &shell_skip.borrow());
        }
    });

    // 5. Settings menu
    let ui_handle = ui.as_weak();
    let shell_menu = shell.clone();
    ui.on_select_tools_folder(move || {
        let Some(ui) = ui_handle.upgrade() else { return };
        let picker = NativeFolderPicker::new();
        if let Some(report) = with_shell(&shell_menu, |s| s.select_tools_folder(&picker)) {
            show_report(&ui, &report);
            refresh(&ui, &shell_menu.borrow());
        }
    });

    let ui_handle = ui.as_weak();
    ui.on_open_download_page(move || {
        if let Err(e) = desktop::open_url(PSTOOLS_DOWNLOAD_URL) {
            if let Some(ui) = ui_handle.upgrade() {
                show_report(
                    &ui,
                    &StatusReport::new(Severity::Error, format!("Could not open browser: {e}")),
                );
            }
        }
    });

    ui.run()?;
    Ok(())
}
