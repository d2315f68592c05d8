//! Terminal front-end for a hosted conversational assistant: password
//! gating, per-thread chat history, and thumbs feedback capture.

mod app;
mod event;
mod ui;

use anyhow::Context;
use app::{App, FeedbackStage, Focus, LoginField, PendingFeedback, Screen};
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use infobuddy_config::BuddyConfig;
use infobuddy_core::{ChatManager, CredentialGate, Feedback, FeedbackKind, FeedbackStore};
use infobuddy_remote::{AssistantService, OpenAiAssistantClient, ThreadId};
use log::{debug, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Command-line options for the infobuddy front-end.
#[derive(Parser)]
#[command(name = "infobuddy", version)]
struct Cli {
    /// Optional path to an infobuddy.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Assistant configuration id (overrides config and env)
    #[arg(long)]
    assistant: Option<String>,
    /// Base URL of the remote assistants service
    #[arg(long)]
    base_url: Option<String>,
}

/// Entry point for the infobuddy terminal client.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting infobuddy (config_set={}, assistant_set={})",
        cli.config.is_some(),
        cli.assistant.is_some()
    );

    let mut config = if let Some(path) = cli.config.as_ref() {
        BuddyConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("failed to resolve working directory")?;
        BuddyConfig::load_discovered(&cwd).context("failed to load config")?
    };
    if let Some(assistant) = cli.assistant {
        config.remote.assistant_id = Some(assistant);
    }
    if let Some(base_url) = cli.base_url {
        config.remote.base_url = base_url;
    }

    let client: Arc<dyn AssistantService> = Arc::new(
        OpenAiAssistantClient::new(&config.remote)
            .context("failed to build the remote assistant client")?,
    );
    let manager = ChatManager::new(client, &config.remote);
    let store = FeedbackStore::new(&config.feedback.dir);
    let gate = CredentialGate::new(config.auth.users.clone());
    let logo = load_logo(config.ui.logo_path.as_deref());

    let mut app = App::new(gate, config.ui.title.clone(), config.ui.tagline.clone(), logo);

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone());

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        let Some(event) = rx.recv().await else { break };
        if handle_app_event(event, &manager, &store, &mut app, tx.clone()).await? {
            break;
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

/// Dispatch a UI event and return true when the app should exit.
async fn handle_app_event(
    event: AppEvent,
    manager: &ChatManager,
    store: &FeedbackStore,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::Input(key) => handle_input(key, manager, store, app, sender).await,
        AppEvent::Tick => {
            app.tick();
            Ok(false)
        }
        AppEvent::Scroll(delta) => {
            if app.screen == Screen::Chat {
                if delta < 0 {
                    app.scroll_up((-delta) as u16);
                } else if delta > 0 {
                    app.scroll_down(delta as u16);
                }
            }
            Ok(false)
        }
        AppEvent::TurnCompleted {
            thread_id,
            prompt,
            reply,
        } => {
            app.finish_thinking();
            let still_active = app.session.thread_id.as_ref() == Some(&thread_id);
            if !app.deliver_assistant_reply(&thread_id, &reply) {
                app.push_status("reply arrived for a deleted chat");
                return Ok(false);
            }
            // The rating bar only makes sense next to the visible reply.
            if still_active {
                app.pending_feedback = Some(PendingFeedback {
                    thread_id,
                    user_message: prompt,
                    assistant_response: reply,
                    kind: None,
                    text: String::new(),
                    stage: FeedbackStage::Rate,
                });
            }
            Ok(false)
        }
        AppEvent::TurnFailed { thread_id, message } => {
            app.finish_thinking();
            if app.session.thread_id.as_ref() == Some(&thread_id) {
                app.push_notice(format!("An error occurred: {message}"));
            } else {
                app.push_status(format!("a background turn failed: {message}"));
            }
            Ok(false)
        }
    }
}

/// Handle keyboard input and dispatch actions.
async fn handle_input(
    key: KeyEvent,
    manager: &ChatManager,
    store: &FeedbackStore,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }
    match app.screen {
        Screen::Login => handle_login_input(key, manager, app).await,
        Screen::Chat => handle_chat_input(key, manager, store, app, sender).await,
    }
}

/// Handle input on the login screen.
async fn handle_login_input(
    key: KeyEvent,
    manager: &ChatManager,
    app: &mut App,
) -> anyhow::Result<bool> {
    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
            app.login_field = match app.login_field {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
        }
        KeyCode::Enter => {
            if app.login_field == LoginField::Username {
                app.login_field = LoginField::Password;
            } else if app.submit_login() {
                // First chat starts right after the gate opens.
                start_chat(manager, app).await;
            }
        }
        KeyCode::Backspace => {
            match app.login_field {
                LoginField::Username => app.username_input.pop(),
                LoginField::Password => app.password_input.pop(),
            };
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            match app.login_field {
                LoginField::Username => app.username_input.push(ch),
                LoginField::Password => app.password_input.push(ch),
            };
        }
        _ => {}
    }
    Ok(false)
}

/// Handle input on the chat screen.
async fn handle_chat_input(
    key: KeyEvent,
    manager: &ChatManager,
    store: &FeedbackStore,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    // The explanation field captures everything while it is open.
    if matches!(
        app.pending_feedback.as_ref().map(|pending| pending.stage),
        Some(FeedbackStage::Explain)
    ) {
        handle_explanation_input(key, store, app);
        return Ok(false);
    }

    // Rating shortcuts while the feedback bar is shown.
    if matches!(
        app.pending_feedback.as_ref().map(|pending| pending.stage),
        Some(FeedbackStage::Rate)
    ) && key.modifiers.contains(KeyModifiers::CONTROL)
    {
        let kind = match key.code {
            KeyCode::Char('y') => Some(FeedbackKind::ThumbsUp),
            KeyCode::Char('b') => Some(FeedbackKind::ThumbsDown),
            _ => None,
        };
        if let Some(kind) = kind
            && let Some(pending) = app.pending_feedback.as_mut()
        {
            debug!("rating chosen (kind={kind:?})");
            pending.kind = Some(kind);
            pending.stage = FeedbackStage::Explain;
            return Ok(false);
        }
    }

    match key.code {
        KeyCode::Esc => {
            if app.pending_feedback.is_some() {
                app.pending_feedback = None;
            } else {
                return Ok(true);
            }
        }
        KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            start_chat(manager, app).await;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            delete_chat(manager, app).await;
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Input => Focus::Sidebar,
                Focus::Sidebar => Focus::Input,
            };
            app.sync_selected_chat();
        }
        KeyCode::Up if app.focus == Focus::Sidebar => app.select_previous_chat(),
        KeyCode::Down if app.focus == Focus::Sidebar => app.select_next_chat(),
        KeyCode::Enter if app.focus == Focus::Sidebar => {
            activate_selected_chat(app);
        }
        KeyCode::PageUp => app.scroll_up(5),
        KeyCode::PageDown => app.scroll_down(5),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.enable_auto_scroll(),
        KeyCode::Enter => {
            submit_prompt(manager, app, sender);
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.push(ch);
        }
        _ => {}
    }
    Ok(false)
}

/// Handle typing in the feedback explanation field.
fn handle_explanation_input(key: KeyEvent, store: &FeedbackStore, app: &mut App) {
    match key.code {
        KeyCode::Enter => submit_feedback(store, app),
        KeyCode::Esc => {
            app.pending_feedback = None;
            app.push_status("feedback discarded");
        }
        KeyCode::Backspace => {
            if let Some(pending) = app.pending_feedback.as_mut() {
                pending.text.pop();
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(pending) = app.pending_feedback.as_mut() {
                pending.text.push(ch);
            }
        }
        _ => {}
    }
}

/// Persist the collected feedback for the latest exchange.
fn submit_feedback(store: &FeedbackStore, app: &mut App) {
    let Some(pending) = app.pending_feedback.take() else {
        return;
    };
    let Some(kind) = pending.kind else {
        return;
    };
    let text = Some(pending.text.trim().to_string()).filter(|text| !text.is_empty());
    match store.save_for_thread(
        &app.session,
        pending.thread_id,
        pending.user_message,
        pending.assistant_response,
        Feedback { kind, text },
    ) {
        Ok(file) => {
            debug!("feedback persisted (file={})", file.display());
            app.push_status("Thank you for your feedback!");
        }
        Err(err) => {
            warn!("feedback save failed: {err}");
            app.push_notice(format!("Failed to save feedback: {err}"));
            app.push_status("idle");
        }
    }
}

/// Submit the current prompt as a new assistant turn.
fn submit_prompt(manager: &ChatManager, app: &mut App, sender: mpsc::Sender<AppEvent>) {
    if app.thinking {
        app.push_status("still waiting for the previous reply");
        return;
    }
    if app.input.trim().is_empty() {
        return;
    }
    let Some(thread_id) = app.session.thread_id.clone() else {
        app.push_notice("No active chat. Start a new chat first.");
        return;
    };
    let prompt = std::mem::take(&mut app.input);
    info!(
        "submitting prompt (thread_id={}, prompt_len={})",
        thread_id,
        prompt.len()
    );
    app.push_user_message(&prompt);
    app.enable_auto_scroll();
    app.begin_thinking();
    spawn_turn(manager.clone(), thread_id, prompt, sender);
}

/// Spawn the assistant turn on a task so the UI keeps rendering.
fn spawn_turn(
    manager: ChatManager,
    thread_id: ThreadId,
    prompt: String,
    sender: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        match manager.run_turn(&thread_id, &prompt).await {
            Ok(reply) => {
                let _ = sender
                    .send(AppEvent::TurnCompleted {
                        thread_id,
                        prompt,
                        reply,
                    })
                    .await;
            }
            Err(err) => {
                let _ = sender
                    .send(AppEvent::TurnFailed {
                        thread_id,
                        message: err.to_string(),
                    })
                    .await;
            }
        }
    });
}

/// Start a new chat thread and make it active.
async fn start_chat(manager: &ChatManager, app: &mut App) {
    match manager.start_new_chat(&mut app.session).await {
        Ok(thread_id) => {
            app.reload_transcript();
            let alias = app.session.active_alias().unwrap_or("chat").to_string();
            info!("chat started (thread_id={thread_id})");
            app.push_status(format!("started {alias}"));
        }
        Err(err) => {
            warn!("chat creation failed: {err}");
            app.push_notice("Failed to create new chat. Please try again.");
        }
    }
}

/// Delete the selected chat; the session auto-starts a replacement when the
/// active thread is deleted.
async fn delete_chat(manager: &ChatManager, app: &mut App) {
    match manager.delete_current_chat(&mut app.session).await {
        Ok(replacement) => {
            app.reload_transcript();
            if replacement.is_some() {
                app.push_status("chat deleted, new chat started");
            } else {
                app.push_status("chat deleted");
            }
        }
        Err(err) => {
            warn!("chat deletion failed: {err}");
            app.push_notice(format!("Failed to delete chat: {err}"));
        }
    }
}

/// Make the sidebar-highlighted chat the active one.
fn activate_selected_chat(app: &mut App) {
    let Some(chat) = app.session.chats().get(app.selected_chat) else {
        return;
    };
    let thread_id = chat.id.clone();
    let alias = chat.alias.clone();
    if app.session.select_chat(&thread_id) {
        app.reload_transcript();
        app.focus = Focus::Input;
        app.push_status(format!("switched to {alias}"));
    }
}

/// Read the sidebar banner; failure is logged and the banner skipped.
fn load_logo(path: Option<&str>) -> Option<String> {
    let path = path?;
    match std::fs::read_to_string(path) {
        Ok(banner) => Some(banner),
        Err(err) => {
            warn!("failed to load logo (path={path}): {err}");
            None
        }
    }
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if let Ok(true) = crossterm::event::poll(Duration::from_millis(30)) {
                while let Ok(true) = crossterm::event::poll(Duration::from_millis(0)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    match event {
                        CrosstermEvent::Key(key) => {
                            let _ = sender.send(AppEvent::Input(key)).await;
                        }
                        CrosstermEvent::Mouse(mouse) => match mouse.kind {
                            MouseEventKind::ScrollUp => {
                                let _ = sender.send(AppEvent::Scroll(-MOUSE_SCROLL_LINES)).await;
                            }
                            MouseEventKind::ScrollDown => {
                                let _ = sender.send(AppEvent::Scroll(MOUSE_SCROLL_LINES)).await;
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }
        }
    });
}

/// Spawn a periodic tick event generator for the spinner.
fn spawn_tick(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(120));
        loop {
            interval.tick().await;
            let _ = sender.send(AppEvent::Tick).await;
        }
    });
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
