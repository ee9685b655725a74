//! Interactive console
//!
//! Wires the session list store, the polling synchronizer, the active
//! thread controller, and the contextual menu into a readline loop. Free
//! text is sent to the agent; `/`-prefixed commands manage sessions, the
//! board panel, and the profile.
//!
//! Mutation flow: the store applies the optimistic change synchronously,
//! the network call is spawned afterwards, and when it settles the list
//! poller is poked so that polling remains the single writer of confirmed
//! state.

use crate::api::{AgentClient, BoardDetail, ChatMessage, RemoteStore, Role, TaskStatus};
use crate::commands::sessions::render_session_table;
use crate::commands::special_commands::{parse_console_command, print_help, ConsoleCommand};
use crate::config::Config;
use crate::error::Result;
use crate::menu::MenuState;
use crate::session::{Poller, Session, SessionListStore, SessionSnapshot, POLL_INTERVAL};
use crate::thread::{ThreadController, ThreadState};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Shared slot for the active thread's board data
///
/// Written by the board poller, read by `/board`.
pub type BoardCell = Arc<Mutex<Option<BoardDetail>>>;

/// Start the session list synchronizer
///
/// One immediate fetch, then one every poll interval; each accepted result
/// replaces the store's authoritative snapshot wholesale. A failed fetch is
/// logged and leaves the previous snapshot untouched.
pub fn start_list_poller(client: Arc<dyn RemoteStore>, store: Arc<SessionListStore>) -> Poller {
    Poller::start(POLL_INTERVAL, move |seq| {
        let client = client.clone();
        let store = store.clone();
        async move {
            match client.list_sessions().await {
                Ok(sessions) => {
                    store.reconcile(seq, sessions);
                }
                Err(e) => {
                    tracing::warn!(seq, "Session list poll failed: {}", e);
                }
            }
        }
    })
}

/// Start a board poller for one thread
///
/// The returned cell holds the last good board; switching threads stops
/// this poller (callers drop or `stop()` it) before starting the next
/// thread's, so board data never leaks across threads.
pub fn start_board_poller(
    client: Arc<dyn RemoteStore>,
    thread_id: String,
) -> (Poller, BoardCell) {
    let cell: BoardCell = Arc::new(Mutex::new(None));
    let sink = cell.clone();
    let poller = Poller::start(POLL_INTERVAL, move |seq| {
        let client = client.clone();
        let sink = sink.clone();
        let thread_id = thread_id.clone();
        async move {
            match client.fetch_board(&thread_id).await {
                Ok(board) => apply_board_update(&sink, board),
                Err(e) => {
                    tracing::warn!(seq, thread_id = %thread_id, "Board poll failed: {}", e);
                }
            }
        }
    });
    (poller, cell)
}

/// Store a polled board, retaining the previous one on empty payloads
///
/// The backend occasionally answers with an empty object while the board
/// is being (re)built; clearing the panel on that would flicker.
pub fn apply_board_update(cell: &BoardCell, board: BoardDetail) {
    if board.is_empty() {
        return;
    }
    if let Ok(mut slot) = cell.lock() {
        *slot = Some(board);
    }
}

/// Resolve a user-entered session target to a thread id
///
/// Accepts a 1-based index into the rendered list or a literal thread id.
pub fn resolve_target(snapshot: &SessionSnapshot, target: &str) -> Option<String> {
    if let Ok(index) = target.parse::<usize>() {
        if index >= 1 && index <= snapshot.len() {
            return Some(snapshot.sessions[index - 1].id.clone());
        }
        return None;
    }
    snapshot.get(target).map(|s| s.id.clone())
}

fn spawn_pin_confirm(client: Arc<dyn RemoteStore>, poller: Arc<Poller>, id: String) {
    tokio::spawn(async move {
        if let Err(e) = client.toggle_pin(&id).await {
            tracing::warn!(thread_id = %id, "Pin mutation failed: {}", e);
        }
        poller.poke();
    });
}

fn spawn_rename_confirm(
    client: Arc<dyn RemoteStore>,
    poller: Arc<Poller>,
    id: String,
    name: String,
) {
    tokio::spawn(async move {
        if let Err(e) = client.rename(&id, &name).await {
            tracing::warn!(thread_id = %id, "Rename mutation failed: {}", e);
        }
        poller.poke();
    });
}

fn spawn_delete_confirm(client: Arc<dyn RemoteStore>, poller: Arc<Poller>, id: String) {
    tokio::spawn(async move {
        if let Err(e) = client.delete(&id).await {
            tracing::warn!(thread_id = %id, "Delete mutation failed: {}", e);
        }
        poller.poke();
    });
}

fn short(id: &str) -> &str {
    &id[id.len().saturating_sub(6)..]
}

fn format_prompt(controller: &ThreadController) -> String {
    match controller.state() {
        ThreadState::Uninitialized => "[no session] >> ".to_string(),
        ThreadState::Loading { id } => format!("[{}...] >> ", short(id)),
        ThreadState::Ready { id, .. } => format!("[{}] >> ", short(id)),
    }
}

fn print_banner(thread_id: &str) {
    println!();
    println!(
        "{} {}",
        "THE CO-FOUNDER CONSOLE".bold(),
        format!("session {}", short(thread_id)).dimmed()
    );
    println!();
}

fn print_message(message: &ChatMessage) {
    match message.role {
        Role::User => println!("{} {}", "you       >".green().bold(), message.content),
        Role::Assistant => {
            println!("{} {}", "cofounder >".cyan().bold(), message.content)
        }
    }
}

fn print_transcript(messages: &[ChatMessage]) {
    if messages.is_empty() {
        println!("{}", "Knowledge engine ready. Dump your thoughts here.".dimmed());
        return;
    }
    for message in messages {
        print_message(message);
    }
}

fn print_board(board: Option<&BoardDetail>) {
    let Some(board) = board else {
        println!(
            "{}",
            "Waiting for the co-founder to initialize the knowledge base...".dimmed()
        );
        return;
    };

    if let Some(vision) = &board.vision {
        println!("{}", "VISION & STRATEGY".bold());
        println!("{}", vision);
        println!();
    }

    println!("{} {}", "ROADMAP".bold(), board.progress_summary().dimmed());
    if board.tasks.is_empty() {
        println!("{}", "No active roadmap items yet.".dimmed());
        return;
    }
    for task in &board.tasks {
        let marker = match task.status {
            TaskStatus::Done => "[x]".green(),
            TaskStatus::InProgress => "[~]".yellow(),
            TaskStatus::Todo => "[ ]".normal(),
        };
        println!("  {} {}", marker, task.label());
    }
}

fn print_status(
    controller: &ThreadController,
    store: &SessionListStore,
    board: Option<&BoardDetail>,
) {
    let snapshot = store.snapshot();
    match controller.state() {
        ThreadState::Uninitialized => println!("Active session: none"),
        ThreadState::Loading { id } => println!("Active session: {} (loading)", id),
        ThreadState::Ready { id, sending } => {
            let state = if *sending { "waiting for reply" } else { "ready" };
            println!("Active session: {} ({})", id, state);
        }
    }
    println!(
        "Sessions: {} known, {} unconfirmed local changes",
        snapshot.len(),
        store.pending_count()
    );
    match board {
        Some(board) => println!("Board: {} tasks done", board.progress_summary()),
        None => println!("Board: not loaded"),
    }
}

/// Run the interactive console
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `requested_thread` - Thread id to resume; a fresh one is synthesized
///   and announced when absent
///
/// # Examples
///
/// ```no_run
/// use cofound::commands::console;
/// use cofound::config::Config;
///
/// // In application code:
/// // console::run_console(Config::default(), None).await?;
/// ```
pub async fn run_console(config: Config, requested_thread: Option<String>) -> Result<()> {
    tracing::info!("Starting interactive console");

    let client: Arc<dyn RemoteStore> = Arc::new(AgentClient::new(&config.server)?);
    let store = Arc::new(SessionListStore::new(config.session.reconcile_poll_budget));
    let list_poller = Arc::new(start_list_poller(client.clone(), store.clone()));

    let mut controller = ThreadController::new();
    let mut menu = MenuState::default();

    // Resolve the initial thread: a requested id loads its history, a fresh
    // id starts with an empty transcript and an optimistic list entry.
    let resumed = requested_thread.is_some();
    let initial_id =
        ThreadController::resolve_initial_id(requested_thread, &config.session.id_prefix);
    if resumed {
        controller.activate(client.as_ref(), &initial_id).await;
    } else {
        store.insert_new(Session::draft(initial_id.clone()));
        controller.begin_load(&initial_id);
        controller.complete_load(&initial_id, Ok(Vec::new()));
        println!("{}", format!("Started new session {}", initial_id).cyan());
    }

    let (mut board_poller, mut board_cell) =
        start_board_poller(client.clone(), initial_id.clone());

    print_banner(&initial_id);
    print_transcript(controller.transcript());

    let mut rl = DefaultEditor::new()?;

    loop {
        let prompt = format_prompt(&controller);
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let command = match parse_console_command(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", e.to_string().red());
                        continue;
                    }
                };

                match command {
                    ConsoleCommand::None => {
                        if !controller.can_send() {
                            println!(
                                "{}",
                                "No active session ready for input. Use /switch or /new.".yellow()
                            );
                            continue;
                        }
                        let before = controller.transcript().len();
                        controller.send(client.as_ref(), trimmed).await;
                        // Skip the echoed user turn; show what came back
                        for message in &controller.transcript()[before + 1..] {
                            print_message(message);
                        }
                        list_poller.poke();
                    }
                    ConsoleCommand::ListSessions => {
                        let snapshot = store.snapshot();
                        if snapshot.is_empty() {
                            println!("{}", "No sessions yet.".dimmed());
                        } else {
                            render_session_table(&snapshot.sessions, controller.active_id())
                                .printstd();
                        }
                    }
                    ConsoleCommand::Switch(target) => {
                        let snapshot = store.snapshot();
                        let Some(id) = resolve_target(&snapshot, &target) else {
                            eprintln!("{}", format!("No such session: {}", target).red());
                            continue;
                        };
                        if controller.active_id() == Some(id.as_str()) {
                            println!("Already on {}", id);
                            continue;
                        }
                        menu.cancel();
                        // Stop the old thread's board loop before the new
                        // thread renders anything
                        board_poller.stop();
                        let (poller, cell) = start_board_poller(client.clone(), id.clone());
                        board_poller = poller;
                        board_cell = cell;

                        controller.activate(client.as_ref(), &id).await;
                        print_banner(&id);
                        print_transcript(controller.transcript());
                    }
                    ConsoleCommand::NewSession => {
                        let id = ThreadController::synthesize_id(&config.session.id_prefix);
                        menu.cancel();
                        store.insert_new(Session::draft(id.clone()));
                        board_poller.stop();
                        let (poller, cell) = start_board_poller(client.clone(), id.clone());
                        board_poller = poller;
                        board_cell = cell;

                        controller.begin_load(&id);
                        controller.complete_load(&id, Ok(Vec::new()));
                        print_banner(&id);
                        print_transcript(controller.transcript());
                    }
                    ConsoleCommand::Pin(target) => {
                        let snapshot = store.snapshot();
                        let Some(id) = resolve_target(&snapshot, &target) else {
                            eprintln!("{}", format!("No such session: {}", target).red());
                            continue;
                        };
                        menu.open(&id);
                        match store.toggle_pin(&id) {
                            Some(true) => println!("Pinned {}", id),
                            Some(false) => println!("Unpinned {}", id),
                            None => {
                                eprintln!("{}", format!("No such session: {}", id).red());
                                menu.cancel();
                                continue;
                            }
                        }
                        menu.cancel();
                        spawn_pin_confirm(client.clone(), list_poller.clone(), id);
                    }
                    ConsoleCommand::Rename(target) => {
                        let snapshot = store.snapshot();
                        let Some(id) = resolve_target(&snapshot, &target) else {
                            eprintln!("{}", format!("No such session: {}", target).red());
                            continue;
                        };
                        let current = snapshot.get(&id).and_then(|s| s.display_name.clone());
                        menu.begin_rename(&id, current.as_deref());
                        let seed = match &menu {
                            MenuState::Renaming { draft, .. } => draft.clone(),
                            _ => String::new(),
                        };
                        match rl.readline_with_initial("New name: ", (seed.as_str(), "")) {
                            Ok(entered) => {
                                menu.update_draft(entered);
                                if let Some((id, name)) = menu.submit() {
                                    store.rename(&id, &name);
                                    println!("Renamed to '{}'", name);
                                    spawn_rename_confirm(
                                        client.clone(),
                                        list_poller.clone(),
                                        id,
                                        name,
                                    );
                                } else {
                                    println!("Rename cancelled.");
                                }
                            }
                            Err(_) => {
                                menu.cancel();
                                println!("Rename cancelled.");
                            }
                        }
                    }
                    ConsoleCommand::Delete(target) => {
                        let snapshot = store.snapshot();
                        let Some(id) = resolve_target(&snapshot, &target) else {
                            eprintln!("{}", format!("No such session: {}", target).red());
                            continue;
                        };
                        let title = snapshot
                            .get(&id)
                            .map(|s| s.display_title().to_string())
                            .unwrap_or_else(|| id.clone());
                        menu.open(&id);
                        let question = format!(
                            "Delete session '{}'? This cannot be undone. [y/N]: ",
                            title
                        );
                        let confirmed = matches!(
                            rl.readline(&question),
                            Ok(answer) if answer.trim().eq_ignore_ascii_case("y")
                        );
                        menu.cancel();
                        if !confirmed {
                            println!("Delete cancelled.");
                            continue;
                        }

                        if controller.active_id() == Some(id.as_str()) {
                            controller.clear_active();
                            board_poller.stop();
                            println!(
                                "{}",
                                "Active session deleted; nothing selected. Use /switch or /new."
                                    .yellow()
                            );
                        }
                        store.remove(&id);
                        spawn_delete_confirm(client.clone(), list_poller.clone(), id);
                        println!("Session deleted.");
                    }
                    ConsoleCommand::ShowBoard => {
                        if controller.active_id().is_none() {
                            println!("{}", "No active session.".yellow());
                            continue;
                        }
                        let board = board_cell.lock().ok().and_then(|slot| slot.clone());
                        print_board(board.as_ref());
                    }
                    ConsoleCommand::ShowProfile => match client.get_profile().await {
                        Ok(content) if content.is_empty() => {
                            println!("{}", "Profile is empty.".dimmed());
                        }
                        Ok(content) => println!("{}", content),
                        Err(e) => eprintln!("{}", format!("{}", e).red()),
                    },
                    ConsoleCommand::Voice(path) => {
                        if !controller.can_send() {
                            println!(
                                "{}",
                                "No active session ready for input. Use /switch or /new.".yellow()
                            );
                            continue;
                        }
                        let path = Path::new(&path);
                        let file_name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| "recording.webm".to_string());
                        match tokio::fs::read(path).await {
                            Ok(audio) => {
                                let before = controller.transcript().len();
                                controller
                                    .send_voice(client.as_ref(), &file_name, audio)
                                    .await;
                                for message in &controller.transcript()[before..] {
                                    print_message(message);
                                }
                                list_poller.poke();
                            }
                            Err(e) => {
                                eprintln!("{}", format!("Cannot read {}: {}", path.display(), e).red());
                            }
                        }
                    }
                    ConsoleCommand::ShowStatus => {
                        let board = board_cell.lock().ok().and_then(|slot| slot.clone());
                        print_status(&controller, &store, board.as_ref());
                    }
                    ConsoleCommand::Help => print_help(),
                    ConsoleCommand::Exit => break,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        }
    }

    list_poller.stop();
    board_poller.stop();
    println!("Goodbye!");
    Ok(())
}
