//! Interactive chat session against a Parley server.

use std::sync::Arc;

use anyhow::{Context, Result};
use client::{
    FileIdentityStore, SessionState, SyncSession,
    history::HttpHistoryClient,
    transport::SseTransport,
};
use shared::{
    config::Config,
    models::{ChatMessage, ServerEvent},
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Runs the interactive chat loop until `/quit` or end of input.
///
/// A persisted identity from a previous session joins the room
/// immediately; otherwise the first input line (or `--name`) becomes the
/// display name.
pub async fn start_chat(config: Config, name: Option<String>) -> Result<()> {
    let transport =
        Arc::new(SseTransport::new(&config.server_url).context("failed to set up event stream")?);
    let history = Arc::new(
        HttpHistoryClient::new(&config.server_url).context("failed to set up history client")?,
    );
    let mut session = SyncSession::new(Box::new(FileIdentityStore::new()), transport, history);

    session.start().await;
    if session.state() == SessionState::Anonymous
        && let Some(name) = name
    {
        try_join(&mut session, &name).await;
    }

    match session.state() {
        SessionState::Joined => {
            let identity = session.identity().expect("joined session has an identity");
            println!("Joined as {}.", identity.user_name);
            render_backlog(&session);
        }
        SessionState::Anonymous => println!("Enter a display name to join:"),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                if !handle_line(&mut session, &line).await? {
                    break;
                }
            }
            event = session.next_event() => {
                render_event(&session, &event);
            }
        }
    }

    Ok(())
}

/// Returns false when the loop should exit.
async fn handle_line(session: &mut SyncSession, line: &str) -> Result<bool> {
    if session.state() == SessionState::Anonymous {
        try_join(session, line).await;
        if session.state() == SessionState::Joined {
            render_backlog(session);
        }
        return Ok(true);
    }

    match line.trim() {
        "/quit" => return Ok(false),
        "/who" => {
            let online = session.online();
            if online.is_empty() {
                println!("[nobody else seems to be online]");
            } else {
                for entry in online {
                    println!("  {}", entry.user_name);
                }
            }
        }
        "/logout" => {
            if let Err(err) = session.logout().await {
                eprintln!("logout failed: {err}");
            }
            println!("Logged out. Enter a display name to join again:");
        }
        _ => session.send_message(line).await,
    }
    Ok(true)
}

async fn try_join(session: &mut SyncSession, name: &str) {
    match session.join(name).await {
        Ok(()) => {}
        Err(err) => eprintln!("could not join: {err}"),
    }
}

fn render_backlog(session: &SyncSession) {
    for message in session.messages() {
        render_message(message);
    }
}

fn render_event(session: &SyncSession, event: &ServerEvent) {
    match event {
        ServerEvent::Message { payload } => render_message(payload),
        ServerEvent::UserJoined { payload } => println!("[{} is online]", payload.user_name),
        ServerEvent::UserLeft { payload } => println!("[{} left]", payload.user_name),
        ServerEvent::OnlineUsers { .. } => {
            println!("[{} users online]", session.online().len());
        }
    }
}

fn render_message(message: &ChatMessage) {
    if message.is_system() {
        // System announcements carry no sender label.
        println!("        -- {} --", message.message_body);
    } else {
        println!("{}: {}", message.user_name, message.message_body);
    }
}
