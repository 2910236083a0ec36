//! Auth command handlers.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use smashfit_core::ApiClient;
use smashfit_core::session::mask_token;

pub async fn login(client: &ApiClient, email: &str, password: Option<String>) -> Result<()> {
    if let Some(existing) = client.token_store().get() {
        println!("Replacing existing session (token: {})", mask_token(&existing));
    }

    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    let session = client
        .auth()
        .login(email, &password)
        .await
        .context("Login failed")?;

    let name = session
        .user
        .as_ref()
        .map_or(email, |user| user.display_name());
    let token = client.token_store().get().unwrap_or_default();
    println!("✓ Logged in as {name} (token: {})", mask_token(&token));
    Ok(())
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    if client.token_store().get().is_none() {
        client.sign_out()?;
        println!("Not logged in (no session found).");
        return Ok(());
    }

    // The local session is gone either way; a server failure is only reported.
    if let Err(e) = client.auth().logout().await {
        tracing::warn!(error = %e, "server logout failed");
        eprintln!("warning: server logout failed: {e}");
    }
    println!("✓ Logged out");
    Ok(())
}

pub async fn whoami(client: &ApiClient) -> Result<()> {
    if client.token_store().get().is_none() {
        anyhow::bail!("Not logged in. Run `smashfit login`.");
    }

    let user = client.auth().profile().await.context("Failed to fetch profile")?;
    println!("{}", user.display_name());
    if !user.email.is_empty() {
        println!("  Email: {}", user.email);
    }
    if let Some(role) = user.role.as_deref() {
        println!("  Role:  {role}");
    }
    // The profile call may have rotated the token.
    if let Some(token) = client.token_store().get() {
        println!("  Token: {}", mask_token(&token));
    }
    Ok(())
}

fn prompt_password() -> Result<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut input = String::new();
        stdin.lock().read_line(&mut input).context("read password")?;
        return Ok(input.trim_end_matches(['\r', '\n']).to_string());
    }

    print!("Password: ");
    io::stdout().flush()?;

    // Raw mode keeps the terminal from echoing the typed characters.
    terminal::enable_raw_mode().context("enable raw terminal mode")?;
    let read = read_hidden_line();
    let restored = terminal::disable_raw_mode();
    println!();

    let password = read?;
    restored.context("restore terminal mode")?;
    Ok(password)
}

fn read_hidden_line() -> Result<String> {
    let mut password = String::new();
    loop {
        let Event::Key(key) = event::read().context("read key")? else {
            continue;
        };
        match apply_key(&mut password, key) {
            KeyOutcome::Continue => {}
            KeyOutcome::Done => return Ok(password),
            KeyOutcome::Cancelled => anyhow::bail!("Password entry cancelled"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Done,
    Cancelled,
}

fn apply_key(password: &mut String, key: KeyEvent) -> KeyOutcome {
    if key.kind == KeyEventKind::Release {
        return KeyOutcome::Continue;
    }
    match key.code {
        KeyCode::Enter => KeyOutcome::Done,
        KeyCode::Esc => KeyOutcome::Cancelled,
        KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyOutcome::Cancelled
        }
        KeyCode::Backspace => {
            password.pop();
            KeyOutcome::Continue
        }
        KeyCode::Char(c) => {
            password.push(c);
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}
