//! Hidden password input on the terminal.

use std::{error::Error, io::Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal::{self, ClearType},
};

type PromptResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const MAX_ATTEMPTS: usize = 3;

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> PromptResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn notice(message: &str) -> PromptResult<()> {
    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(message),
        Print("\r\n")
    )?;
    Ok(())
}

/// Read one line, echoing `*` for every character typed.
fn read_masked(prompt: &str) -> PromptResult<String> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                return Ok(buf);
            }
            KeyCode::Backspace if buf.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }
}

/// Ask for a new password and its confirmation.
pub fn new_password() -> PromptResult<String> {
    for _ in 0..MAX_ATTEMPTS {
        let password = read_masked("Password: ")?;
        if password.is_empty() {
            notice("Password must not be empty.")?;
            continue;
        }

        if read_masked("Confirm password: ")? == password {
            return Ok(password);
        }
        notice("Passwords do not match. Try again.")?;
    }

    Err("too many attempts".into())
}
