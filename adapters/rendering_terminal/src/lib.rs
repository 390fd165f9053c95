#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal rendering backend built on `crossterm`.
//!
//! The backend switches the terminal into raw mode on an alternate screen,
//! redraws the whole scene before every turn and reads exactly one key per
//! turn. The terminal is restored when the session ends, including on error.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use stealth_maze_core::Direction;
use stealth_maze_rendering::{Presentation, RenderingBackend, Scene, SessionState, TurnInput};

/// Terminal backend that draws scenes as text.
#[derive(Debug, Default)]
pub struct TerminalBackend;

impl TerminalBackend {
    /// Creates a new terminal backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RenderingBackend for TerminalBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(TurnInput, &mut Scene) -> SessionState,
    {
        let mut terminal = TerminalGuard::enter()?;
        let Presentation { title, mut scene } = presentation;
        let mut state = SessionState::Running;

        loop {
            terminal.draw(&title, &scene)?;
            match state {
                SessionState::Running => {}
                SessionState::Finished => {
                    let _ = terminal.read_input()?;
                    break;
                }
                SessionState::Aborted => break,
            }

            let input = terminal.read_input()?;
            tracing::trace!(?input, "turn input captured");
            state = update_scene(input, &mut scene);
        }

        Ok(())
    }
}

/// Maps a key press onto turn input.
///
/// WASD and the arrow keys move, `q`, `Esc` and `Ctrl+C` quit, and every
/// other key lets the turn pass.
#[must_use]
pub fn map_key(key: KeyEvent) -> TurnInput {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return TurnInput::Quit;
    }

    match key.code {
        KeyCode::Char('w' | 'W') | KeyCode::Up => TurnInput::Move(Direction::Up),
        KeyCode::Char('s' | 'S') | KeyCode::Down => TurnInput::Move(Direction::Down),
        KeyCode::Char('a' | 'A') | KeyCode::Left => TurnInput::Move(Direction::Left),
        KeyCode::Char('d' | 'D') | KeyCode::Right => TurnInput::Move(Direction::Right),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => TurnInput::Quit,
        _ => TurnInput::Wait,
    }
}

struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)
            .context("failed to enter the alternate screen")?;
        Ok(Self { stdout })
    }

    fn draw(&mut self, title: &str, scene: &Scene) -> Result<()> {
        queue!(self.stdout, Clear(ClearType::All), MoveTo(0, 0), Print(title), Print("\r\n"))?;
        for line in scene.lines() {
            queue!(self.stdout, Print(line), Print("\r\n"))?;
        }
        self.stdout.flush().context("failed to flush the terminal")
    }

    fn read_input(&mut self) -> Result<TurnInput> {
        loop {
            if let Event::Key(key) = event::read().context("failed to read terminal input")? {
                if key.kind == KeyEventKind::Press {
                    return Ok(map_key(key));
                }
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn wasd_and_arrows_move() {
        assert_eq!(map_key(press(KeyCode::Char('w'))), TurnInput::Move(Direction::Up));
        assert_eq!(map_key(press(KeyCode::Char('S'))), TurnInput::Move(Direction::Down));
        assert_eq!(map_key(press(KeyCode::Left)), TurnInput::Move(Direction::Left));
        assert_eq!(map_key(press(KeyCode::Char('d'))), TurnInput::Move(Direction::Right));
    }

    #[test]
    fn quit_keys_end_the_session() {
        assert_eq!(map_key(press(KeyCode::Char('q'))), TurnInput::Quit);
        assert_eq!(map_key(press(KeyCode::Esc)), TurnInput::Quit);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            TurnInput::Quit
        );
    }

    #[test]
    fn unknown_keys_pass_the_turn() {
        assert_eq!(map_key(press(KeyCode::Char(' '))), TurnInput::Wait);
        assert_eq!(map_key(press(KeyCode::Char('c'))), TurnInput::Wait);
        assert_eq!(map_key(press(KeyCode::Enter)), TurnInput::Wait);
    }
}
