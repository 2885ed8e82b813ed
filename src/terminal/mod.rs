use crossterm::event::{self, Event as CtEvent, KeyEventKind};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute};
use std::io::{self, Write};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        control: false,
        alt: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    Resize,
}

/// Raw-mode terminal wrapper for the demo driver. The library core never
/// touches it; delegates see only the `KeyEvent` type above.
pub struct Terminal {
    raw: bool,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        Ok(Self { raw: false })
    }

    pub fn enter_raw_mode(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        self.raw = true;
        execute!(io::stdout(), cursor::Hide)
    }

    pub fn exit_raw_mode(&mut self) -> io::Result<()> {
        execute!(io::stdout(), cursor::Show)?;
        self.raw = false;
        disable_raw_mode()
    }

    pub fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event(&mut self) -> io::Result<TerminalEvent> {
        loop {
            match event::read()? {
                CtEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(TerminalEvent::Key(map_key(key)));
                }
                CtEvent::Resize(_, _) => return Ok(TerminalEvent::Resize),
                _ => {}
            }
        }
    }

    pub fn draw_lines(&mut self, lines: &[String]) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
        for line in lines {
            write!(stdout, "{line}\r\n")?;
        }
        stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.raw {
            let _ = self.exit_raw_mode();
        }
    }
}

fn map_key(key: event::KeyEvent) -> KeyEvent {
    let code = match key.code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        _ => KeyCode::Other,
    };
    KeyEvent {
        code,
        modifiers: KeyModifiers {
            shift: key.modifiers.contains(event::KeyModifiers::SHIFT),
            control: key.modifiers.contains(event::KeyModifiers::CONTROL),
            alt: key.modifiers.contains(event::KeyModifiers::ALT),
        },
    }
}
