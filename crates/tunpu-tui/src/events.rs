//! Terminal input translated into application events.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use std::time::Duration;

/// Left-button pointer phases, in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pointer {
    Down,
    Move,
    Up,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Ctrl+C
    Quit,
    ToggleTheme,
    ToggleScenic,
    ToggleServices,
    Submit,
    Escape,
    Backspace,
    /// A printable character. Digits double as jump keys when the input is
    /// empty; the app decides.
    Input(char),
    StepHero(i64),
    /// F1/F2: the active hero card's action buttons.
    HeroAction(usize),
    Pointer {
        phase: Pointer,
        column: u16,
        row: u16,
    },
    /// One wheel notch; positive scrolls forward.
    Wheel {
        column: u16,
        row: u16,
        direction: i8,
    },
    /// The layout is recomputed every frame, so the new size is not kept.
    Resize,
    None,
}

#[derive(Clone)]
pub struct EventHandler {
    timeout: Duration,
}

impl EventHandler {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Wait up to the frame timeout for input.
    pub fn next_event(&self) -> std::io::Result<AppEvent> {
        if crossterm::event::poll(self.timeout)? {
            Ok(translate(crossterm::event::read()?))
        } else {
            Ok(AppEvent::None)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

pub fn translate(event: Event) -> AppEvent {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(key),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(..) => AppEvent::Resize,
        _ => AppEvent::None,
    }
}

fn translate_key(key: KeyEvent) -> AppEvent {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => AppEvent::Quit,
            KeyCode::Char('t') => AppEvent::ToggleTheme,
            KeyCode::Char('e') => AppEvent::ToggleScenic,
            KeyCode::Char('s') => AppEvent::ToggleServices,
            _ => AppEvent::None,
        };
    }
    match key.code {
        KeyCode::Enter => AppEvent::Submit,
        KeyCode::Esc => AppEvent::Escape,
        KeyCode::Backspace => AppEvent::Backspace,
        KeyCode::Left => AppEvent::StepHero(-1),
        KeyCode::Right => AppEvent::StepHero(1),
        KeyCode::F(1) => AppEvent::HeroAction(0),
        KeyCode::F(2) => AppEvent::HeroAction(1),
        KeyCode::Char(c) => AppEvent::Input(c),
        _ => AppEvent::None,
    }
}

fn translate_mouse(mouse: MouseEvent) -> AppEvent {
    let (column, row) = (mouse.column, mouse.row);
    let pointer = |phase| AppEvent::Pointer { phase, column, row };
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => pointer(Pointer::Down),
        MouseEventKind::Drag(MouseButton::Left) => pointer(Pointer::Move),
        MouseEventKind::Up(MouseButton::Left) => pointer(Pointer::Up),
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight => AppEvent::Wheel {
            column,
            row,
            direction: 1,
        },
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft => AppEvent::Wheel {
            column,
            row,
            direction: -1,
        },
        _ => AppEvent::None,
    }
}
