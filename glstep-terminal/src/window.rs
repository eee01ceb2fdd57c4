/// Terminal window: raw-mode guard plus the view state driven by input
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, terminal,
};
use std::io::{self, stdout};
use std::time::Duration;

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

const MOVE_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 5.0;
const MIN_SCALE: f32 = 10.0;
const MAX_SCALE: f32 = 300.0;

/// What a key press asks the application to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Move(f32, f32),
    Zoom(f32),
    TogglePause,
}

/// Map a key to an action
pub fn action_for(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('w') | KeyCode::Up => Some(Action::Move(0.0, MOVE_STEP)),
        KeyCode::Char('s') | KeyCode::Down => Some(Action::Move(0.0, -MOVE_STEP)),
        KeyCode::Char('a') | KeyCode::Left => Some(Action::Move(-MOVE_STEP, 0.0)),
        KeyCode::Char('d') | KeyCode::Right => Some(Action::Move(MOVE_STEP, 0.0)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::Zoom(ZOOM_STEP)),
        KeyCode::Char('-') => Some(Action::Zoom(-ZOOM_STEP)),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        _ => None,
    }
}

/// Size, zoom and model offset of the view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Columns and rows of the drawing area
    pub cols: u16,
    pub rows: u16,
    /// Zoom; `scale * 0.01` is the vertical field of view in radians
    pub scale: f32,
    /// Model offset in world units
    pub location: [f32; 2],
}

impl ViewState {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            scale: 100.0,
            location: [0.0, 0.0],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        log::debug!("resize to {}x{}", cols, rows);
        self.cols = cols;
        self.rows = rows;
    }

    /// Width over height of the drawing area in square units
    pub fn aspect(&self) -> f32 {
        if self.rows == 0 {
            return 1.0;
        }
        self.cols as f32 / (self.rows as f32 * CELL_ASPECT)
    }

    pub fn fovy(&self) -> f32 {
        self.scale * 0.01
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move(dx, dy) => {
                self.location[0] += dx;
                self.location[1] += dy;
            }
            Action::Zoom(delta) => {
                self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
            }
            Action::Quit | Action::TogglePause => {}
        }
    }
}

/// Owns the terminal while the demo runs.
///
/// Creating a window switches to raw mode on the alternate screen; dropping
/// it restores the terminal, also when the frame loop bails out early.
pub struct Window {
    view: ViewState,
    should_close: bool,
}

impl Window {
    pub fn open() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        log::info!("window opened at {}x{}", cols, rows);

        Ok(Self {
            view: ViewState::new(cols, rows),
            should_close: false,
        })
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    /// Drain pending terminal events without blocking.
    ///
    /// Returns the actions the application has to handle itself.
    pub fn poll_events(&mut self) -> io::Result<Vec<Action>> {
        let mut pending = Vec::new();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(KeyEvent { code, kind, .. }) if kind != KeyEventKind::Release => {
                    match action_for(code) {
                        Some(Action::Quit) => self.should_close = true,
                        Some(action @ Action::TogglePause) => pending.push(action),
                        Some(action) => self.view.apply(action),
                        None => {}
                    }
                }
                Event::Resize(cols, rows) => self.view.resize(cols, rows),
                _ => {}
            }
        }
        Ok(pending)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        log::info!("window closed");
    }
}
