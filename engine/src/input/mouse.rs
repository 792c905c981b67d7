//! Mouse Input Module
//!
//! Pointer position, button identity and the pointer event stream
//! (down / move / up / leave) consumed by the sandbox.
//! Decoupled from winit apart from the button conversion.

/// Mouse button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    /// Additional mouse buttons (button 4, 5, etc.)
    Other(u16),
}

impl MouseButton {
    /// The primary button starts drags; every button toggles selection.
    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Back => MouseButton::Other(3),
            winit::event::MouseButton::Forward => MouseButton::Other(4),
            winit::event::MouseButton::Other(n) => MouseButton::Other(n),
        }
    }
}

/// State of all mouse buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonState {
    pub left: bool,
    pub middle: bool,
    pub right: bool,
}

impl ButtonState {
    /// Update button state for a specific button.
    pub fn set(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Middle => self.middle = pressed,
            MouseButton::Right => self.right = pressed,
            MouseButton::Other(_) => {}
        }
    }

    /// Check if any button is pressed.
    pub fn any_pressed(&self) -> bool {
        self.left || self.middle || self.right
    }

    /// Reset all buttons to released state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 2D pixel position, origin top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Position {
    fn from(tuple: (f32, f32)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

/// One event of the pointer stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Position, button: MouseButton },
    Move { position: Position },
    Up { position: Position, button: MouseButton },
    /// The pointer left the canvas.
    Leave,
}

/// Turns raw cursor/button callbacks into [`PointerEvent`]s.
///
/// Window systems report the cursor position and button changes separately;
/// this remembers the last position so button events carry a coordinate.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Position,
    buttons: ButtonState,
    inside: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Current button state.
    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    /// Cursor moved to `(x, y)` pixels.
    pub fn moved(&mut self, x: f32, y: f32) -> PointerEvent {
        self.position = Position::new(x, y);
        self.inside = true;
        PointerEvent::Move { position: self.position }
    }

    /// Button pressed at the last known position.
    pub fn pressed(&mut self, button: MouseButton) -> PointerEvent {
        self.buttons.set(button, true);
        PointerEvent::Down { position: self.position, button }
    }

    /// Button released at the last known position.
    pub fn released(&mut self, button: MouseButton) -> PointerEvent {
        self.buttons.set(button, false);
        PointerEvent::Up { position: self.position, button }
    }

    /// Cursor left the window. Buttons are considered released.
    pub fn left(&mut self) -> PointerEvent {
        self.inside = false;
        self.buttons.reset();
        PointerEvent::Leave
    }

    /// Whether the cursor is inside the window.
    pub fn is_inside(&self) -> bool {
        self.inside
    }
}
