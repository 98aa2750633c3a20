/// Keyboard key identifier.
///
/// Platforms map their key codes onto these; anything else arrives as
/// `Unknown` with the platform's code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    /// ASCII letter, stored uppercase.
    Letter(char),
    /// Digit row key, `0..=9`.
    Digit(u8),
    /// Function key, `F1..=F24`.
    Function(u8),

    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Platform-agnostic input event.
///
/// Positions are device-independent pixels relative to the window's top-left,
/// the same space as the outside size the platform reports.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, state: ButtonState },
    ModifiersChanged(Modifiers),
    PointerMoved { x: f64, y: f64 },
    PointerLeft,
    Button { button: MouseButton, state: ButtonState },
    Wheel { dx: f64, dy: f64 },
    Text(String),
    Focused(bool),
}
