//! Console-wide constants, button identities and the audio seam
//!
//! Everything a game can observe about the machine it runs on lives here:
//! the logical resolution, the tick rate, the fixed set of logical buttons
//! and the trait audio backends implement.

/// Logical frame buffer width in pixels
pub const VIEW_WIDTH: u32 = 240;
/// Logical frame buffer height in pixels
pub const VIEW_HEIGHT: u32 = 144;
/// Fixed simulation rate in Hz
pub const TICK_RATE: u32 = 60;

/// Number of song slots and sample slots a game may use
pub const AUDIO_SLOTS: usize = 31;
/// Number of simultaneous sample channels
pub const SAMPLE_CHANNELS: usize = 8;

/// Logical button identity.
///
/// The discriminant is the id games pass to `query_button`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    B = 4,
    A = 5,
    Start = 6,
}

impl Button {
    pub const COUNT: usize = 7;

    pub const ALL: [Button; Self::COUNT] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::B,
        Button::A,
        Button::Start,
    ];

    /// Map a script-facing id to a button; out-of-range ids yield `None`
    pub fn from_id(id: i32) -> Option<Self> {
        usize::try_from(id)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name used for config keys and script constants
    pub fn name(self) -> &'static str {
        match self {
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
            Button::B => "b",
            Button::A => "a",
            Button::Start => "start",
        }
    }
}

/// Debounced three-state button signal.
///
/// Ordered so that merging sources is a plain `max`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ButtonState {
    #[default]
    Released = 0,
    JustPressed = 1,
    Held = 2,
}

impl ButtonState {
    /// Advance a polled counter one tick: pressed counts up to `Held`,
    /// released snaps back to `Released`.
    pub fn step(self, pressed: bool) -> Self {
        match (pressed, self) {
            (false, _) => ButtonState::Released,
            (true, ButtonState::Released) => ButtonState::JustPressed,
            (true, _) => ButtonState::Held,
        }
    }

    pub fn is_down(self) -> bool {
        self != ButtonState::Released
    }
}

/// Sample channel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// First idle channel (or every channel, for stop)
    Any,
    Index(usize),
}

impl Channel {
    /// Decode a script channel argument; `-1` selects any channel
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(Channel::Any),
            n if n >= 0 && (n as usize) < SAMPLE_CHANNELS => Some(Channel::Index(n as usize)),
            _ => None,
        }
    }
}

/// Audio backend trait.
///
/// Ids and channels are already range-checked by the caller; backends
/// only need to handle slots that failed to load.
pub trait Audio {
    /// Start a song, replacing whatever is playing
    fn play_song(&mut self, id: usize, looping: bool);
    /// Stop the current song
    fn stop_song(&mut self);
    /// Start a sample on a channel
    fn play_sample(&mut self, id: usize, channel: Channel, looping: bool);
    /// Stop one channel, or all channels for `Channel::Any`
    fn stop_sample(&mut self, channel: Channel);
}

/// Silent audio backend for headless runs and disabled audio
#[derive(Debug, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_song(&mut self, _id: usize, _looping: bool) {}
    fn stop_song(&mut self) {}
    fn play_sample(&mut self, _id: usize, _channel: Channel, _looping: bool) {}
    fn stop_sample(&mut self, _channel: Channel) {}
}
