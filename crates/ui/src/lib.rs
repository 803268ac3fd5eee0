pub mod app;
pub mod scroll;
pub mod state;
pub mod theme;
pub mod transcript;

pub use app::App;
pub use scroll::{ScrollController, ScrollMetrics, ScrollTarget, Throttle};
pub use state::{ConnectionStatus, InputState, SessionState, Viewport};
pub use theme::Theme;
pub use transcript::{Applied, StreamingState, Transcript, TranscriptLayout, TranscriptRenderer, Turn, TurnId};
