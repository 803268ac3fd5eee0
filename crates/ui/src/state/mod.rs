mod input;
mod session;
mod viewport;

pub use input::InputState;
pub use session::{ConnectionStatus, SessionState};
pub use viewport::Viewport;
