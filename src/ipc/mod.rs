mod command;
mod error;
mod frame;
mod handlers;
mod router;
mod session;
mod types;

pub use frame::{read_frame, write_frame};
pub use router::handle_command;
pub use session::Session;
pub use types::{to_wire, AppState};
