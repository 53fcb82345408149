pub mod session;
pub mod shell;
pub mod ui;

pub use session::{ConverterSession, Outcome, Selection, SessionState};
pub use shell::ShellCommand;
