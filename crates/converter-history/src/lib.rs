pub mod session;
pub mod store;

pub use session::SessionHistory;
pub use store::HistoryStore;
