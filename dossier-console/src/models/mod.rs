pub mod user;

pub use user::{ConsoleUser, SessionHandle};
