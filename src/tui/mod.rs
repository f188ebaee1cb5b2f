mod ansi;
mod app;
mod message;
mod render;
mod run;

pub use app::{AppOptions, Bindings, TuiApp, View};
pub use message::TuiMessage;
pub use run::run_dashboard;
