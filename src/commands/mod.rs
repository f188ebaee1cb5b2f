pub mod control;
pub mod status;
pub mod watch;

pub use control::{cmd_open, cmd_remove, cmd_start, cmd_stop};
pub use status::{cmd_logs, cmd_status};
pub use watch::cmd_watch;
