pub mod repo;
pub mod scan;

pub use repo::{GitCli, GixLog, LogEntry, LogReader};
pub use scan::{IdentityFilter, Scanner};
