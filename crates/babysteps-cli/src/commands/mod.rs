//! CLI subcommand implementations.

pub mod ask;
pub mod babies;
pub mod history;
pub mod init;
pub mod log;
pub mod lullabies;
pub mod summary;
pub mod theme;
pub mod timer;
pub mod util;
pub mod videos;
