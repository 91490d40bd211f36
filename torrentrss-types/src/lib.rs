mod config;
pub use config::*;

mod entry;
pub use entry::*;

mod episode_number;
pub use episode_number::*;
