mod context;
pub mod diff;
pub mod extract;
pub mod init;
pub mod sync;

pub use context::RunContext;
