//! Core application primitives (orchestrator, scheduler, HTTP surface)

pub mod bootstrap;
pub mod http;
pub mod scheduler;
pub mod seeder;
pub mod updater;

pub use bootstrap::*;
pub use http::*;
pub use scheduler::*;
pub use seeder::*;
pub use updater::*;
