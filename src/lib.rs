pub mod config;
pub mod prompt;
pub mod report;
pub mod source;

pub mod commands {
    pub mod shot;
}

pub use commands::shot::{Options, Outcome, ShotError, run};
