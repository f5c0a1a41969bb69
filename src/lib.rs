// src/lib.rs

pub mod blockchain;
pub mod bridge;
pub mod cli;
pub mod core;

pub use bridge::{BridgeSession, Surface, TerminalSurface};
pub use self::core::config::BridgeConfig;
pub use self::core::errors::BridgeError;
