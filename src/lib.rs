//! Suspend and resume Windows processes through Sysinternals PsTools.
//!
//! The library holds everything except the window itself, so the binary in
//! `main.rs` is only Slint wiring.

pub mod services;
