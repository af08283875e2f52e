//! Headless sandbox around `shapes-core`: a ship, drifting rocks and bullets
//! driven by scripted pilots, with replay, frame export and benchmarking.

pub mod benchmark;
pub mod config;
pub mod entity;
pub mod input;
pub mod pilot;
pub mod rng;
pub mod runner;
pub mod session;
pub mod util;
