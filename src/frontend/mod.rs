//! Terminal front end: boot flags, command parsing, rendering and the
//! interactive loop.

pub mod args;
pub mod command;
pub mod game;
pub mod renderer;
