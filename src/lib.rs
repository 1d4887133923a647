//! Junction Simulation Library
//!
//! A discrete-time simulation of one signalized road intersection that can
//! run headless or behind the interactive console menu.

pub mod simulation;
