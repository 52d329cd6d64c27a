//! Zaintza Server wiring

pub mod bootstrap;
