//! Command implementations for zimport CLI

#[cfg(feature = "blaster")] pub mod blaster;
#[cfg(feature = "scan")] pub mod scan;
pub mod config;
