//! Domain types for CloseCast.

pub mod bar;

pub use bar::Bar;
