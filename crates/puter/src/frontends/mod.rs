//! Language frontends for Puter
//!
//! This module contains implementations of the `LanguageFrontend` trait.

pub mod puter;

pub use puter::PuterFrontend;
