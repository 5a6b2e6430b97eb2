//! Client-side application state.

pub mod session;
