//! Leptos components.

pub mod flow;
