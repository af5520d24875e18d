//! Host bridge exposing the deadlines core to the menu-bar UI.

pub mod api;
