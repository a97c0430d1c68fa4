//! State management
//!
//! The registry controller and the pieces it is built from: the edit
//! surface and confirmations, notifications, and the event dispatcher
//! views subscribe through.

pub mod controller;
pub mod dispatcher;
pub mod edit_surface;
pub mod events;
pub mod notifications;

pub use controller::{CommitOutcome, ControllerError, LoadState, RegistryController};
