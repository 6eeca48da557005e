//! Breathe Platform Abstraction Layer
//!
//! This crate defines the capabilities the breathing timer borrows from
//! whatever platform it runs on. The same core logic drives a browser-like
//! host, a terminal, or a small board with an LED ring and a buzzer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (breathe-widget, etc.)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  breathe-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  file store,  │       │ MemoryStore,  │
//! │  host locks   │       │  test fakes   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`storage::KeyValueStore`] - Persistent settings storage
//! - [`resource::WakeLock`] - Keep the display awake during a session
//! - [`resource::AudioUnlock`] - Unlock audio playback on restrictive platforms

#![no_std]
#![deny(unsafe_code)]

pub mod memory;
pub mod resource;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use memory::MemoryStore;
pub use resource::{AudioUnlock, ResourceError, WakeLock};
pub use storage::{KeyValueStore, StorageError, StorageKey};
