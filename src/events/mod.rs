//! # Events Module
//!
//! Fire-and-forget progress reporting for the hashing and matching engines.
//!
//! ## Design
//! The engines emit events through channels, allowing any UI
//! (CLI, GUI) to subscribe and display progress. They never wait on a
//! listener and never read state back.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Progress(ProgressEvent::PhaseChanged { text }) = event {
//!             println!("{}", text);
//!         }
//!     }
//! });
//!
//! let result = CompareTask::builder().lists(lists).build().run(&sender);
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
