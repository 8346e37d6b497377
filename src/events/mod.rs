//! # Events Module
//!
//! Progress reporting for whatever drives the pipeline (the CLI, tests).
//!
//! The core emits [`Event`]s through an [`EventSender`]; a receiver on
//! another thread can render them. Sending never fails the run: if nobody
//! listens, events are dropped.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Fingerprint(FingerprintEvent::Progress { completed, .. }) = event {
//!             println!("{completed} files fingerprinted");
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
