//! GPS lap timing around a single start/finish line.
//!
//! Fixes are fed one at a time. Near the line they are buffered, and once the
//! vehicle has clearly left the line again the exact crossing instant is
//! reconstructed between samples and handed to the lap ledger.
//!
//! ## Modules
//!
//! - [`buffer`] - fixed-capacity ring of fixes recorded near the line
//! - [`interpolate`] - bracketing pair search, linear and Catmull-Rom reconstruction
//! - [`crossing`] - idle/armed state machine
//! - [`ledger`] - lap count, last/best lap, pace
//! - [`odometer`] - 3-D distance accumulator
//! - [`events`] - diagnostic events and observers
//! - [`timer`] - the [`LapTimer`] facade

pub mod buffer;
pub mod config;
pub mod crossing;
pub mod error;
pub mod events;
pub mod interpolate;
pub mod ledger;
pub mod odometer;
pub mod timer;

pub use buffer::CrossingBuffer;
pub use config::{InterpolationStrategy, TimerConfig};
pub use crossing::{CrossingDetector, CrossingState};
pub use error::InterpolationError;
pub use events::{NoopObserver, TimingEvent, TimingObserver, TracingObserver};
pub use ledger::{CrossingOutcome, LapLedger};
pub use odometer::Odometer;
pub use timer::LapTimer;
