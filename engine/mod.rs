//! The sweep itself: odometer, duplicate filter, materializer, and the
//! sequential and parallel drivers.

mod enumerator;
mod filter;
mod materialize;
mod odometer;
mod parallel;

pub use enumerator::{
    Control, EnumerationOptions, Enumerator, FingerprintRetention, Outcome, Session,
};
pub use filter::{Rule, Verdict};
pub use odometer::Odometer;
pub use parallel::{ParallelEnumerator, ParallelSession};
