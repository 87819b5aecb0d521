//! Shared test doubles for the bizflow reactive core.

mod clock;
mod completion;
mod handler;
mod mutation;

pub use clock::{FixedClock, fixed_now};
pub use completion::{FailingCompletionService, ScriptedCompletionService};
pub use handler::{FailingHandler, Journal, RecordingHandler};
pub use mutation::{FailingMutationSink, RecordingMutationSink};
