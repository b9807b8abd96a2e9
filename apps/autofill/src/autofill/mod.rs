// Form autofill: locate controls on an unknown page that correspond to a saved
// profile and populate them the way a user typing would.
// `plan` is pure; `apply` and `engine` talk to a `Document`, never a global page.

pub mod address;
pub mod apply;
pub mod document;
pub mod engine;
pub mod field_mapping;
pub mod handlers;
pub mod memory;
pub mod name;
pub mod plan;

pub use engine::{AutofillEngine, AutofillTimings, ImmediateScheduler, Scheduler, TokioScheduler};
