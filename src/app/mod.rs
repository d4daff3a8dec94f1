// Application services built on the engine and a caller-supplied result store.

pub mod session;

pub use session::{ConcentrationOptions, ProgressService, SubmissionReceipt};
