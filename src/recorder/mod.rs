pub mod change_recorder;
pub mod global;
pub mod hook;
pub mod record;
pub mod stack;

pub use change_recorder::{CaptureState, ChangeRecorder};
pub use hook::DebuggableState;
pub use record::{StateChangeRecord, StateValue};
pub use stack::{CallSiteTrace, StackTraceSource, StaticTrace};
