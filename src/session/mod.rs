//! Session lifecycle
//!
//! Everything here is independent of the browser:
//! - Randomness, wall clock and countdown timer are injected
//! - Audio and motion are fire-and-forget capabilities
//! - State lives in one controller instance, never in globals

pub mod clock;
pub mod controller;
pub mod effects;
pub mod history;
pub mod random;
pub mod state;
pub mod timer;

pub use clock::{Clock, LocalClock, StepClock};
pub use controller::{SessionController, StartOutcome, TickOutcome};
pub use effects::{AudioController, MotionController, SilentAudio};
pub use history::SessionHistory;
pub use random::{PcgRandom, RandomSource, ScriptedRandom};
pub use state::{ActiveSession, Session, SessionId, SessionPhase, Snapshot};
pub use timer::{ManualHandle, ManualScheduler, Scheduler, TimerHandle};
