//! Profile orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! GET /db/user-profile/{email}
//!     → profile.rs (ProfileOrchestrator)
//!         → phase.rs: lookup  = user ║ trending
//!         → phase.rs: refresh = last_login write ║ user posts
//!     → types.rs (UserProfile assembly, timestamp formatting)
//! ```
//!
//! # Design Decisions
//! - Both operations of a phase are polled on the request task with
//!   `tokio::join!`; no spawned tasks to leak on cancellation
//! - A phase always waits for both operations, even after one failed
//! - The refresh phase depends on the subject id and never overlaps lookup

pub mod phase;
pub mod profile;
pub mod types;

pub use phase::{join_phase, Phase, PhaseResult};
pub use profile::ProfileOrchestrator;
pub use types::{PostView, UserProfile};
