//! Interactive compression and conflict engine.
//!
//! Works directly on the live [`Board`](crate::models::Board), which may
//! be infeasible at any moment — conflicts are advisory annotations and
//! every operation either improves the board or leaves it untouched.
//!
//! - [`compress_earliest`] / [`compress_latest`]: reposition one task
//!   into the first/last machine gap consistent with its links, the
//!   deadline marker, and its successors.
//! - [`scan_conflicts`]: re-run after every edit; flags both endpoints of
//!   each violated link and every overlapping machine pair.
//! - [`auto_fix`]: topologically ordered forward repair, then a re-scan.

mod compress;
mod conflict;

pub use compress::{compress_earliest, compress_latest};
pub use conflict::{auto_fix, flagged_tasks, scan_conflicts, Conflict, ConflictKind};
