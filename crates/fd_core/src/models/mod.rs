pub mod candidate;
pub mod history;
pub mod policy;
pub mod result;

pub use candidate::{Candidate, CandidateId, CandidateStatus, Gender};
pub use history::{EventKind, HistoryEvent, HistoryIndex};
pub use policy::{FairnessPolicy, GroupStrategy};
pub use result::{ExclusionReason, GroupResult, PickResult, ResultMeta, Trace};
