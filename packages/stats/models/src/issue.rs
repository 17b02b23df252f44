use serde::{Deserialize, Serialize};

/// Counters derived from one scan of the issue list.
///
/// `labels` is not a partition of the issues: an issue with several labels
/// is counted once under each of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    pub total: u64,
    pub open: u64,
    pub closed: u64,
    pub labels: Vec<LabelCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub name: String,
    pub count: u64,
    pub color: String,
}
