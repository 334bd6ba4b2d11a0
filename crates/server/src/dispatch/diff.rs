use shared_types::CaseSnapshot;

/// Field transitions between the previous and current snapshots of a case.
///
/// Snapshot diffing is a pure function consumed by handlers whose trigger
/// is a transition rather than a state — keeping the comparisons in one
/// place instead of scattered across handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// The joint-party flag moved from absent/"No" to "Yes".
    pub joint_party_added: bool,
}

/// Compare two snapshots. `previous` is `None` for events that carry no
/// prior state; a flag that is explicitly "Yes" now still counts as a
/// transition then.
pub fn diff(previous: Option<&CaseSnapshot>, current: &CaseSnapshot) -> ChangeSet {
    let had_joint_party = previous.is_some_and(|p| p.has_joint_party());

    ChangeSet {
        joint_party_added: current.has_joint_party() && !had_joint_party,
    }
}
