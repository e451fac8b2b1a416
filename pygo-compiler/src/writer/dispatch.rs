// Checkpoint dispatch: which label a resumed frame jumps to

use std::collections::BTreeSet;

/// Identifier of a resumption point within one function
pub type CheckpointId = u32;

/// Checkpoints of one function, ordered
pub type CheckpointSet = BTreeSet<CheckpointId>;

/// Frame state as seen by the dispatch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// State 0: start of the function body
    Entry,
    /// Resume at the given checkpoint
    Checkpoint(CheckpointId),
    /// Negative state: the frame has finished
    Terminated,
}

impl FrameState {
    pub fn from_raw(state: i32) -> Self {
        match CheckpointId::try_from(state) {
            Ok(0) => FrameState::Entry,
            Ok(id) => FrameState::Checkpoint(id),
            Err(_) => FrameState::Terminated,
        }
    }
}

/// Where the dispatch sends a frame in a given state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchTarget {
    /// Fall through to the top of the body
    FallThrough,
    /// `goto` the checkpoint's label
    Jump(CheckpointId),
    /// Unknown state: code generator bug, the emitted code panics
    Abort,
    /// Loop condition fails; the function returns
    Exit,
}

/// Jump table of one function: state 0 falls through, each checkpoint jumps
/// to its label, anything else aborts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    checkpoints: Vec<CheckpointId>,
}

impl DispatchTable {
    /// Checkpoint 0, if present, is the implicit entry and gets no jump
    pub fn from_checkpoints(checkpoints: &CheckpointSet) -> Self {
        Self {
            checkpoints: checkpoints.iter().copied().filter(|&id| id != 0).collect(),
        }
    }

    pub fn target(&self, state: FrameState) -> DispatchTarget {
        match state {
            FrameState::Entry => DispatchTarget::FallThrough,
            FrameState::Checkpoint(id) if self.checkpoints.binary_search(&id).is_ok() => {
                DispatchTarget::Jump(id)
            }
            FrameState::Checkpoint(_) => DispatchTarget::Abort,
            FrameState::Terminated => DispatchTarget::Exit,
        }
    }

    /// Switch cases in emission order, entry first
    pub fn cases(&self) -> impl Iterator<Item = (CheckpointId, DispatchTarget)> + '_ {
        std::iter::once((0, DispatchTarget::FallThrough)).chain(
            self.checkpoints
                .iter()
                .map(|&id| (id, DispatchTarget::Jump(id))),
        )
    }
}

/// Go label marking checkpoint `id`
pub fn label_name(id: CheckpointId) -> String {
    format!("Label{}", id)
}
