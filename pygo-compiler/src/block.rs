// Per-function bookkeeping for the lowering stage: labels, checkpoints, temps

use crate::writer::{CheckpointId, CheckpointSet, TempVar};
use std::collections::BTreeMap;

/// Type given to temporaries when the caller has no better one
pub const DEFAULT_TEMP_TYPE: &str = "*πg.Object";

/// State accumulated while a function body is being lowered.
///
/// Labels and checkpoints share one counter, so ids are unique within the
/// function; 0 is never handed out because it is the entry state.
#[derive(Debug, Clone, Default)]
pub struct FunctionBlock {
    name: String,
    label_count: CheckpointId,
    checkpoints: CheckpointSet,
    temp_count: u32,
    used_temps: BTreeMap<String, TempVar>,
    free_temps: BTreeMap<String, TempVar>,
}

impl FunctionBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// New jump target that is not a resumption point
    pub fn gen_label(&mut self) -> CheckpointId {
        self.label_count += 1;
        self.label_count
    }

    /// New label that a suspended frame may resume at
    pub fn gen_checkpoint(&mut self) -> CheckpointId {
        let id = self.gen_label();
        self.checkpoints.insert(id);
        id
    }

    pub fn checkpoints(&self) -> &CheckpointSet {
        &self.checkpoints
    }

    /// Allocate a temporary of type `ty`, reusing a freed one of the same type if possible
    pub fn alloc_temp(&mut self, ty: &str) -> TempVar {
        let reusable = self
            .free_temps
            .values()
            .find(|temp| temp.ty == ty)
            .map(|temp| temp.name.clone());

        let temp = match reusable.and_then(|name| self.free_temps.remove(&name)) {
            Some(temp) => temp,
            None => {
                self.temp_count += 1;
                TempVar::new(format!("πTemp{:03}", self.temp_count), ty)
            }
        };
        self.used_temps.insert(temp.name.clone(), temp.clone());
        temp
    }

    /// Return a temporary to the pool. Unknown or already freed temps are ignored.
    pub fn free_temp(&mut self, temp: &TempVar) {
        if let Some(temp) = self.used_temps.remove(&temp.name) {
            self.free_temps.insert(temp.name.clone(), temp);
        }
    }

    /// Every temporary ever allocated, in use or not
    pub fn temps(&self) -> impl Iterator<Item = &TempVar> {
        self.used_temps.values().chain(self.free_temps.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_checkpoints_share_ids() {
        let mut block = FunctionBlock::new("f");
        assert_eq!(block.gen_label(), 1);
        assert_eq!(block.gen_checkpoint(), 2);
        assert_eq!(block.gen_label(), 3);
        assert_eq!(block.gen_checkpoint(), 4);
        assert_eq!(block.checkpoints().iter().copied().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_temp_reuse_matches_type() {
        let mut block = FunctionBlock::new("f");
        let a = block.alloc_temp(DEFAULT_TEMP_TYPE);
        let b = block.alloc_temp("bool");
        assert_eq!(a.name, "πTemp001");
        assert_eq!(b.name, "πTemp002");

        block.free_temp(&a);
        block.free_temp(&b);

        let c = block.alloc_temp("bool");
        assert_eq!(c.name, "πTemp002");
        let d = block.alloc_temp("int");
        assert_eq!(d.name, "πTemp003");

        let names: Vec<_> = block.temps().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"πTemp001"));
    }

    #[test]
    fn test_double_free_ignored() {
        let mut block = FunctionBlock::new("f");
        let a = block.alloc_temp(DEFAULT_TEMP_TYPE);
        block.free_temp(&a);
        block.free_temp(&a);
        assert_eq!(block.temps().count(), 1);
        assert_eq!(block.alloc_temp(DEFAULT_TEMP_TYPE).name, a.name);
    }
}
