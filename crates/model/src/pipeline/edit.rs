//! Editing operations. Each takes a pipeline snapshot and returns a new one;
//! every result satisfies the connector-count invariant.

use super::{Connector, Pipeline};
use crate::step::{Step, patch::StepPatch};
use tracing::debug;

impl Pipeline {
    /// Inserts `step` at `position` (clamped to `0..=len`).
    ///
    /// The new step is joined to its left neighbour with `AND`; at the head
    /// of a non-empty pipeline it is joined to its right neighbour instead.
    pub fn insert_step(&self, position: usize, step: Step) -> Pipeline {
        let mut next = self.clone();
        let position = position.min(next.steps.len());
        next.steps.insert(position, step);

        if next.steps.len() > 1 {
            let at = position.saturating_sub(1).min(next.connectors.len());
            next.connectors.insert(at, Connector::And);
        }
        next.normalize_connectors();
        next
    }

    pub fn push_step(&self, step: Step) -> Pipeline {
        self.insert_step(self.steps.len(), step)
    }

    /// Removes the step at `index` together with the connector to its left,
    /// or the leading connector when removing the first step. Out-of-range
    /// indices leave the pipeline unchanged.
    pub fn remove_step(&self, index: usize) -> Pipeline {
        if index >= self.steps.len() {
            debug!(
                "Ignoring removal of step {} from a pipeline of {}",
                index,
                self.steps.len()
            );
            return self.clone();
        }

        let mut next = self.clone();
        next.steps.remove(index);
        if index > 0 && index - 1 < next.connectors.len() {
            next.connectors.remove(index - 1);
        } else if !next.connectors.is_empty() {
            next.connectors.remove(0);
        }
        next.normalize_connectors();
        next
    }

    /// Merges `patch` into the step at `index`; see [`Step::patched`] for the
    /// value-mode rules. Out-of-range indices leave the pipeline unchanged.
    pub fn update_step(&self, index: usize, patch: StepPatch) -> Pipeline {
        let mut next = self.clone();
        match next.steps.get_mut(index) {
            Some(step) => *step = step.patched(patch),
            None => debug!("Ignoring update of missing step {}", index),
        }
        next
    }

    /// Sets the connector at `index`, appending when `index == len`, then
    /// pads with `AND` or truncates back to the invariant.
    pub fn update_connector(&self, index: usize, connector: Connector) -> Pipeline {
        let mut next = self.clone();
        if index < next.connectors.len() {
            next.connectors[index] = connector;
        } else if index == next.connectors.len() {
            next.connectors.push(connector);
        } else {
            debug!("Ignoring connector update at {}", index);
        }
        next.normalize_connectors();
        next
    }

    pub fn clear(&self) -> Pipeline {
        Pipeline::new()
    }
}
