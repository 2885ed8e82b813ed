use crate::core::step::{Step, StepStatus};

/// Ordered steps plus the cursor and per-step statuses. Pure position
/// bookkeeping; gating and events live in the session.
pub struct Flow {
    steps: Vec<Step>,
    current: usize,
    statuses: Vec<StepStatus>,
}

impl Flow {
    pub fn new(steps: Vec<Step>) -> Self {
        let mut statuses = vec![StepStatus::Pending; steps.len()];
        if !statuses.is_empty() {
            statuses[0] = StepStatus::Active;
        }
        Self {
            steps,
            current: 0,
            statuses,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_at(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn current_step(&self) -> &Step {
        &self.steps[self.current]
    }

    pub fn current_step_mut(&mut self) -> &mut Step {
        &mut self.steps[self.current]
    }

    pub fn status_at(&self, index: usize) -> StepStatus {
        self.statuses
            .get(index)
            .copied()
            .unwrap_or(StepStatus::Pending)
    }

    pub fn current_status(&self) -> StepStatus {
        self.status_at(self.current)
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.steps.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Steps that no longer need visiting, for progress displays.
    pub fn settled_count(&self) -> usize {
        self.statuses
            .iter()
            .filter(|status| matches!(status, StepStatus::Done | StepStatus::Skipped))
            .count()
    }

    pub fn advance(&mut self) -> bool {
        self.advance_with(StepStatus::Done)
    }

    pub fn advance_skipped(&mut self) -> bool {
        self.advance_with(StepStatus::Skipped)
    }

    fn advance_with(&mut self, leaving: StepStatus) -> bool {
        if !self.has_next() {
            return false;
        }
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = leaving;
        }
        self.current += 1;
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Active;
        }
        true
    }

    pub fn retreat(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        if let Some(status) = self.statuses.get_mut(self.current)
            && *status == StepStatus::Active
        {
            *status = StepStatus::Pending;
        }
        self.current -= 1;
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Active;
        }
        true
    }

    /// Direct jump; the target becomes active regardless of what lies
    /// between. Callers own the decision of whether jumps are allowed.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        if index == self.current {
            return true;
        }
        if let Some(status) = self.statuses.get_mut(self.current)
            && *status == StepStatus::Active
        {
            *status = StepStatus::Pending;
        }
        self.current = index;
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Active;
        }
        true
    }

    /// Marks the current step skipped in place (terminal-step skip).
    pub fn skip_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Skipped;
        }
    }

    /// Marks the current step done, but never downgrades a skip mark.
    pub fn complete_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current)
            && *status == StepStatus::Active
        {
            *status = StepStatus::Done;
        }
    }

    pub fn cancel_current(&mut self) {
        if let Some(status) = self.statuses.get_mut(self.current) {
            *status = StepStatus::Cancelled;
        }
    }

    pub fn restart(&mut self) {
        self.current = 0;
        for status in &mut self.statuses {
            *status = StepStatus::Pending;
        }
        if let Some(first) = self.statuses.first_mut() {
            *first = StepStatus::Active;
        }
    }
}
