//! 4-7-8 breathing exercise, advanced one second per `tick`.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    pub fn seconds(self) -> u32 {
        match self {
            Phase::Idle => 0,
            Phase::Inhale => 4,
            Phase::Hold => 7,
            Phase::Exhale => 8,
        }
    }

    pub fn instruction(self) -> &'static str {
        match self {
            Phase::Idle => "Click to Start",
            Phase::Inhale => "Breathe In",
            Phase::Hold => "Hold",
            Phase::Exhale => "Breathe Out",
        }
    }

    fn next(self) -> Self {
        match self {
            Phase::Idle | Phase::Exhale => Phase::Inhale,
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreathingExercise {
    phase: Phase,
    countdown: u32,
}

impl Default for BreathingExercise {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            countdown: 0,
        }
    }
}

impl BreathingExercise {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Starts at inhale, or stops and returns to idle.
    pub fn toggle(&mut self) {
        if self.is_active() {
            *self = Self::default();
        } else {
            self.enter(Phase::Inhale);
        }
    }

    pub fn tick(&mut self) {
        if !self.is_active() {
            return;
        }
        if self.countdown > 0 {
            self.countdown -= 1;
        } else {
            self.enter(self.phase.next());
        }
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.countdown = phase.seconds();
    }
}

#[derive(Debug, Serialize)]
pub struct PhaseStep {
    pub phase: Phase,
    pub seconds: u32,
    pub instruction: &'static str,
}

/// One full cycle, recorded by running an exercise until it wraps to inhale.
pub fn pattern() -> Vec<PhaseStep> {
    let mut exercise = BreathingExercise::default();
    exercise.toggle();

    let mut steps = Vec::new();
    loop {
        let phase = exercise.phase();
        steps.push(PhaseStep {
            phase,
            seconds: exercise.countdown(),
            instruction: phase.instruction(),
        });
        while exercise.phase() == phase {
            exercise.tick();
        }
        if exercise.phase() == Phase::Inhale {
            return steps;
        }
    }
}
