//! Closed-loop controller: capture, settle, fetch, classify, decide, send.

use crate::client::RelayClient;
use crate::clock::Ticker;
use crate::config::NavigationConfig;
use crate::navigator::{Mode, Navigator, StepDecision};
use crate::pose::Pose;
use rover_eye::Classifier;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    GoalReached,
    StepBudgetExhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Steps executed, including the one that observed the goal
    pub steps: u32,
    pub final_distance: f64,
    pub mode: Mode,
    pub pose: Pose,
}

pub struct Controller<C, T> {
    config: NavigationConfig,
    classifier: Classifier,
    navigator: Navigator,
    client: C,
    ticker: T,
}

impl<C: RelayClient, T: Ticker> Controller<C, T> {
    pub fn new(config: NavigationConfig, client: C, ticker: T) -> rover_core::Result<Self> {
        config.validate().map_err(rover_core::Error::Configuration)?;
        let classifier = Classifier::new(config.vision.clone())?;
        let navigator = Navigator::new(config.clone());
        Ok(Self { config, classifier, navigator, client, ticker })
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Reset the robot and wait for it to settle.
    pub async fn prepare(&mut self) {
        info!("Resetting robot before run");
        self.client.reset().await;
        self.ticker.wait(Duration::from_millis(self.config.reset_settle_ms)).await;
    }

    /// One loop iteration. A missing frame reads as a clear corridor.
    pub async fn step(&mut self, step: u32) -> StepDecision {
        self.client.capture().await;
        self.ticker.wait(Duration::from_millis(self.config.settle_ms)).await;

        let frame = self.client.fetch_frame().await;
        if frame.is_none() {
            debug!("Step {}: no frame, continuing on stale state", step);
        }
        let vision = self.classifier.classify_encoded(frame.as_deref());

        let decision = self.navigator.step(step, &vision);
        if let StepDecision::Drive { maneuver, .. } = decision {
            self.client.move_relative(maneuver.turn, maneuver.distance).await;
        }
        decision
    }

    /// Run until the goal is reached or the step budget runs out.
    pub async fn run(&mut self) -> RunReport {
        if self.config.reset_on_start {
            self.prepare().await;
        }

        info!(
            "Navigating to ({:.1}, {:.1}), at most {} steps",
            self.config.goal_x, self.config.goal_z, self.config.max_steps
        );

        for step in 1..=self.config.max_steps {
            if let StepDecision::GoalReached { distance } = self.step(step).await {
                return self.report(RunOutcome::GoalReached, step, distance);
            }
        }

        let distance = self.navigator.distance_to_goal();
        warn!(
            "Step budget of {} exhausted, {:.2} from goal",
            self.config.max_steps, distance
        );
        self.report(RunOutcome::StepBudgetExhausted, self.config.max_steps, distance)
    }

    fn report(&self, outcome: RunOutcome, steps: u32, final_distance: f64) -> RunReport {
        RunReport {
            outcome,
            steps,
            final_distance,
            mode: self.navigator.mode(),
            pose: self.navigator.pose(),
        }
    }
}
