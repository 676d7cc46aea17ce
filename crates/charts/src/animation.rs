// charts/src/animation.rs

//! Cancellable step animations.
//!
//! A chart replays the supply series by advancing a displayed step on a
//! timer. Each run is a spawned task owned through an [`AnimationHandle`];
//! starting a new run aborts the previous one and resets the displayed step.
//! Every published frame is tagged with a run id and only the current run
//! may publish, so frames from two runs never interleave.

use crate::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::MissedTickBehavior;

/// Displayed animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Run that produced this frame; 0 before any run
    pub run: u64,
    /// Current step, starting at 0
    pub step: usize,
    /// Whether the run reached its last step
    pub finished: bool,
}

/// Timing of one animation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationPlan {
    /// Number of steps to display
    pub steps: usize,
    /// Delay between consecutive steps
    #[serde(with = "millis")]
    pub interval: Duration,
    /// Delay before the first advance
    #[serde(with = "millis", default)]
    pub start_delay: Duration,
}

impl AnimationPlan {
    pub fn new(steps: usize, interval: Duration) -> Self {
        Self {
            steps,
            interval,
            start_delay: Duration::ZERO,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.interval.is_zero() {
            return Err(ChartError::InvalidAnimation(
                "step interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Total time from start to the last step, saturating at `Duration::MAX`
    pub fn duration(&self) -> Duration {
        let advances = u32::try_from(self.steps.saturating_sub(1)).unwrap_or(u32::MAX);
        self.start_delay.saturating_add(self.interval.saturating_mul(advances))
    }
}

/// Owner of one animation run
#[derive(Debug)]
pub struct AnimationHandle {
    run: u64,
    task: JoinHandle<()>,
}

impl AnimationHandle {
    pub fn run_id(&self) -> u64 {
        self.run
    }

    /// Stop the run. Safe to call any number of times, including after the
    /// run has finished.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to end. Returns `false` if it was cancelled.
    pub async fn finished(self) -> bool {
        self.task.await.is_ok()
    }
}

/// Schedules step animations and publishes the displayed frame
pub struct AnimationScheduler {
    display: Arc<watch::Sender<Frame>>,
    generation: Arc<AtomicU64>,
    current: Option<AbortHandle>,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        let (display, _) = watch::channel(Frame {
            run: 0,
            step: 0,
            finished: false,
        });

        Self {
            display: Arc::new(display),
            generation: Arc::new(AtomicU64::new(0)),
            current: None,
        }
    }

    /// Receiver of displayed frames
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.display.subscribe()
    }

    pub fn current_frame(&self) -> Frame {
        *self.display.borrow()
    }

    /// Start a new run, cancelling any run in progress first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn play(&mut self, plan: AnimationPlan) -> ChartResult<AnimationHandle> {
        plan.validate()?;
        self.cancel();

        let run = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.display.send_replace(Frame {
            run,
            step: 0,
            finished: plan.steps <= 1,
        });

        let display = Arc::clone(&self.display);
        let generation = Arc::clone(&self.generation);

        let task = tokio::spawn(async move {
            tokio::time::sleep(plan.start_delay).await;

            let mut ticker = tokio::time::interval(plan.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            for step in 1..plan.steps {
                ticker.tick().await;
                let finished = step + 1 == plan.steps;
                let published = display.send_if_modified(|frame| {
                    if generation.load(Ordering::SeqCst) != run {
                        return false;
                    }
                    *frame = Frame {
                        run,
                        step,
                        finished,
                    };
                    true
                });
                if !published {
                    tracing::debug!(run, step, "Animation run superseded");
                    return;
                }
            }
        });

        self.current = Some(task.abort_handle());
        tracing::debug!(run, steps = plan.steps, interval = ?plan.interval, "Animation started");

        Ok(AnimationHandle { run, task })
    }

    /// Cancel the run in progress, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(current) = self.current.take() {
            current.abort();
            // Retire the run id so a task mid-poll cannot publish
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Easing applied to tween progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    Smoothstep,
}

impl Easing {
    pub fn apply(&self, progress: f64) -> f64 {
        let p = progress.clamp(0.0, 1.0);
        match self {
            Easing::Linear => p,
            Easing::Smoothstep => tokenomics::intensity(p),
        }
    }
}

/// Interpolates an animated counter between two values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Value after `elapsed`; holds `to` once the duration has passed
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        lerp(self.from, self.to, self.easing.apply(progress))
    }
}

/// Linear interpolation between `a` and `b`
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(steps: usize) -> AnimationPlan {
        AnimationPlan::new(steps, Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reaches_last_step() {
        let mut scheduler = AnimationScheduler::new();
        let handle = scheduler.play(plan(5)).unwrap();
        let run = handle.run_id();

        assert!(handle.finished().await);
        assert_eq!(
            scheduler.current_frame(),
            Frame {
                run,
                step: 4,
                finished: true
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_advance_in_order() {
        let mut scheduler = AnimationScheduler::new();
        let mut rx = scheduler.subscribe();
        let _handle = scheduler.play(plan(6)).unwrap();

        let mut seen = vec![rx.borrow_and_update().step];
        while !rx.borrow().finished {
            rx.changed().await.unwrap();
            seen.push(rx.borrow_and_update().step);
        }

        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&5));
        assert!(seen.windows(2).all(|w| w[1] > w[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_resets_and_never_interleaves() {
        let mut scheduler = AnimationScheduler::new();
        let mut rx = scheduler.subscribe();

        let first = scheduler.play(plan(10)).unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(scheduler.current_frame().step >= 3);

        let second = scheduler.play(plan(4)).unwrap();
        let second_run = second.run_id();
        assert_eq!(scheduler.current_frame().step, 0);
        assert_eq!(scheduler.current_frame().run, second_run);

        rx.borrow_and_update();
        let mut frames = Vec::new();
        while !rx.borrow().finished {
            rx.changed().await.unwrap();
            frames.push(*rx.borrow_and_update());
        }

        assert!(frames.iter().all(|f| f.run == second_run));
        assert_eq!(frames.last().unwrap().step, 3);
        assert!(!first.finished().await);
        assert!(second.finished().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let mut scheduler = AnimationScheduler::new();
        let handle = scheduler.play(plan(10)).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        handle.cancel();
        handle.cancel();
        scheduler.cancel();
        scheduler.cancel();

        let frozen = scheduler.current_frame();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(scheduler.current_frame(), frozen);
        assert!(!frozen.finished);
        assert!(!handle.finished().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_finish_is_noop() {
        let mut scheduler = AnimationScheduler::new();
        let handle = scheduler.play(plan(3)).unwrap();
        tokio::time::sleep(plan(3).duration() + Duration::from_millis(1)).await;

        assert!(handle.is_finished());
        handle.cancel();
        scheduler.cancel();
        assert!(scheduler.current_frame().finished);
        assert!(handle.finished().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_delay_holds_first_step() {
        let mut scheduler = AnimationScheduler::new();
        let mut delayed = plan(3);
        delayed.start_delay = Duration::from_millis(500);
        let _handle = scheduler.play(delayed).unwrap();

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert_eq!(scheduler.current_frame().step, 0);
        tokio::time::sleep(Duration::from_millis(160)).await;
        assert_eq!(scheduler.current_frame().step, 1);
    }

    #[tokio::test]
    async fn test_single_step_plan_finishes_immediately() {
        let mut scheduler = AnimationScheduler::new();
        let handle = scheduler.play(plan(1)).unwrap();

        assert!(scheduler.current_frame().finished);
        assert!(handle.finished().await);
    }

    #[tokio::test]
    async fn test_zero_interval_rejected() {
        let mut scheduler = AnimationScheduler::new();
        let result = scheduler.play(AnimationPlan::new(5, Duration::ZERO));

        assert!(matches!(result, Err(ChartError::InvalidAnimation(_))));
        assert_eq!(scheduler.current_frame().run, 0);
    }

    #[test]
    fn test_plan_duration() {
        let mut p = plan(60);
        assert_eq!(p.duration(), Duration::from_millis(5_900));
        p.start_delay = Duration::from_millis(100);
        assert_eq!(p.duration(), Duration::from_millis(6_000));
        assert_eq!(plan(0).duration(), Duration::ZERO);
    }

    #[test]
    fn test_plan_duration_saturates() {
        let huge = AnimationPlan::new(usize::MAX, Duration::from_millis(1));
        assert!(huge.duration() >= Duration::from_millis(u32::MAX as u64 - 1));

        let mut slow = AnimationPlan::new(4, Duration::MAX / 2);
        assert_eq!(slow.duration(), Duration::MAX);
        slow.start_delay = Duration::MAX;
        assert_eq!(slow.duration(), Duration::MAX);
    }

    #[test]
    fn test_tween_linear_and_eased() {
        let tween = Tween::new(0.0, 1_000.0, Duration::from_secs(2));

        assert_eq!(tween.value_at(Duration::ZERO), 0.0);
        assert_eq!(tween.value_at(Duration::from_secs(1)), 500.0);
        assert_eq!(tween.value_at(Duration::from_secs(10)), 1_000.0);

        let eased = tween.with_easing(Easing::Smoothstep);
        assert_eq!(eased.value_at(Duration::from_secs(1)), 500.0);
        assert!(eased.value_at(Duration::from_millis(500)) < 250.0);
    }

    #[test]
    fn test_zero_duration_tween_jumps_to_target() {
        let tween = Tween::new(3.0, 7.0, Duration::ZERO);
        assert_eq!(tween.value_at(Duration::ZERO), 7.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
    }
}
