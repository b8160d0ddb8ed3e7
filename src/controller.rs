//! Polled driver loop for the dimmer
//!
//! Provides portable pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping between polls.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::command::Feedback;
use crate::engine::Dimmer;
use crate::queue::CommandReceiver;
use crate::{FeedbackSink, OutputDriver};

/// Longest sleep suggested while the engine is idle, so queued commands
/// are picked up promptly.
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Result of a poll
#[derive(Debug, Clone, Copy)]
pub struct PollResult {
    /// Number of commands taken from the queue
    pub commands: usize,
    /// When the next poll should happen
    pub next_deadline: Instant,
    /// How long to wait until the next poll (zero if work is pending)
    pub sleep_duration: Duration,
}

/// Couples a [`Dimmer`] with its command queue and feedback sink.
///
/// # Usage
///
/// ```ignore
/// static COMMANDS: CommandQueue<8> = CommandQueue::new();
///
/// let dimmer = Dimmer::new(pwm, &DimmerConfig::default());
/// let mut controller = Controller::new(dimmer, COMMANDS.receiver());
///
/// loop {
///     let result = controller.poll(now(), &mut mqtt);
///     sleep_ms(result.sleep_duration.as_millis());
/// }
/// ```
pub struct Controller<'a, D: OutputDriver, const QUEUE_SIZE: usize> {
    commands: CommandReceiver<'a, QUEUE_SIZE>,
    dimmer: Dimmer<D>,
}

impl<'a, D: OutputDriver, const QUEUE_SIZE: usize> Controller<'a, D, QUEUE_SIZE> {
    pub fn new(dimmer: Dimmer<D>, commands: CommandReceiver<'a, QUEUE_SIZE>) -> Self {
        Self { commands, dimmer }
    }

    /// Apply pending commands, tick the engine and publish feedback.
    ///
    /// This method:
    /// 1. Drains the command queue (non-blocking), publishing command feedback
    /// 2. Runs one engine tick, publishing completion feedback
    /// 3. Returns how long the caller may sleep
    pub fn poll<F: FeedbackSink>(&mut self, now: Instant, feedback: &mut F) -> PollResult {
        let mut commands = 0;
        while let Ok(command) = self.commands.try_receive() {
            commands += 1;
            for reply in &self.dimmer.handle(command) {
                publish(feedback, reply);
            }
        }

        if let Some(reply) = self.dimmer.tick(now) {
            publish(feedback, &reply);
        }

        let sleep_duration = self
            .dimmer
            .time_until_next_tick(now)
            .map_or(IDLE_POLL_INTERVAL, |wait| wait.min(IDLE_POLL_INTERVAL));

        PollResult {
            commands,
            next_deadline: now + sleep_duration,
            sleep_duration,
        }
    }

    /// Get a reference to the dimmer.
    pub fn dimmer(&self) -> &Dimmer<D> {
        &self.dimmer
    }
}

fn publish<F: FeedbackSink>(sink: &mut F, feedback: &Feedback) {
    let value = feedback.value();

    #[cfg(feature = "esp32-log")]
    println!(
        "[Controller.poll] feedback {} = {}",
        feedback.property().as_str(),
        value.as_str()
    );

    sink.publish(feedback.property().as_str(), value.as_str());
}
