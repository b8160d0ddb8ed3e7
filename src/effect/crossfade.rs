//! Stepped crossfade between two sets of channel levels
//!
//! Each channel gets a step rate: the number of ticks between two ±1
//! changes. Channels with a larger delta change more often, so all of them
//! arrive at roughly the same time.

use crate::levels::{CHANNEL_COUNT, ChannelLevels, ColorChannel, MAX_LEVEL};

/// Step rate for one channel
///
/// `step_count / (target - current)` with truncating division; 0 means the
/// channel does not change. Deltas larger than `step_count` truncate to ±1
/// or 0 and the channel falls short of its target.
pub fn calculate_step(current: u8, target: u8, step_count: u16) -> i32 {
    let delta = i32::from(target) - i32::from(current);
    if delta == 0 {
        return 0;
    }
    i32::from(step_count) / delta
}

/// Level of a channel after tick `tick`
///
/// Moves by one towards the sign of `step` on every tick that is a multiple
/// of `step`. The result stays within `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn calculate_val(step: i32, current: u8, tick: u32) -> u8 {
    let mut value = i32::from(current);
    if step != 0 && i64::from(tick) % i64::from(step) == 0 {
        value += step.signum();
    }
    value.clamp(0, i32::from(MAX_LEVEL)) as u8
}

/// Crossfade in progress
#[derive(Debug, Clone)]
pub struct Crossfade {
    steps: [i32; CHANNEL_COUNT],
    tick: u32,
    step_count: u16,
}

impl Crossfade {
    /// A finished crossfade that changes nothing
    pub const fn idle() -> Self {
        Self {
            steps: [0; CHANNEL_COUNT],
            tick: 0,
            step_count: 0,
        }
    }

    /// Compute step rates for every channel
    pub fn start(current: &ChannelLevels, target: &ChannelLevels, step_count: u16) -> Self {
        let mut steps = [0; CHANNEL_COUNT];
        for channel in ColorChannel::ALL {
            steps[channel.index()] =
                calculate_step(current[channel], target[channel], step_count);
        }
        Self {
            steps,
            tick: 0,
            step_count,
        }
    }

    /// Step rate computed for a channel
    pub fn step_rate(&self, channel: ColorChannel) -> i32 {
        self.steps[channel.index()]
    }

    /// Number of ticks already applied
    pub const fn tick_index(&self) -> u32 {
        self.tick
    }

    pub const fn is_complete(&self) -> bool {
        self.tick >= self.step_count as u32
    }

    /// Apply one tick to `current`
    ///
    /// A channel never passes its target. Returns `true` once the step
    /// budget is used up.
    pub fn advance(&mut self, current: &mut ChannelLevels, target: &ChannelLevels) -> bool {
        if self.is_complete() {
            return true;
        }

        for channel in ColorChannel::ALL {
            let step = self.steps[channel.index()];
            let goal = target[channel];
            let mut next = calculate_val(step, current[channel], self.tick);
            if (step > 0 && next > goal) || (step < 0 && next < goal) {
                next = goal;
            }
            current.set(channel, next);
        }
        self.tick += 1;

        self.is_complete()
    }
}

impl Default for Crossfade {
    fn default() -> Self {
        Self::idle()
    }
}
