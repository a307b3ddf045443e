//! Domain equalization ahead of resampling.
//!
//! Every channel must span the same independent range before it can be put
//! on the shared grid. The channel ending at the greatest independent value is
//! the reference; every other channel gets one extrapolated sample appended
//! at the reference's final value, continuing the slope of its last two
//! samples.

use crate::channel::Channel;
use crate::error::{Result, SyncError};

/// Index of the channel whose last independent value is greatest.
/// Ties resolve to the first such channel.
pub fn reference_index(channels: &[Channel]) -> Option<usize> {
    channels
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, channel)| match best {
            Some((_, last)) if channel.last_x() <= last => best,
            _ => Some((i, channel.last_x())),
        })
        .map(|(i, _)| i)
}

/// Value of the line through the channel's last two distinct samples at
/// `x_target`.
pub fn extrapolate(channel: &Channel, x_target: f32) -> Result<f32> {
    let x = channel.x();
    let y = channel.y();
    let n = x.len() - 1;

    // Trailing rows may repeat the final x; walk back to a distinct one
    let m = (0..n)
        .rev()
        .find(|&i| x[i] < x[n])
        .ok_or_else(|| SyncError::InsufficientSamples {
            channel: channel.name().to_string(),
            needed: Channel::MIN_SAMPLES,
            available: 1,
        })?;

    let slope = (y[n] - y[m]) / (x[n] - x[m]);
    Ok(y[n] + slope * (x_target - x[n]))
}

/// Extend every short channel to the reference channel's final value.
pub fn align(channels: Vec<Channel>) -> Result<Vec<Channel>> {
    let reference = reference_index(&channels).ok_or(SyncError::EmptyChannelSet)?;
    let x_target = channels[reference].last_x();

    log::debug!(
        "Aligning {} channels to {} ending at {}",
        channels.len(),
        channels[reference],
        x_target
    );

    channels
        .into_iter()
        .map(|channel| {
            if channel.last_x() >= x_target {
                return Ok(channel);
            }
            let y_extra = extrapolate(&channel, x_target)?;
            log::debug!(
                "Extrapolated {} from {} to ({}, {})",
                channel,
                channel.last_x(),
                x_target,
                y_extra
            );
            Ok(channel.with_appended(x_target, y_extra))
        })
        .collect()
}
