use rand::Rng;

use super::{AudioError, AudioResult};

/// Check `0 <= min <= max` with both bounds finite.
pub fn validate_pause_range(min_pause: f64, max_pause: f64) -> AudioResult<()> {
    if !min_pause.is_finite() || !max_pause.is_finite() || min_pause < 0.0 || max_pause < min_pause
    {
        return Err(AudioError::InvalidRange {
            min: min_pause,
            max: max_pause,
        });
    }
    Ok(())
}

/// Zero-valued samples lasting a uniformly random duration in
/// `[min_pause, max_pause]` seconds.
pub fn generate_silence(sample_rate: u32, min_pause: f64, max_pause: f64) -> AudioResult<Vec<f32>> {
    generate_silence_with_rng(&mut rand::thread_rng(), sample_rate, min_pause, max_pause)
}

/// [`generate_silence`] drawing the duration from `rng`.
pub fn generate_silence_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    sample_rate: u32,
    min_pause: f64,
    max_pause: f64,
) -> AudioResult<Vec<f32>> {
    validate_pause_range(min_pause, max_pause)?;

    // gen_range panics on an empty range
    let duration = if max_pause > min_pause {
        rng.gen_range(min_pause..=max_pause)
    } else {
        min_pause
    };

    let count = (duration * f64::from(sample_rate)).round().max(0.0) as usize;
    Ok(vec![0.0; count])
}
