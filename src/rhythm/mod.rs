//! Rhythm Analysis
//!
//! Derives speech rate and rhythm regularity from the amplitude envelope of
//! raw audio. Peaks in the Hilbert envelope approximate syllable energy
//! bursts; a minimum separation of 100ms keeps a single burst from being
//! counted twice.
//!
//! The envelope computation degrades gracefully: any internal numerical
//! failure yields the neutral `{speech_rate: 0.0, rhythm_regularity: 1.0}`
//! instead of an error, because a garbled rhythm estimate is preferable to
//! aborting an otherwise-valid assessment.

mod fft;

use std::cmp::Ordering;

use crate::error::AnalysisError;
use crate::types::{
    RhythmMetrics, DEGRADED_REGULARITY, MIN_PEAK_DISTANCE_SECS, NEUTRAL_REGULARITY,
};

/// Analyze `samples` recorded at `sample_rate` Hz.
///
/// Fails only on an empty buffer; numerical failures inside the envelope
/// computation return the documented neutral metrics.
pub fn analyze(samples: &[f32], sample_rate: u32) -> Result<RhythmMetrics, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InsufficientAudio);
    }

    match try_metrics(samples, sample_rate) {
        Some(metrics) => Ok(metrics),
        None => {
            tracing::warn!(
                samples = samples.len(),
                sample_rate,
                "rhythm analysis degraded, returning neutral metrics"
            );
            Ok(RhythmMetrics {
                speech_rate: 0.0,
                rhythm_regularity: DEGRADED_REGULARITY,
            })
        }
    }
}

fn try_metrics(samples: &[f32], sample_rate: u32) -> Option<RhythmMetrics> {
    if sample_rate == 0 {
        return None;
    }

    let waveform: Vec<f64> = samples.iter().map(|&s| f64::from(s)).collect();
    if waveform.iter().any(|s| !s.is_finite()) {
        return None;
    }

    let envelope = fft::hilbert_envelope(&waveform);
    if envelope.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let min_distance = ((sample_rate as f64 * MIN_PEAK_DISTANCE_SECS) as usize).max(1);
    let peaks = find_peaks(&envelope, min_distance);

    metrics_from_peaks(&peaks, waveform.len(), sample_rate)
}

/// Speech rate and regularity from detected peak positions.
fn metrics_from_peaks(
    peaks: &[usize],
    sample_count: usize,
    sample_rate: u32,
) -> Option<RhythmMetrics> {
    let duration_secs = sample_count as f64 / sample_rate as f64;
    let speech_rate = peaks.len() as f64 / duration_secs;

    let rhythm_regularity = if peaks.len() > 1 {
        let gaps: Vec<f64> = peaks.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
        if mean <= 0.0 {
            return None;
        }
        let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
        variance.sqrt() / mean
    } else {
        // A single peak cannot characterize rhythm; score it neutrally.
        NEUTRAL_REGULARITY
    };

    if !speech_rate.is_finite() || !rhythm_regularity.is_finite() {
        return None;
    }

    Some(RhythmMetrics {
        speech_rate,
        rhythm_regularity,
    })
}

/// Local maxima of `signal`, at least `min_distance` samples apart.
///
/// Higher peaks win: candidates are visited tallest-first and each kept peak
/// suppresses everything within `min_distance` of it.
fn find_peaks(signal: &[f64], min_distance: usize) -> Vec<usize> {
    if signal.len() < 3 {
        return Vec::new();
    }

    let mut candidates: Vec<usize> = (1..signal.len() - 1)
        .filter(|&i| signal[i] > signal[i - 1] && signal[i] > signal[i + 1])
        .collect();
    candidates.sort_by(|&a, &b| signal[b].partial_cmp(&signal[a]).unwrap_or(Ordering::Equal));

    let mut kept = Vec::new();
    let mut suppressed = vec![false; signal.len()];
    for &i in &candidates {
        if suppressed[i] {
            continue;
        }
        kept.push(i);
        let lo = i.saturating_sub(min_distance);
        let hi = (i + min_distance).min(signal.len() - 1);
        for slot in suppressed.iter_mut().take(hi + 1).skip(lo) {
            *slot = true;
        }
    }

    kept.sort_unstable();
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(matches!(
            analyze(&[], 16_000),
            Err(AnalysisError::InsufficientAudio)
        ));
    }

    #[test]
    fn test_non_finite_samples_degrade() {
        let samples = vec![0.1, f32::NAN, 0.3];
        let metrics = analyze(&samples, 16_000).unwrap();
        assert_eq!(metrics.speech_rate, 0.0);
        assert_eq!(metrics.rhythm_regularity, DEGRADED_REGULARITY);
    }

    #[test]
    fn test_zero_sample_rate_degrades() {
        let metrics = analyze(&[0.1, 0.2, 0.3], 0).unwrap();
        assert_eq!(metrics.speech_rate, 0.0);
        assert_eq!(metrics.rhythm_regularity, DEGRADED_REGULARITY);
    }

    #[test]
    fn test_silence_has_no_peaks() {
        let metrics = analyze(&vec![0.0; 800], 100).unwrap();
        assert_eq!(metrics.speech_rate, 0.0);
        assert_eq!(metrics.rhythm_regularity, NEUTRAL_REGULARITY);
    }

    #[test]
    fn test_modulated_speech_yields_finite_metrics() {
        // 1s of a 50 Hz carrier amplitude-modulated at syllable rate.
        let samples: Vec<f32> = (0..16_000)
            .map(|i| {
                let t = i as f64 / 16_000.0;
                let burst = (2.0 * std::f64::consts::PI * 3.0 * t).sin().max(0.0);
                (burst * (2.0 * std::f64::consts::PI * 50.0 * t).sin()) as f32
            })
            .collect();
        let metrics = analyze(&samples, 16_000).unwrap();
        assert!(metrics.speech_rate > 0.0);
        assert!(metrics.rhythm_regularity.is_finite());
        assert!(metrics.rhythm_regularity >= 0.0);
    }

    #[test]
    fn test_metrics_evenly_spaced_peaks() {
        let metrics = metrics_from_peaks(&[100, 200, 300, 400], 800, 100).unwrap();
        assert_relative_eq!(metrics.speech_rate, 0.5);
        assert_relative_eq!(metrics.rhythm_regularity, 0.0);
    }

    #[test]
    fn test_metrics_uneven_peaks() {
        // gaps 20 and 40: mean 30, population std 10
        let metrics = metrics_from_peaks(&[10, 30, 70], 100, 100).unwrap();
        assert_relative_eq!(metrics.speech_rate, 3.0);
        assert_relative_eq!(metrics.rhythm_regularity, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_metrics_single_peak_is_neutral() {
        let metrics = metrics_from_peaks(&[42], 400, 100).unwrap();
        assert_relative_eq!(metrics.speech_rate, 0.25);
        assert_eq!(metrics.rhythm_regularity, NEUTRAL_REGULARITY);
    }

    #[test]
    fn test_find_peaks_min_distance() {
        //           0    1    2    3    4    5    6    7    8
        let signal = [0.0, 1.0, 0.2, 0.9, 0.1, 0.0, 0.8, 0.0, 0.0];
        // Tallest peak at 1 suppresses the peak at 3 under distance 3.
        assert_eq!(find_peaks(&signal, 3), vec![1, 6]);
        assert_eq!(find_peaks(&signal, 1), vec![1, 3, 6]);
    }

    #[test]
    fn test_find_peaks_flat_signal() {
        assert!(find_peaks(&[0.5; 16], 2).is_empty());
    }
}
