use std::sync::Arc;

use rustfft::{num_complex::Complex64, Fft, FftPlanner};

/// One-sided magnitude spectrum of a single analysis window.
///
/// `frequencies_hz` and `magnitudes` both have N/2+1 entries, bin `k` at
/// `k * fs / N`. Rebuilt every cycle, never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct MagnitudeSpectrum {
    pub sample_rate_hz: f64,
    pub frequencies_hz: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl MagnitudeSpectrum {
    /// Frequency and magnitude of the strongest bin.
    pub fn peak(&self) -> (f64, f64) {
        let mut best = 0;
        for (k, &mag) in self.magnitudes.iter().enumerate() {
            if mag > self.magnitudes[best] {
                best = k;
            }
        }
        (self.frequencies_hz[best], self.magnitudes[best])
    }
}

/// Computes amplitude-correct Hann-windowed spectra for one fixed window
/// length.
///
/// The Hann coefficients and the FFT plan are built once at construction;
/// `compute` is a pure function of its inputs, so identical windows produce
/// bit-identical spectra.
pub struct SpectrumBuilder {
    size: usize,
    remove_dc: bool,
    hann: Vec<f64>,
    coherent_gain: f64,
    fft: Arc<dyn Fft<f64>>,
}

impl SpectrumBuilder {
    pub fn new(size: usize, remove_dc: bool) -> Self {
        // Symmetric raised cosine, w[n] = 0.5 - 0.5 cos(2 pi n / (N - 1)).
        let hann: Vec<f64> = (0..size)
            .map(|n| {
                0.5 - 0.5 * (std::f64::consts::TAU * n as f64 / (size - 1) as f64).cos()
            })
            .collect();
        let coherent_gain = hann.iter().sum::<f64>() / size as f64;
        let fft = FftPlanner::new().plan_fft_forward(size);
        Self {
            size,
            remove_dc,
            hann,
            coherent_gain,
            fft,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Spectrum of one window snapshot at the given effective rate.
    ///
    /// Dividing by `N * coherent_gain` undoes the window's amplitude
    /// attenuation; the factor 2 folds the mirrored negative-frequency half
    /// into the one-sided result, and bin 0 is halved again because DC has no
    /// mirror.
    pub fn compute(&self, values: &[f64], sample_rate_hz: f64) -> MagnitudeSpectrum {
        debug_assert_eq!(values.len(), self.size);
        let mean = if self.remove_dc {
            values.iter().sum::<f64>() / self.size as f64
        } else {
            0.0
        };
        let mut buffer: Vec<Complex64> = values
            .iter()
            .zip(&self.hann)
            .map(|(&v, &w)| Complex64::new((v - mean) * w, 0.0))
            .collect();
        self.fft.process(&mut buffer);

        let bins = self.size / 2 + 1;
        let scale = 2.0 / (self.size as f64 * self.coherent_gain);
        let mut magnitudes: Vec<f64> = buffer
            .iter()
            .take(bins)
            .map(|c| c.norm() * scale)
            .collect();
        magnitudes[0] *= 0.5;

        let bin_width = sample_rate_hz / self.size as f64;
        let frequencies_hz = (0..bins).map(|k| k as f64 * bin_width).collect();
        MagnitudeSpectrum {
            sample_rate_hz,
            frequencies_hz,
            magnitudes,
        }
    }
}
