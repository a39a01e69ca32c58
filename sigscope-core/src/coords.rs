//! Pixel <-> domain mapping for the backend-rendered plot images.
//!
//! The backend draws its plots with matplotlib, so every image carries axis
//! labels and margins around the actual data area. [`RenderPadding`] records
//! what fraction of the image each margin takes up; [`CoordinateMapper`]
//! uses it to translate between pixel offsets inside the `<img>` and
//! frequency (x axis) / time (y axis, growing downward) values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Margins of the rendered spectrogram image, as fractions of its size.
pub const SPECTROGRAM_PADDING: RenderPadding = RenderPadding {
    left: 0.1249,
    right: 0.1021,
    top: 0.1185,
    bottom: 0.112,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoundsError {
    #[error("backend response did not include max_time/min_freq/max_freq")]
    Missing,
    #[error("domain bounds must be finite")]
    NonFinite,
    #[error("max_time must be positive, got {0}")]
    NonPositiveTime(f64),
    #[error("max_freq ({max}) must be greater than min_freq ({min})")]
    EmptyFrequencyRange { min: f64, max: f64 },
}

/// Time/frequency extent of a loaded capture's plots.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    max_time: f64,
    min_freq: f64,
    max_freq: f64,
}

impl DomainBounds {
    pub fn new(max_time: f64, min_freq: f64, max_freq: f64) -> Result<Self, BoundsError> {
        if !(max_time.is_finite() && min_freq.is_finite() && max_freq.is_finite()) {
            return Err(BoundsError::NonFinite);
        }
        if max_time <= 0.0 {
            return Err(BoundsError::NonPositiveTime(max_time));
        }
        if max_freq <= min_freq {
            return Err(BoundsError::EmptyFrequencyRange { min: min_freq, max: max_freq });
        }
        Ok(Self { max_time, min_freq, max_freq })
    }

    /// Build bounds from the optional fields of a backend reply.
    pub fn from_parts(
        max_time: Option<f64>,
        min_freq: Option<f64>,
        max_freq: Option<f64>,
    ) -> Result<Self, BoundsError> {
        match (max_time, min_freq, max_freq) {
            (Some(t), Some(lo), Some(hi)) => Self::new(t, lo, hi),
            _ => Err(BoundsError::Missing),
        }
    }

    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    pub fn min_freq(&self) -> f64 {
        self.min_freq
    }

    pub fn max_freq(&self) -> f64 {
        self.max_freq
    }

    pub fn freq_span(&self) -> f64 {
        self.max_freq - self.min_freq
    }
}

/// Fraction of the image occupied by non-plot chrome on each side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPadding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl RenderPadding {
    /// Fraction of the width that holds data.
    pub fn plot_width_fraction(&self) -> f64 {
        1.0 - self.left - self.right
    }

    /// Fraction of the height that holds data.
    pub fn plot_height_fraction(&self) -> f64 {
        1.0 - self.top - self.bottom
    }
}

/// Laid-out size of the plot `<img>` in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlotFrame {
    pub width: f64,
    pub height: f64,
}

impl PlotFrame {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_laid_out(&self) -> bool {
        usable(self.width) && usable(self.height)
    }
}

fn usable(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}

/// Converts between pixel offsets in the plot image and domain values.
///
/// Every method returns `0.0` while no file is loaded (no bounds) or while
/// the image has no size yet, so callers never see NaN.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    bounds: Option<DomainBounds>,
    frame: PlotFrame,
    padding: RenderPadding,
}

impl CoordinateMapper {
    pub fn new(bounds: Option<DomainBounds>, frame: PlotFrame, padding: RenderPadding) -> Self {
        Self { bounds, frame, padding }
    }

    /// Mapper for the spectrogram image using [`SPECTROGRAM_PADDING`].
    pub fn spectrogram(bounds: Option<DomainBounds>, frame: PlotFrame) -> Self {
        Self::new(bounds, frame, SPECTROGRAM_PADDING)
    }

    pub fn bounds(&self) -> Option<DomainBounds> {
        self.bounds
    }

    pub fn frame(&self) -> PlotFrame {
        self.frame
    }

    pub fn padding(&self) -> RenderPadding {
        self.padding
    }

    pub fn pixel_y_to_time(&self, y: f64) -> f64 {
        let Some(b) = self.bounds else { return 0.0 };
        let h = self.frame.height;
        let plot_h = self.padding.plot_height_fraction() * h;
        if !usable(h) || !usable(plot_h) || !y.is_finite() {
            return 0.0;
        }
        ((y - self.padding.top * h) / plot_h) * b.max_time
    }

    pub fn time_to_pixel_y(&self, t: f64) -> f64 {
        let Some(b) = self.bounds else { return 0.0 };
        let h = self.frame.height;
        if !usable(h) || !t.is_finite() {
            return 0.0;
        }
        (t / b.max_time) * (self.padding.plot_height_fraction() * h) + self.padding.top * h
    }

    pub fn pixel_x_to_freq(&self, x: f64) -> f64 {
        let Some(b) = self.bounds else { return 0.0 };
        let w = self.frame.width;
        let plot_w = self.padding.plot_width_fraction() * w;
        if !usable(w) || !usable(plot_w) || !x.is_finite() {
            return 0.0;
        }
        b.min_freq + ((x - self.padding.left * w) / plot_w) * b.freq_span()
    }

    pub fn freq_to_pixel_x(&self, f: f64) -> f64 {
        let Some(b) = self.bounds else { return 0.0 };
        let w = self.frame.width;
        if !usable(w) || !f.is_finite() {
            return 0.0;
        }
        ((f - b.min_freq) / b.freq_span()) * (self.padding.plot_width_fraction() * w)
            + self.padding.left * w
    }

    pub fn clamp_freq(&self, f: f64) -> f64 {
        match self.bounds {
            Some(b) => f.clamp(b.min_freq, b.max_freq),
            None => 0.0,
        }
    }

    pub fn clamp_time(&self, t: f64) -> f64 {
        match self.bounds {
            Some(b) => t.clamp(0.0, b.max_time),
            None => 0.0,
        }
    }

    /// Data area of the image as `(left, top, width, height)` pixels.
    pub fn plot_area(&self) -> (f64, f64, f64, f64) {
        if !self.frame.is_laid_out() {
            return (0.0, 0.0, 0.0, 0.0);
        }
        let PlotFrame { width: w, height: h } = self.frame;
        (
            self.padding.left * w,
            self.padding.top * h,
            self.padding.plot_width_fraction() * w,
            self.padding.plot_height_fraction() * h,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn mapper(w: f64, h: f64) -> CoordinateMapper {
        let bounds = DomainBounds::new(10.0, 0.0, 1000.0).unwrap();
        CoordinateMapper::spectrogram(Some(bounds), PlotFrame::new(w, h))
    }

    #[test]
    fn test_freq_roundtrip() {
        for &w in &[1.0, 317.0, 1000.0, 2560.0] {
            let m = mapper(w, 500.0);
            for i in 0..=100 {
                let f = i as f64 * 10.0;
                let back = m.pixel_x_to_freq(m.freq_to_pixel_x(f));
                assert!((back - f).abs() < EPS * 1000.0, "w={w} f={f} back={back}");
            }
        }
    }

    #[test]
    fn test_time_roundtrip() {
        for &h in &[1.0, 240.0, 500.0, 1440.0] {
            let m = mapper(1000.0, h);
            for i in 0..=100 {
                let t = i as f64 * 0.1;
                let back = m.pixel_y_to_time(m.time_to_pixel_y(t));
                assert!((back - t).abs() < EPS * 10.0, "h={h} t={t} back={back}");
            }
        }
    }

    #[test]
    fn test_roundtrip_with_offset_band() {
        let bounds = DomainBounds::new(0.25, 2.4e9, 2.48e9).unwrap();
        let m = CoordinateMapper::spectrogram(Some(bounds), PlotFrame::new(800.0, 600.0));
        let f = 2.4513e9;
        assert!((m.pixel_x_to_freq(m.freq_to_pixel_x(f)) - f).abs() < 1e-3);
    }

    #[test]
    fn test_unset_bounds_yield_zero() {
        let m = CoordinateMapper::spectrogram(None, PlotFrame::new(1000.0, 500.0));
        for &v in &[-50.0, 0.0, 123.4, 1e12] {
            assert_eq!(m.pixel_x_to_freq(v), 0.0);
            assert_eq!(m.freq_to_pixel_x(v), 0.0);
            assert_eq!(m.pixel_y_to_time(v), 0.0);
            assert_eq!(m.time_to_pixel_y(v), 0.0);
            assert_eq!(m.clamp_freq(v), 0.0);
            assert_eq!(m.clamp_time(v), 0.0);
        }
    }

    #[test]
    fn test_zero_size_frame_yields_zero() {
        let m = mapper(0.0, 0.0);
        assert_eq!(m.pixel_x_to_freq(300.0), 0.0);
        assert_eq!(m.pixel_y_to_time(100.0), 0.0);
        assert_eq!(m.freq_to_pixel_x(500.0), 0.0);
        assert_eq!(m.time_to_pixel_y(5.0), 0.0);
        assert_eq!(m.plot_area(), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_known_cursor_fixture() {
        // 1000x500 image, bounds {max_time: 10, min_freq: 0, max_freq: 1000}
        let m = mapper(1000.0, 500.0);
        let expected = (300.0 - 124.9) / (1000.0 * (1.0 - 0.1249 - 0.1021)) * 1000.0;
        let freq = m.pixel_x_to_freq(300.0);
        assert!((freq - expected).abs() < 1e-9);
        assert!((freq - 226.52).abs() < 0.01, "got {freq}");
    }

    #[test]
    fn test_plot_edges_map_to_bounds() {
        let m = mapper(1000.0, 500.0);
        let (left, top, w, h) = m.plot_area();
        assert!((m.pixel_x_to_freq(left) - 0.0).abs() < EPS);
        assert!((m.pixel_x_to_freq(left + w) - 1000.0).abs() < 1e-6);
        assert!((m.pixel_y_to_time(top) - 0.0).abs() < EPS);
        assert!((m.pixel_y_to_time(top + h) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_validation() {
        assert_eq!(DomainBounds::new(0.0, 0.0, 1.0), Err(BoundsError::NonPositiveTime(0.0)));
        assert!(matches!(
            DomainBounds::new(1.0, 5.0, 5.0),
            Err(BoundsError::EmptyFrequencyRange { .. })
        ));
        assert_eq!(DomainBounds::new(f64::NAN, 0.0, 1.0), Err(BoundsError::NonFinite));
        assert_eq!(DomainBounds::from_parts(Some(1.0), None, Some(2.0)), Err(BoundsError::Missing));
        assert!(DomainBounds::from_parts(Some(1.0), Some(-5.0), Some(2.0)).is_ok());
    }
}
