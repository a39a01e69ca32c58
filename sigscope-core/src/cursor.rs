//! Draggable frequency/time cursors over the spectrogram.
//!
//! Positions are stored in pixels relative to the plot image. Every update
//! goes through the [`CoordinateMapper`] so a cursor can never leave the
//! domain of the loaded file, and then through a pixel clamp so it can never
//! leave the image.

use crate::coords::CoordinateMapper;

/// Which pair of cursors is being addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CursorAxis {
    /// Vertical lines, positioned along x, marking frequencies.
    Vertical,
    /// Horizontal lines, positioned along y, marking times.
    Horizontal,
}

/// A single cursor handle being dragged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CursorTarget {
    pub axis: CursorAxis,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CursorSet {
    pub vertical: [Option<f64>; 2],
    pub horizontal: [Option<f64>; 2],
}

impl CursorSet {
    /// Cursors at 25% and 75% of the data area on both axes.
    ///
    /// Returns the empty set until the mapper has bounds and a laid-out frame.
    pub fn spanning(mapper: &CoordinateMapper) -> Self {
        if mapper.bounds().is_none() || !mapper.frame().is_laid_out() {
            return Self::default();
        }
        let (left, top, w, h) = mapper.plot_area();
        Self {
            vertical: [Some(left + 0.25 * w), Some(left + 0.75 * w)],
            horizontal: [Some(top + 0.25 * h), Some(top + 0.75 * h)],
        }
    }

    pub fn position(&self, axis: CursorAxis, index: usize) -> Option<f64> {
        self.slots(axis).get(index).copied().flatten()
    }

    /// All four cursors are placed.
    pub fn is_complete(&self) -> bool {
        self.vertical.iter().chain(&self.horizontal).all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.iter().chain(&self.horizontal).all(Option::is_none)
    }

    /// Move one cursor to follow the pointer, clamped to the domain and to
    /// the image. Returns the stored pixel position. Indices other than 0
    /// and 1 are ignored.
    pub fn drag_to(
        &mut self,
        target: CursorTarget,
        pointer_px: f64,
        mapper: &CoordinateMapper,
    ) -> Option<f64> {
        let frame = mapper.frame();
        let px = match target.axis {
            CursorAxis::Vertical => {
                let f = mapper.clamp_freq(mapper.pixel_x_to_freq(pointer_px));
                mapper.freq_to_pixel_x(f).clamp(0.0, frame.width.max(0.0))
            }
            CursorAxis::Horizontal => {
                let t = mapper.clamp_time(mapper.pixel_y_to_time(pointer_px));
                mapper.time_to_pixel_y(t).clamp(0.0, frame.height.max(0.0))
            }
        };
        let slot = self.slots_mut(target.axis).get_mut(target.index)?;
        *slot = Some(px);
        Some(px)
    }

    /// Frequencies under the two vertical cursors.
    pub fn frequencies(&self, mapper: &CoordinateMapper) -> [Option<f64>; 2] {
        self.vertical.map(|p| p.map(|x| mapper.pixel_x_to_freq(x)))
    }

    /// Times under the two horizontal cursors.
    pub fn times(&self, mapper: &CoordinateMapper) -> [Option<f64>; 2] {
        self.horizontal.map(|p| p.map(|y| mapper.pixel_y_to_time(y)))
    }

    /// Re-express the cursors for a resized image so they keep pointing at
    /// the same frequencies and times.
    pub fn rescaled(&self, from: &CoordinateMapper, to: &CoordinateMapper) -> Self {
        if !from.frame().is_laid_out() || from.bounds().is_none() {
            return Self::spanning(to);
        }
        Self {
            vertical: self
                .vertical
                .map(|p| p.map(|x| to.freq_to_pixel_x(from.pixel_x_to_freq(x)))),
            horizontal: self
                .horizontal
                .map(|p| p.map(|y| to.time_to_pixel_y(from.pixel_y_to_time(y)))),
        }
    }

    fn slots(&self, axis: CursorAxis) -> &[Option<f64>; 2] {
        match axis {
            CursorAxis::Vertical => &self.vertical,
            CursorAxis::Horizontal => &self.horizontal,
        }
    }

    fn slots_mut(&mut self, axis: CursorAxis) -> &mut [Option<f64>; 2] {
        match axis {
            CursorAxis::Vertical => &mut self.vertical,
            CursorAxis::Horizontal => &mut self.horizontal,
        }
    }
}

/// Global pointer listeners installed for the duration of one drag.
///
/// `attach` must either install both listeners or leave nothing installed.
pub trait PointerCapture {
    type Error;

    fn attach(&mut self) -> Result<(), Self::Error>;
    fn detach(&mut self);
}

/// Scoped ownership of a drag's pointer listeners.
///
/// Listeners are attached when the guard is created and detached exactly
/// once when it is released or dropped, whichever comes first.
pub struct DragGuard<C: PointerCapture> {
    target: CursorTarget,
    capture: Option<C>,
}

impl<C: PointerCapture> DragGuard<C> {
    pub fn begin(target: CursorTarget, mut capture: C) -> Result<Self, C::Error> {
        capture.attach()?;
        log::debug!("drag start {:?}", target);
        Ok(Self { target, capture: Some(capture) })
    }

    pub fn target(&self) -> CursorTarget {
        self.target
    }

    pub fn release(mut self) {
        self.detach_once();
    }

    fn detach_once(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            capture.detach();
            log::debug!("drag end {:?}", self.target);
        }
    }
}

impl<C: PointerCapture> Drop for DragGuard<C> {
    fn drop(&mut self) {
        self.detach_once();
    }
}
