//! Labelled frequency x time regions drawn over the spectrogram.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use web_time::{SystemTime, UNIX_EPOCH};

use crate::coords::CoordinateMapper;
use crate::cursor::CursorSet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("Enter a label before creating an annotation.")]
    EmptyLabel,
    #[error("Place both frequency cursors and both time cursors first.")]
    IncompleteCursors,
    #[error("Load a file before creating annotations.")]
    NoFile,
}

/// Rectangle corners in domain units (Hz, seconds).
///
/// Always kept with `freq1 <= freq2` and `time1 <= time2`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    pub freq1: f64,
    pub time1: f64,
    pub freq2: f64,
    pub time2: f64,
}

impl Corners {
    /// Order-independent: either cursor may hold the smaller value.
    pub fn from_values(freq_a: f64, freq_b: f64, time_a: f64, time_b: f64) -> Self {
        Self {
            freq1: freq_a.min(freq_b),
            freq2: freq_a.max(freq_b),
            time1: time_a.min(time_b),
            time2: time_a.max(time_b),
        }
    }

    pub fn normalized(self) -> Self {
        Self::from_values(self.freq1, self.freq2, self.time1, self.time2)
    }

    pub fn bandwidth(&self) -> f64 {
        self.freq2 - self.freq1
    }

    pub fn duration(&self) -> f64 {
        self.time2 - self.time1
    }
}

fn default_display() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default)]
    pub id: String,
    pub corners: Corners,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default = "default_display")]
    pub display: bool,
}

/// Overlay box for one visible annotation, in image pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayRect {
    pub id: String,
    pub label: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Issues time-based ids that never repeat within a session.
#[derive(Clone, Debug, Default)]
pub struct AnnotationIdGen {
    last: u64,
}

impl AnnotationIdGen {
    pub fn next_id(&mut self) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        self.next_at(now)
    }

    pub fn next_at(&mut self, millis: u64) -> String {
        let id = millis.max(self.last.saturating_add(1));
        self.last = id;
        id.to_string()
    }

    /// Note an id that came from elsewhere so it is never handed out again.
    pub fn observe(&mut self, id: &str) {
        // Ids at the top of the range would leave nothing to count up into.
        if let Ok(n) = id.parse::<u64>() {
            if n < u64::MAX / 2 {
                self.last = self.last.max(n);
            }
        }
    }
}

/// Annotations of one loaded file. The backend owns the persisted copy; this
/// is a cache that is replaced wholesale on reload.
#[derive(Clone, Debug, Default)]
pub struct AnnotationSet {
    items: Vec<Annotation>,
    ids: AnnotationIdGen,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with annotations received from the backend.
    pub fn replace_all(&mut self, incoming: Vec<Annotation>) {
        self.items.clear();
        for mut a in incoming {
            a.corners = a.corners.normalized();
            if a.id.is_empty() || self.items.iter().any(|b| b.id == a.id) {
                a.id = self.ids.next_id();
            } else {
                self.ids.observe(&a.id);
            }
            self.items.push(a);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.items.iter().find(|a| a.id == id)
    }

    /// Build an annotation from the current cursors and append it.
    pub fn create(
        &mut self,
        cursors: &CursorSet,
        mapper: &CoordinateMapper,
        label: &str,
        comment: &str,
    ) -> Result<&Annotation, AnnotationError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }
        if mapper.bounds().is_none() {
            return Err(AnnotationError::NoFile);
        }
        let ([Some(fa), Some(fb)], [Some(ta), Some(tb)]) =
            (cursors.frequencies(mapper), cursors.times(mapper))
        else {
            return Err(AnnotationError::IncompleteCursors);
        };

        let annotation = Annotation {
            id: self.ids.next_id(),
            corners: Corners::from_values(fa, fb, ta, tb),
            label: label.to_string(),
            comment: comment.trim().to_string(),
            display: true,
        };
        log::debug!("annotation {} created: {:?}", annotation.id, annotation.corners);
        self.items.push(annotation);
        Ok(&self.items[self.items.len() - 1])
    }

    pub fn delete(&mut self, id: &str) -> Option<Annotation> {
        let pos = self.items.iter().position(|a| a.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Show or hide one annotation's overlay. Local only.
    pub fn toggle_display(&mut self, id: &str, display: bool) -> bool {
        match self.items.iter_mut().find(|a| a.id == id) {
            Some(a) => {
                a.display = display;
                true
            }
            None => false,
        }
    }

    /// Pixel boxes for the visible annotations under the given mapper.
    pub fn overlays(&self, mapper: &CoordinateMapper) -> Vec<OverlayRect> {
        self.items
            .iter()
            .filter(|a| a.display)
            .map(|a| {
                let c = a.corners;
                let x1 = mapper.freq_to_pixel_x(c.freq1);
                let x2 = mapper.freq_to_pixel_x(c.freq2);
                let y1 = mapper.time_to_pixel_y(c.time1);
                let y2 = mapper.time_to_pixel_y(c.time2);
                OverlayRect {
                    id: a.id.clone(),
                    label: a.label.clone(),
                    left: x1.min(x2),
                    top: y1.min(y2),
                    width: (x2 - x1).abs(),
                    height: (y2 - y1).abs(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{DomainBounds, PlotFrame};
    use crate::cursor::{CursorAxis, CursorTarget};

    fn mapper() -> CoordinateMapper {
        let bounds = DomainBounds::new(10.0, 0.0, 1000.0).unwrap();
        CoordinateMapper::spectrogram(Some(bounds), PlotFrame::new(1000.0, 500.0))
    }

    fn cursors_at(m: &CoordinateMapper, freqs: [f64; 2], times: [f64; 2]) -> CursorSet {
        CursorSet {
            vertical: freqs.map(|f| Some(m.freq_to_pixel_x(f))),
            horizontal: times.map(|t| Some(m.time_to_pixel_y(t))),
        }
    }

    fn assert_corners(c: Corners, f1: f64, f2: f64, t1: f64, t2: f64) {
        assert!((c.freq1 - f1).abs() < 1e-6, "freq1 {}", c.freq1);
        assert!((c.freq2 - f2).abs() < 1e-6, "freq2 {}", c.freq2);
        assert!((c.time1 - t1).abs() < 1e-9, "time1 {}", c.time1);
        assert!((c.time2 - t2).abs() < 1e-9, "time2 {}", c.time2);
    }

    #[test]
    fn test_create_is_order_independent() {
        let m = mapper();
        for (freqs, times) in [
            ([100.0, 300.0], [2.0, 5.0]),
            ([300.0, 100.0], [5.0, 2.0]),
            ([100.0, 300.0], [5.0, 2.0]),
            ([300.0, 100.0], [2.0, 5.0]),
        ] {
            let mut set = AnnotationSet::new();
            let a = set.create(&cursors_at(&m, freqs, times), &m, "burst", "").unwrap();
            assert_corners(a.corners, 100.0, 300.0, 2.0, 5.0);
            assert!(a.display);
        }
    }

    #[test]
    fn test_create_after_dragging_past_each_other() {
        let m = mapper();
        let mut cursors = CursorSet::spanning(&m);
        let v0 = CursorTarget { axis: CursorAxis::Vertical, index: 0 };
        // Drag cursor 0 well to the right of cursor 1.
        cursors.drag_to(v0, 950.0, &m);
        let mut set = AnnotationSet::new();
        let c = set.create(&cursors, &m, "x", "").unwrap().corners;
        assert!(c.freq1 <= c.freq2);
        assert!(c.time1 <= c.time2);
    }

    #[test]
    fn test_blank_label_rejected() {
        let m = mapper();
        let cursors = cursors_at(&m, [100.0, 300.0], [2.0, 5.0]);
        let mut set = AnnotationSet::new();
        assert_eq!(set.create(&cursors, &m, "", "c").unwrap_err(), AnnotationError::EmptyLabel);
        assert_eq!(set.create(&cursors, &m, " \t\n", "c").unwrap_err(), AnnotationError::EmptyLabel);
        assert!(set.is_empty());
    }

    #[test]
    fn test_incomplete_cursors_rejected() {
        let m = mapper();
        let mut cursors = cursors_at(&m, [100.0, 300.0], [2.0, 5.0]);
        cursors.horizontal[1] = None;
        let mut set = AnnotationSet::new();
        assert_eq!(
            set.create(&cursors, &m, "lbl", "").unwrap_err(),
            AnnotationError::IncompleteCursors
        );
        assert!(set.is_empty());
    }

    #[test]
    fn test_create_without_file_rejected() {
        let m = CoordinateMapper::spectrogram(None, PlotFrame::new(1000.0, 500.0));
        let cursors = CursorSet { vertical: [Some(1.0), Some(2.0)], horizontal: [Some(1.0), Some(2.0)] };
        let mut set = AnnotationSet::new();
        assert_eq!(set.create(&cursors, &m, "lbl", "").unwrap_err(), AnnotationError::NoFile);
    }

    #[test]
    fn test_label_and_comment_trimmed() {
        let m = mapper();
        let cursors = cursors_at(&m, [100.0, 300.0], [2.0, 5.0]);
        let mut set = AnnotationSet::new();
        let a = set.create(&cursors, &m, "  wifi ", " beacon\n").unwrap();
        assert_eq!(a.label, "wifi");
        assert_eq!(a.comment, "beacon");
    }

    #[test]
    fn test_hide_show_roundtrip_keeps_geometry() {
        let m = mapper();
        let mut set = AnnotationSet::new();
        let id = set.create(&cursors_at(&m, [100.0, 300.0], [2.0, 5.0]), &m, "a", "").unwrap().id.clone();
        let before = set.overlays(&m);
        assert_eq!(before.len(), 1);

        assert!(set.toggle_display(&id, false));
        assert!(set.overlays(&m).is_empty());

        assert!(set.toggle_display(&id, true));
        assert_eq!(set.overlays(&m), before);
        assert!(!set.toggle_display("missing", true));
    }

    #[test]
    fn test_delete_leaves_others_untouched() {
        let m = mapper();
        let mut set = AnnotationSet::new();
        let c = cursors_at(&m, [100.0, 300.0], [2.0, 5.0]);
        let a = set.create(&c, &m, "a", "").unwrap().id.clone();
        let b = set.create(&c, &m, "b", "").unwrap().id.clone();
        let d = set.create(&c, &m, "c", "").unwrap().id.clone();
        set.toggle_display(&d, false);

        let removed = set.delete(&b).unwrap();
        assert_eq!(removed.label, "b");
        let left: Vec<_> = set.iter().map(|x| (x.id.clone(), x.display)).collect();
        assert_eq!(left, vec![(a, true), (d, false)]);
        assert!(set.delete(&b).is_none());
    }

    #[test]
    fn test_overlay_geometry() {
        let m = mapper();
        let mut set = AnnotationSet::new();
        set.create(&cursors_at(&m, [100.0, 300.0], [2.0, 5.0]), &m, "a", "").unwrap();
        let r = &set.overlays(&m)[0];
        assert!((r.left - m.freq_to_pixel_x(100.0)).abs() < 1e-9);
        assert!((r.width - (m.freq_to_pixel_x(300.0) - m.freq_to_pixel_x(100.0))).abs() < 1e-9);
        assert!((r.top - m.time_to_pixel_y(2.0)).abs() < 1e-9);
        assert!((r.height - (m.time_to_pixel_y(5.0) - m.time_to_pixel_y(2.0))).abs() < 1e-9);
    }

    #[test]
    fn test_overlays_follow_resize() {
        let m = mapper();
        let mut set = AnnotationSet::new();
        set.create(&cursors_at(&m, [100.0, 300.0], [2.0, 5.0]), &m, "a", "").unwrap();
        let wide = CoordinateMapper::spectrogram(m.bounds(), PlotFrame::new(2000.0, 500.0));
        let narrow = set.overlays(&m)[0].width;
        let doubled = set.overlays(&wide)[0].width;
        assert!((doubled - 2.0 * narrow).abs() < 1e-9);
    }

    #[test]
    fn test_ids_unique_and_increasing() {
        let mut ids = AnnotationIdGen::default();
        let a = ids.next_at(1_000);
        let b = ids.next_at(1_000);
        let c = ids.next_at(999);
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("1000", "1001", "1002"));
        ids.observe("5000");
        assert_eq!(ids.next_at(10), "5001");
        ids.observe("not-a-number");
        assert_eq!(ids.next_at(10), "5002");
    }

    #[test]
    fn test_replace_all_normalizes_and_fills_ids() {
        let json = r#"[
            {"id": "7", "corners": {"freq1": 500, "time1": 4, "freq2": 200, "time2": 1}, "label": "a"},
            {"corners": {"freq1": 1, "time1": 1, "freq2": 2, "time2": 2}, "label": "b", "comment": "x", "display": false},
            {"id": "7", "corners": {"freq1": 1, "time1": 1, "freq2": 2, "time2": 2}, "label": "dup"}
        ]"#;
        let incoming: Vec<Annotation> = serde_json::from_str(json).unwrap();
        let mut set = AnnotationSet::new();
        set.replace_all(incoming);
        let a = set.get("7").unwrap();
        assert_eq!(a.corners, Corners { freq1: 200.0, time1: 1.0, freq2: 500.0, time2: 4.0 });
        assert!(a.display);
        let ids: Vec<&str> = set.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids[1] != "" && ids[1] != "7" && ids[2] != "7");
        assert!(!set.as_slice()[1].display);
    }

    #[test]
    fn test_huge_backend_id_does_not_exhaust_ids() {
        let json = r#"[
            {"id": "18446744073709551615", "corners": {"freq1": 1, "time1": 1, "freq2": 2, "time2": 2}, "label": "max"},
            {"id": "18446744073709551615", "corners": {"freq1": 1, "time1": 1, "freq2": 2, "time2": 2}, "label": "dup"}
        ]"#;
        let mut set = AnnotationSet::new();
        set.replace_all(serde_json::from_str(json).unwrap());
        let m = mapper();
        let id = set.create(&cursors_at(&m, [100.0, 300.0], [2.0, 5.0]), &m, "new", "").unwrap().id.clone();
        let ids: Vec<&str> = set.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids[1] != ids[0] && id != ids[0] && id != ids[1]);
    }

    #[test]
    fn test_serializes_backend_shape() {
        let a = Annotation {
            id: "1".into(),
            corners: Corners::from_values(1.0, 2.0, 3.0, 4.0),
            label: "l".into(),
            comment: String::new(),
            display: true,
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["corners"]["freq2"], 2.0);
        assert_eq!(v["corners"]["time1"], 3.0);
        assert_eq!(v["display"], true);
    }
}
