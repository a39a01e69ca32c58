//! State of one file-handling panel: file selection, upload/load lifecycle,
//! plot images, domain bounds, cursors and annotations of the loaded file.
//!
//! Requests are fire-and-forget from the UI's point of view, so every reply
//! is applied through a [`RequestTicket`]. Clearing, deleting or starting a
//! new load bumps the session generation; replies carrying an older ticket
//! are dropped instead of overwriting the newer state.

use std::sync::Arc;

use thiserror::Error;

use crate::annotation::{Annotation, AnnotationError, AnnotationSet, OverlayRect};
use crate::api::{BackendReply, FileDataResponse, SaveFileRequest, UploadResponse};
use crate::coords::{BoundsError, CoordinateMapper, DomainBounds, PlotFrame};
use crate::cursor::{CursorSet, CursorTarget};

pub const CAPTURE_EXTENSION: &str = ".cfile";
pub const METADATA_EXTENSION: &str = ".sigmf-meta";

pub const MSG_INITIAL: &str = "Please upload a .cfile and .sigmf-meta file";
pub const MSG_UPLOADING: &str = "Uploading files";
pub const MSG_UPLOAD_FAILED: &str = "Upload failed. Please try again.";
pub const MSG_LOADING: &str = "Loading file...";
pub const MSG_LOADED: &str = "Files loaded successfully";
pub const MSG_CLEARED: &str = "File cleared. Please upload new files.";
pub const MSG_DELETED: &str = "File successfully deleted.";
pub const MSG_BOTH_READY: &str = "Ready to upload both files.";
pub const MSG_SAVE_FAILED: &str = "Failed to save annotations.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Spectrogram,
    TimeDomain,
    FreqDomain,
    IqPlot,
}

impl PlotKind {
    /// Fetch order for a newly loaded file.
    pub const ALL: [PlotKind; 4] = [
        PlotKind::Spectrogram,
        PlotKind::TimeDomain,
        PlotKind::FreqDomain,
        PlotKind::IqPlot,
    ];

    /// Path segment in `GET /file/{id}/{kind}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlotKind::Spectrogram => "spectrogram",
            PlotKind::TimeDomain => "time_domain",
            PlotKind::FreqDomain => "freq_domain",
            PlotKind::IqPlot => "iq_plot",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlotKind::Spectrogram => "SPECTROGRAM",
            PlotKind::TimeDomain => "TIME DOMAIN",
            PlotKind::FreqDomain => "FREQ DOMAIN",
            PlotKind::IqPlot => "IQ PLOT",
        }
    }
}

impl std::str::FromStr for PlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown plot kind '{s}'"))
    }
}

/// Base64 PNG per plot kind; `None` while pending. Images are shared so
/// cloning the session does not copy them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotImageSet {
    images: [Option<Arc<str>>; 4],
}

impl PlotImageSet {
    pub fn get(&self, kind: PlotKind) -> Option<&str> {
        self.images[kind as usize].as_deref()
    }

    pub fn shared(&self, kind: PlotKind) -> Option<Arc<str>> {
        self.images[kind as usize].clone()
    }

    pub fn set(&mut self, kind: PlotKind, image: String) {
        self.images[kind as usize] = Some(image.into());
    }

    pub fn data_url(&self, kind: PlotKind) -> Option<String> {
        self.get(kind).map(|b64| format!("data:image/png;base64,{b64}"))
    }

    pub fn is_empty(&self) -> bool {
        self.images.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.images = Default::default();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileRole {
    Capture,
    Metadata,
}

impl FileRole {
    pub fn extension(&self) -> &'static str {
        match self {
            FileRole::Capture => CAPTURE_EXTENSION,
            FileRole::Metadata => METADATA_EXTENSION,
        }
    }

    pub fn accepts(&self, filename: &str) -> bool {
        filename.ends_with(self.extension())
    }

    fn describe(&self) -> &'static str {
        match self {
            FileRole::Capture => ".cfile",
            FileRole::Metadata => ".sigmf-meta file",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid file type. Please select a {}.", .role.describe())]
    WrongExtension { role: FileRole, filename: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Both .cfile and .sigmf-meta files are required.")]
    MissingFiles,
    #[error("An upload is already in progress.")]
    UploadInProgress,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Empty,
    Selecting,
    ReadyToUpload,
    Uploading,
    Loaded(String),
}

/// Identifies the request a reply belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    file_id: Option<String>,
}

impl RequestTicket {
    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }
}

/// Status banner text; busy statuses get an animated ellipsis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub busy: bool,
}

impl Status {
    pub fn idle(text: impl Into<String>) -> Self {
        Self { text: text.into(), busy: false }
    }

    pub fn busy(text: impl Into<String>) -> Self {
        Self { text: text.into(), busy: true }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::idle(MSG_INITIAL)
    }
}

#[derive(Clone, Debug, Default)]
pub struct FileSelection {
    pub capture: Option<String>,
    pub metadata: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Session {
    selection: FileSelection,
    uploading: bool,
    file_id: Option<String>,
    bounds: Option<DomainBounds>,
    frame: PlotFrame,
    plots: PlotImageSet,
    active_plot: PlotKind,
    annotations: AnnotationSet,
    cursors: CursorSet,
    show_cursors: bool,
    status: Status,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            selection: FileSelection::default(),
            uploading: false,
            file_id: None,
            bounds: None,
            frame: PlotFrame::default(),
            plots: PlotImageSet::default(),
            active_plot: PlotKind::Spectrogram,
            annotations: AnnotationSet::new(),
            cursors: CursorSet::default(),
            show_cursors: true,
            status: Status::default(),
            generation: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Read access ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        if self.uploading {
            SessionPhase::Uploading
        } else if let Some(id) = &self.file_id {
            SessionPhase::Loaded(id.clone())
        } else {
            match (&self.selection.capture, &self.selection.metadata) {
                (Some(_), Some(_)) => SessionPhase::ReadyToUpload,
                (None, None) => SessionPhase::Empty,
                _ => SessionPhase::Selecting,
            }
        }
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn can_upload(&self) -> bool {
        !self.uploading && self.selection.capture.is_some() && self.selection.metadata.is_some()
    }

    pub fn bounds(&self) -> Option<DomainBounds> {
        self.bounds
    }

    pub fn plots(&self) -> &PlotImageSet {
        &self.plots
    }

    pub fn active_plot(&self) -> PlotKind {
        self.active_plot
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.annotations.as_slice()
    }

    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    pub fn show_cursors(&self) -> bool {
        self.show_cursors
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::spectrogram(self.bounds, self.frame)
    }

    pub fn overlays(&self) -> Vec<OverlayRect> {
        self.annotations.overlays(&self.mapper())
    }

    /// Ticket for follow-up requests about the currently loaded file.
    pub fn current_ticket(&self) -> Option<RequestTicket> {
        self.file_id.as_ref().map(|id| RequestTicket {
            generation: self.generation,
            file_id: Some(id.clone()),
        })
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation
            && (ticket.file_id.is_none() || ticket.file_id == self.file_id)
    }

    // ── Plain UI state ───────────────────────────────────────────────────

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    pub fn set_active_plot(&mut self, kind: PlotKind) {
        self.active_plot = kind;
    }

    pub fn set_show_cursors(&mut self, show: bool) {
        self.show_cursors = show;
    }

    /// The plot image was laid out or resized. A collapsed frame (hidden
    /// tab) is ignored so cursors keep their last good positions.
    pub fn set_frame(&mut self, frame: PlotFrame) {
        if frame == self.frame || !frame.is_laid_out() {
            return;
        }
        let old = self.mapper();
        self.frame = frame;
        let new = self.mapper();
        self.cursors = if self.cursors.is_empty() {
            CursorSet::spanning(&new)
        } else {
            self.cursors.rescaled(&old, &new)
        };
    }

    pub fn drag_cursor(&mut self, target: CursorTarget, pointer_px: f64) -> Option<f64> {
        let mapper = self.mapper();
        self.cursors.drag_to(target, pointer_px, &mapper)
    }

    // ── File selection ───────────────────────────────────────────────────

    pub fn select_file(&mut self, role: FileRole, filename: &str) -> Result<(), SelectionError> {
        let slot = match role {
            FileRole::Capture => &mut self.selection.capture,
            FileRole::Metadata => &mut self.selection.metadata,
        };
        if !role.accepts(filename) {
            *slot = None;
            let err = SelectionError::WrongExtension { role, filename: filename.to_string() };
            self.status = Status::idle(err.to_string());
            return Err(err);
        }
        *slot = Some(filename.to_string());
        self.status = Status::idle(self.selection_prompt());
        Ok(())
    }

    /// Forget the picked file for `role`, e.g. after the picker was cancelled.
    pub fn deselect(&mut self, role: FileRole) {
        match role {
            FileRole::Capture => self.selection.capture = None,
            FileRole::Metadata => self.selection.metadata = None,
        }
        if self.file_id.is_none() && !self.uploading {
            self.status = match (&self.selection.capture, &self.selection.metadata) {
                (None, None) => Status::default(),
                _ => Status::idle(self.selection_prompt()),
            };
        }
    }

    fn selection_prompt(&self) -> &'static str {
        match (&self.selection.capture, &self.selection.metadata) {
            (Some(_), Some(_)) => MSG_BOTH_READY,
            (Some(_), None) => "Now select and upload a .sigmf-meta file.",
            _ => "Now select and upload a .cfile.",
        }
    }

    pub fn select_capture(&mut self, filename: &str) -> Result<(), SelectionError> {
        self.select_file(FileRole::Capture, filename)
    }

    pub fn select_metadata(&mut self, filename: &str) -> Result<(), SelectionError> {
        self.select_file(FileRole::Metadata, filename)
    }

    // ── Upload ───────────────────────────────────────────────────────────

    pub fn begin_upload(&mut self) -> Result<RequestTicket, SessionError> {
        if self.uploading {
            return Err(SessionError::UploadInProgress);
        }
        if self.selection.capture.is_none() || self.selection.metadata.is_none() {
            self.status = Status::idle(SessionError::MissingFiles.to_string());
            return Err(SessionError::MissingFiles);
        }
        self.generation += 1;
        self.uploading = true;
        self.status = Status::busy(MSG_UPLOADING);
        Ok(RequestTicket { generation: self.generation, file_id: None })
    }

    /// Apply an upload reply. Returns the ticket for fetching the remaining
    /// plots of the new file, or `None` when the reply was stale or carried
    /// an error.
    pub fn apply_upload(
        &mut self,
        ticket: &RequestTicket,
        reply: UploadResponse,
    ) -> Option<RequestTicket> {
        if !self.is_current(ticket) {
            log::warn!("discarding stale upload reply");
            return None;
        }
        self.uploading = false;
        if let Some(err) = reply.backend_error() {
            self.status = Status::idle(err);
            return None;
        }
        let Some(file_id) = reply.file_id.clone() else {
            self.status = Status::idle(MSG_UPLOAD_FAILED);
            return None;
        };

        self.reset_file_state();
        self.file_id = Some(file_id.clone());
        self.bounds = bounds_or_warn(reply.bounds());
        self.annotations.replace_all(reply.annotations.unwrap_or_default());
        self.cursors = CursorSet::spanning(&self.mapper());
        if let Some(img) = reply.spectrogram {
            self.plots.set(PlotKind::Spectrogram, img);
        }
        self.active_plot = PlotKind::Spectrogram;
        self.status = Status::idle(reply.message.unwrap_or_else(|| MSG_LOADED.to_string()));
        log::debug!("upload applied, file {file_id}");
        Some(RequestTicket { generation: self.generation, file_id: Some(file_id) })
    }

    /// Transport or HTTP failure of a request; state is otherwise kept.
    pub fn fail(&mut self, ticket: &RequestTicket, message: &str) {
        if !self.is_current(ticket) {
            return;
        }
        self.uploading = false;
        self.status = Status::idle(message);
    }

    // ── Load an existing file ────────────────────────────────────────────

    pub fn begin_load(&mut self, file_id: &str) -> RequestTicket {
        self.generation += 1;
        self.uploading = false;
        self.reset_file_state();
        self.file_id = Some(file_id.to_string());
        self.active_plot = PlotKind::Spectrogram;
        self.status = Status::idle(MSG_LOADING);
        RequestTicket { generation: self.generation, file_id: Some(file_id.to_string()) }
    }

    /// Bounds and annotations of a loaded file. Returns whether applied.
    pub fn apply_file_data(&mut self, ticket: &RequestTicket, reply: FileDataResponse) -> bool {
        if !self.is_current(ticket) {
            log::warn!("discarding stale file data for {:?}", ticket.file_id);
            return false;
        }
        if let Some(err) = reply.backend_error() {
            self.status = Status::idle(err);
            return false;
        }
        self.bounds = bounds_or_warn(reply.bounds());
        self.annotations.replace_all(reply.annotations.unwrap_or_default());
        self.cursors = CursorSet::spanning(&self.mapper());
        self.status = Status::idle(MSG_LOADED);
        true
    }

    /// One plot image arrived; kinds may arrive in any order.
    pub fn apply_plot(&mut self, ticket: &RequestTicket, kind: PlotKind, image: String) -> bool {
        if !self.is_current(ticket) {
            log::warn!("discarding stale {} image", kind.as_str());
            return false;
        }
        self.plots.set(kind, image);
        if kind == PlotKind::Spectrogram {
            self.active_plot = PlotKind::Spectrogram;
        }
        true
    }

    /// Status update for a follow-up request, ignored when stale.
    pub fn report(&mut self, ticket: &RequestTicket, status: Status) {
        if self.is_current(ticket) {
            self.status = status;
        }
    }

    // ── Clear / delete ───────────────────────────────────────────────────

    /// Forget the loaded file and the current selection in one step.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.uploading = false;
        self.selection = FileSelection::default();
        self.reset_file_state();
        self.status = Status::idle(MSG_CLEARED);
    }

    /// A library file was deleted on the backend. Returns whether it was the
    /// one loaded here.
    pub fn file_deleted(&mut self, file_id: &str) -> bool {
        if self.file_id.as_deref() != Some(file_id) {
            return false;
        }
        self.generation += 1;
        self.uploading = false;
        self.selection = FileSelection::default();
        self.reset_file_state();
        self.status = Status::idle(MSG_DELETED);
        true
    }

    /// Everything derived from a loaded file goes together.
    fn reset_file_state(&mut self) {
        self.file_id = None;
        self.bounds = None;
        self.plots.clear();
        self.annotations.clear();
        self.cursors = CursorSet::default();
        self.active_plot = PlotKind::Spectrogram;
    }

    // ── Annotations ──────────────────────────────────────────────────────

    /// Create from the current cursors. On success returns the full list to
    /// persist; the local append is kept even if persisting fails.
    pub fn create_annotation(
        &mut self,
        label: &str,
        comment: &str,
    ) -> Result<SaveFileRequest, AnnotationError> {
        let Some(file_id) = self.file_id.clone() else {
            return Err(AnnotationError::NoFile);
        };
        let mapper = self.mapper();
        if let Err(e) = self.annotations.create(&self.cursors, &mapper, label, comment) {
            self.status = Status::idle(e.to_string());
            return Err(e);
        }
        Ok(SaveFileRequest { file_id, annotations: self.annotations.as_slice().to_vec() })
    }

    pub fn delete_annotation(&mut self, id: &str) -> Option<SaveFileRequest> {
        let file_id = self.file_id.clone()?;
        self.annotations.delete(id)?;
        Some(SaveFileRequest { file_id, annotations: self.annotations.as_slice().to_vec() })
    }

    pub fn toggle_annotation(&mut self, id: &str, display: bool) -> bool {
        self.annotations.toggle_display(id, display)
    }
}

fn bounds_or_warn(bounds: Result<DomainBounds, BoundsError>) -> Option<DomainBounds> {
    bounds.map_err(|e| log::warn!("no usable domain bounds: {e}")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorAxis;

    fn upload_reply(id: &str) -> UploadResponse {
        serde_json::from_value(serde_json::json!({
            "file_id": id,
            "message": "CSV saved and spectrogram generated successfully",
            "spectrogram": "U1BFQw==",
            "max_time": 10.0, "min_freq": 0.0, "max_freq": 1000.0,
            "annotations": [
                {"id": "42", "corners": {"freq1": 100, "time1": 2, "freq2": 300, "time2": 5}, "label": "burst", "comment": "", "display": true}
            ]
        }))
        .unwrap()
    }

    fn loaded(id: &str) -> Session {
        let mut s = Session::new();
        s.select_capture("cap.cfile").unwrap();
        s.select_metadata("cap.sigmf-meta").unwrap();
        let t = s.begin_upload().unwrap();
        s.apply_upload(&t, upload_reply(id)).unwrap();
        s.set_frame(PlotFrame::new(1000.0, 500.0));
        s
    }

    #[test]
    fn test_phases() {
        let mut s = Session::new();
        assert_eq!(s.phase(), SessionPhase::Empty);
        s.select_file(FileRole::Capture, "a.cfile").unwrap();
        assert_eq!(s.phase(), SessionPhase::Selecting);
        assert_eq!(s.status().text, "Now select and upload a .sigmf-meta file.");
        s.select_file(FileRole::Metadata, "a.sigmf-meta").unwrap();
        assert_eq!(s.phase(), SessionPhase::ReadyToUpload);
        assert_eq!(s.status().text, MSG_BOTH_READY);
        let t = s.begin_upload().unwrap();
        assert_eq!(s.phase(), SessionPhase::Uploading);
        assert!(s.status().busy);
        assert_eq!(s.begin_upload(), Err(SessionError::UploadInProgress));
        s.apply_upload(&t, upload_reply("f1")).unwrap();
        assert_eq!(s.phase(), SessionPhase::Loaded("f1".into()));
        assert!(!s.status().busy);
    }

    #[test]
    fn test_deselect_disables_upload() {
        let mut s = Session::new();
        s.select_file(FileRole::Capture, "a.cfile").unwrap();
        s.select_file(FileRole::Metadata, "a.sigmf-meta").unwrap();
        assert!(s.can_upload());

        s.deselect(FileRole::Capture);
        assert_eq!(s.phase(), SessionPhase::Selecting);
        assert!(!s.can_upload());
        assert_eq!(s.status().text, "Now select and upload a .cfile.");
        assert_eq!(s.begin_upload(), Err(SessionError::MissingFiles));

        s.deselect(FileRole::Metadata);
        assert_eq!(s.phase(), SessionPhase::Empty);
        assert_eq!(s.status().text, MSG_INITIAL);
    }

    #[test]
    fn test_wrong_extension_resets_slot() {
        let mut s = Session::new();
        s.select_file(FileRole::Capture, "a.cfile").unwrap();
        let err = s.select_file(FileRole::Capture, "a.wav").unwrap_err();
        assert!(matches!(err, SelectionError::WrongExtension { role: FileRole::Capture, .. }));
        assert!(s.selection().capture.is_none());
        assert_eq!(s.status().text, "Invalid file type. Please select a .cfile.");

        let err = s.select_file(FileRole::Metadata, "a.sigmf-data").unwrap_err();
        assert_eq!(err.to_string(), "Invalid file type. Please select a .sigmf-meta file.");
        assert_eq!(s.phase(), SessionPhase::Empty);
    }

    #[test]
    fn test_upload_requires_both_files() {
        let mut s = Session::new();
        s.select_file(FileRole::Metadata, "a.sigmf-meta").unwrap();
        assert_eq!(s.begin_upload(), Err(SessionError::MissingFiles));
        assert_eq!(s.phase(), SessionPhase::Selecting);
    }

    #[test]
    fn test_plot_image_survives_unrelated_updates() {
        let mut s = loaded("f1");
        let before = s.plots().shared(PlotKind::Spectrogram).unwrap();
        s.set_frame(PlotFrame::new(800.0, 400.0));
        s.drag_cursor(CursorTarget { axis: CursorAxis::Vertical, index: 0 }, 120.0);
        let after = s.plots().shared(PlotKind::Spectrogram).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(s.plots().shared(PlotKind::IqPlot).is_none());
    }

    #[test]
    fn test_upload_populates_everything() {
        let s = loaded("f1");
        assert_eq!(s.bounds(), Some(DomainBounds::new(10.0, 0.0, 1000.0).unwrap()));
        assert_eq!(s.plots().get(PlotKind::Spectrogram), Some("U1BFQw=="));
        assert_eq!(s.plots().data_url(PlotKind::Spectrogram).unwrap(), "data:image/png;base64,U1BFQw==");
        assert_eq!(s.annotations().len(), 1);
        assert!(s.cursors().is_complete());
        assert_eq!(s.overlays().len(), 1);
        assert_eq!(s.status().text, "CSV saved and spectrogram generated successfully");
    }

    #[test]
    fn test_upload_backend_error_surfaces_verbatim() {
        let mut s = Session::new();
        s.select_file(FileRole::Capture, "a.cfile").unwrap();
        s.select_file(FileRole::Metadata, "a.sigmf-meta").unwrap();
        let t = s.begin_upload().unwrap();
        let reply = UploadResponse { error: Some("Both files required".into()), ..Default::default() };
        assert!(s.apply_upload(&t, reply).is_none());
        assert_eq!(s.status().text, "Both files required");
        assert_eq!(s.phase(), SessionPhase::ReadyToUpload);
    }

    #[test]
    fn test_upload_network_failure_keeps_state() {
        let mut s = loaded("f1");
        let t = s.begin_upload().unwrap();
        s.fail(&t, MSG_UPLOAD_FAILED);
        assert_eq!(s.phase(), SessionPhase::Loaded("f1".into()));
        assert_eq!(s.annotations().len(), 1);
        assert_eq!(s.status().text, MSG_UPLOAD_FAILED);
    }

    #[test]
    fn test_plots_in_any_order() {
        let mut s = Session::new();
        let t = s.begin_load("f9");
        s.set_active_plot(PlotKind::IqPlot);
        assert!(s.apply_plot(&t, PlotKind::IqPlot, "iq".into()));
        assert!(s.apply_plot(&t, PlotKind::FreqDomain, "fd".into()));
        assert_eq!(s.active_plot(), PlotKind::IqPlot);
        assert!(s.apply_plot(&t, PlotKind::Spectrogram, "sp".into()));
        assert_eq!(s.active_plot(), PlotKind::Spectrogram);
        assert!(s.plots().get(PlotKind::TimeDomain).is_none());
        assert_eq!(s.plots().get(PlotKind::IqPlot), Some("iq"));
    }

    #[test]
    fn test_clear_resets_together() {
        let mut s = loaded("f1");
        s.clear();
        assert_eq!(s.phase(), SessionPhase::Empty);
        assert!(s.bounds().is_none());
        assert!(s.plots().is_empty());
        assert!(s.annotations().is_empty());
        assert!(s.cursors().is_empty());
        assert!(s.overlays().is_empty());
        assert_eq!(s.mapper().pixel_x_to_freq(300.0), 0.0);
        assert_eq!(s.status().text, MSG_CLEARED);
    }

    #[test]
    fn test_stale_replies_dropped_after_clear() {
        let mut s = Session::new();
        let t = s.begin_load("f1");
        s.clear();
        assert!(!s.apply_plot(&t, PlotKind::Spectrogram, "old".into()));
        let data = FileDataResponse {
            max_time: Some(1.0),
            min_freq: Some(0.0),
            max_freq: Some(2.0),
            ..Default::default()
        };
        assert!(!s.apply_file_data(&t, data));
        assert!(s.plots().is_empty());
        assert!(s.bounds().is_none());
    }

    #[test]
    fn test_stale_replies_dropped_after_reload() {
        let mut s = Session::new();
        let first = s.begin_load("f1");
        let second = s.begin_load("f2");
        assert!(!s.apply_plot(&first, PlotKind::Spectrogram, "f1-img".into()));
        assert!(s.apply_plot(&second, PlotKind::Spectrogram, "f2-img".into()));
        assert_eq!(s.plots().get(PlotKind::Spectrogram), Some("f2-img"));
    }

    #[test]
    fn test_stale_upload_after_clear() {
        let mut s = Session::new();
        s.select_file(FileRole::Capture, "a.cfile").unwrap();
        s.select_file(FileRole::Metadata, "a.sigmf-meta").unwrap();
        let t = s.begin_upload().unwrap();
        s.clear();
        assert!(s.apply_upload(&t, upload_reply("late")).is_none());
        assert_eq!(s.phase(), SessionPhase::Empty);
        assert!(s.annotations().is_empty());
    }

    #[test]
    fn test_load_data_sets_bounds_and_cursors() {
        let mut s = Session::new();
        s.set_frame(PlotFrame::new(800.0, 400.0));
        let t = s.begin_load("f1");
        let reply: FileDataResponse = serde_json::from_str(
            r#"{"max_time": 4, "min_freq": -500, "max_freq": 500, "annotations": []}"#,
        )
        .unwrap();
        assert!(s.apply_file_data(&t, reply));
        assert!(s.cursors().is_complete());
        assert_eq!(s.status().text, MSG_LOADED);
    }

    #[test]
    fn test_delete_loaded_file_resets() {
        let mut s = loaded("f1");
        let stale = s.current_ticket().unwrap();
        assert!(!s.file_deleted("other"));
        assert_eq!(s.annotations().len(), 1);
        assert!(s.file_deleted("f1"));
        assert_eq!(s.phase(), SessionPhase::Empty);
        assert!(s.plots().is_empty());
        assert!(!s.is_current(&stale));
    }

    #[test]
    fn test_annotation_roundtrip_through_session() {
        let mut s = loaded("f1");
        let req = s.create_annotation("carrier", "narrowband").unwrap();
        assert_eq!(req.file_id, "f1");
        assert_eq!(req.annotations.len(), 2);

        let new_id = req.annotations[1].id.clone();
        assert!(s.toggle_annotation(&new_id, false));
        assert_eq!(s.overlays().len(), 1);

        let req = s.delete_annotation("42").unwrap();
        assert_eq!(req.annotations.len(), 1);
        assert_eq!(req.annotations[0].id, new_id);
        assert!(!req.annotations[0].display);
    }

    #[test]
    fn test_blank_label_no_request() {
        let mut s = loaded("f1");
        assert_eq!(s.create_annotation("   ", "x"), Err(AnnotationError::EmptyLabel));
        assert_eq!(s.annotations().len(), 1);
    }

    #[test]
    fn test_annotation_without_file() {
        let mut s = Session::new();
        assert_eq!(s.create_annotation("a", ""), Err(AnnotationError::NoFile));
        assert!(s.delete_annotation("42").is_none());
    }

    #[test]
    fn test_resize_keeps_cursor_frequencies() {
        let mut s = loaded("f1");
        let target = CursorTarget { axis: CursorAxis::Vertical, index: 0 };
        s.drag_cursor(target, 300.0);
        let before = s.cursors().frequencies(&s.mapper())[0].unwrap();
        s.set_frame(PlotFrame::new(1600.0, 500.0));
        let after = s.cursors().frequencies(&s.mapper())[0].unwrap();
        assert!((before - after).abs() < 1e-6);
    }

    #[test]
    fn test_hidden_frame_keeps_cursors() {
        let mut s = loaded("f1");
        let before = *s.cursors();
        s.set_frame(PlotFrame::new(0.0, 0.0));
        assert_eq!(*s.cursors(), before);
        assert_eq!(s.mapper().frame(), PlotFrame::new(1000.0, 500.0));
    }

    #[test]
    fn test_plot_kind_parse() {
        assert_eq!("iq_plot".parse::<PlotKind>(), Ok(PlotKind::IqPlot));
        assert!("waterfall".parse::<PlotKind>().is_err());
    }
}
