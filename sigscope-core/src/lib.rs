//! Core model of the sigscope capture viewer: plot coordinate mapping,
//! measurement cursors, annotations, per-tab session state and the wire
//! types of the processing backend. Browser and HTTP code live elsewhere.

pub mod annotation;
pub mod api;
pub mod coords;
pub mod cursor;
pub mod format;
pub mod generate;
pub mod library;
pub mod metadata;
pub mod session;
pub mod tabs;

pub use annotation::{Annotation, AnnotationError, AnnotationSet, Corners, OverlayRect};
pub use coords::{CoordinateMapper, DomainBounds, PlotFrame, RenderPadding, SPECTROGRAM_PADDING};
pub use cursor::{CursorAxis, CursorSet, CursorTarget, DragGuard, PointerCapture};
pub use session::{PlotKind, Session, SessionPhase, Status};
pub use tabs::{TabId, Workspace};
