//! Interactive editing engine: projection, viewport mapping, selection,
//! drag/snap, history, transport, capture and clipboard.

pub mod capture;
pub mod clipboard;
pub mod drag;
pub mod editor;
pub mod history;
pub mod host;
pub mod selection;
pub mod track_view;
pub mod transport;
pub mod viewport;

pub use capture::{PoseSample, Recorder};
pub use editor::Editor;
pub use history::{History, HistoryAction, HistoryEntry};
pub use host::{HostEvent, HostLink};
pub use selection::SelectedKey;
pub use track_view::TrackView;
pub use transport::Transport;
pub use viewport::Viewport;
