pub mod annotations_panel;
pub mod app;
pub mod file_handle;
pub mod generate;
pub mod plot_view;
pub mod saved_files;
pub mod statistics;
pub mod status_line;
pub mod tab_bar;
