//! Preview server for built scriptura reports.
//!
//! Serves an output directory over plain HTTP until interrupted. The
//! directory is passed in explicitly; the process working directory is never
//! changed.

pub mod server;

pub use server::{router, PreviewServer, PreviewServerConfig, ServerError, REPORT_PAGE};
