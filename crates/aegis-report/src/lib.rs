//! In-memory scan report and its renderers.
//!
//! The aggregator is the single writer; once the scan completes the
//! report can be rendered as indented JSON or a self-contained HTML
//! document.

mod html;
mod report;

pub use html::render_html;
pub use report::{Report, ReportError};
