//! The scanning pipeline: walker, bounded worker pool and aggregator,
//! coordinated over two bounded channels and a cancellation token.
//!
//! ```text
//! walker -> jobs channel -> workers -> results channel -> aggregator
//! ```
//!
//! The [`Scanner`] owns the lifecycle: `start()` spawns everything,
//! `wait()` joins the pool, closes the results channel and waits for the
//! aggregator to finalize the summary.

mod aggregator;
mod cancel;
mod error;
mod scanner;
mod walker;
mod whitelist;
mod worker;

pub use cancel::CancelToken;
pub use error::{ScanError, Result};
pub use scanner::Scanner;
pub use whitelist::Whitelist;
