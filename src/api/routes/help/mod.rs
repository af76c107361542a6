pub mod public;
mod router;
pub use router::{FALLBACK_REPLY, router};
