//! Extracts the printed plays from a photograph of a Powerball ticket.
//!
//! The primary path binarizes the frame, normalizes perspective and rotation
//! on the ticket's QR code, isolates the plays band, and reads each row by
//! template matching. A conservative textual fallback over externally
//! recognized text runs only when the primary path recovers nothing. Either
//! way the result is a list of validated [`Play`]s in ticket order; the
//! pipeline reports failure as an empty list rather than guessing.

pub mod draws;
pub mod extract;
pub mod prize;
pub mod templates;
pub mod types;

pub use extract::{extract_plays, Recognizer};
pub use templates::TemplateSet;
pub use types::{Play, TicketError, TicketResult};
