//! Client side of the help flow: the form state and the HTTP client
//! that talks to `/api/help`.

mod attachment;
mod form;
mod transport;

pub use attachment::{data_uri, load_attachments, read_attachment, remote_attachment};
pub use form::{ERROR_PREFIX, HelpForm, PLACEHOLDER, Submission, View};
pub use transport::{HelpClient, HelpTransport};
