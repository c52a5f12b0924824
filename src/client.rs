//! Story client: hosts a session and talks to the completion proxy

mod driver;
mod transport;

pub use driver::{DriverError, SessionDriver};
pub use transport::{ChatTransport, HttpTransport, TransportError, DEFAULT_SERVER_URL};
