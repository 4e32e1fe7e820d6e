//! Management sessions over SSH.
//!
//! Commands normally run on their own exec channel of one authenticated
//! connection. When a platform needs privileged mode and an enable secret is
//! stored, the session instead drives one interactive shell raised with the
//! platform's enable command.

mod connector;
mod session;
mod shell;

pub use connector::SshConnector;
pub use session::SshSession;
