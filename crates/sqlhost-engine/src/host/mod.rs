//! Host channel: the single-consumer completion queue drained by the host
//! thread, and the `Pending` handles async entry points return.

pub mod channel;
pub mod pending;

pub use channel::{host_channel, HostLoop, HostSender};
pub use pending::{Completer, Pending, WaitError};
