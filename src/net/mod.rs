pub mod connection;
pub mod endpoint;
pub mod protocol;
pub mod socket;
pub mod subscribers;

pub use connection::{ConnectionManager, ConnectionState, Dialer, ReconnectPolicy, SocketSignal};
