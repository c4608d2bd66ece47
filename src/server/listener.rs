// Listener module
// Builds TCP listeners with SO_REUSEPORT/SO_REUSEADDR enabled.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Create a non-blocking `TcpListener` bound to `addr` with `SO_REUSEPORT`
/// and `SO_REUSEADDR` enabled, so the address can be rebound across process
/// restarts without waiting out TIME_WAIT.
pub fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;

    // Non-blocking mode is required before handing the socket to tokio
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;
    socket.listen(128)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
