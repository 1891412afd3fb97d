use crate::Conn;
use eyeball_error::{BoxError, ErrorContext, static_str_error};
use eyeball_net::{
    Network,
    address::{AddrKind, AddrKindMismatch, NetAddr},
};
use std::{
    fmt,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::{
    net::{TcpSocket, TcpStream, UdpSocket},
    time::Instant,
};

/// Options applied to a single connection attempt.
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Point in time after which the attempt fails.
    ///
    /// The dialer already bounds each attempt by it,
    /// connectors may use it to configure their sockets.
    pub deadline: Option<Instant>,
    /// Local address to bind to before connecting.
    pub local_addr: Option<NetAddr>,
    /// Keep-alive period of stream connections, disabled if `None` or zero.
    pub keep_alive: Option<Duration>,
}

/// Establishes a connection to a single, already resolved address.
///
/// This is the primitive raced by a [`Dialer`](crate::Dialer).
/// Any `Fn(Network, NetAddr, ConnectOptions) -> Future` closure
/// is a connector as well.
pub trait Connector: Clone + Send + Sync + 'static {
    /// The established connection.
    type Conn: Send + 'static;
    /// Error returned when the connection could not be established.
    type Error: Into<BoxError> + Send + 'static;

    /// Connect to `addr` on `network`.
    fn connect(
        &self,
        network: Network,
        addr: NetAddr,
        opts: ConnectOptions,
    ) -> impl Future<Output = Result<Self::Conn, Self::Error>> + Send + '_;
}

impl<C: Connector> Connector for Arc<C> {
    type Conn = C::Conn;
    type Error = C::Error;

    fn connect(
        &self,
        network: Network,
        addr: NetAddr,
        opts: ConnectOptions,
    ) -> impl Future<Output = Result<Self::Conn, Self::Error>> + Send + '_ {
        (**self).connect(network, addr, opts)
    }
}

impl<F, Fut, T, E> Connector for F
where
    F: Fn(Network, NetAddr, ConnectOptions) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    type Conn = T;
    type Error = E;

    fn connect(
        &self,
        network: Network,
        addr: NetAddr,
        opts: ConnectOptions,
    ) -> impl Future<Output = Result<Self::Conn, Self::Error>> + Send + '_ {
        (self)(network, addr, opts)
    }
}

#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
/// A [`Connector`] using the sockets of the operating system.
///
/// - `tcp*`: a [`TcpStream`], optionally bound and with keep-alive enabled;
/// - `udp*`: a connected [`UdpSocket`];
/// - `ip*:<protocol>`: a connected raw [`socket2::Socket`], usually requiring privileges;
/// - `unix` and `unixgram` (unix only): a `UnixStream` or connected `UnixDatagram`.
///
/// `unixpacket` is not supported.
pub struct SystemConnector;

impl SystemConnector {
    /// Create a new [`SystemConnector`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Connector for SystemConnector {
    type Conn = Conn;
    type Error = BoxError;

    async fn connect(
        &self,
        network: Network,
        addr: NetAddr,
        opts: ConnectOptions,
    ) -> Result<Self::Conn, Self::Error> {
        match &network {
            Network::Tcp(_) => connect_tcp(&addr, &opts).await.map(Conn::Tcp),
            Network::Udp(_) => connect_udp(&addr, &opts).await.map(Conn::Udp),
            Network::Ip { .. } => connect_ip(&network, &addr, &opts).map(Conn::Ip),
            #[cfg(unix)]
            Network::Unix(eyeball_net::UnixType::Stream) => {
                let path = addr
                    .path()
                    .ok_or(AddrKindMismatch::new(AddrKind::Local, addr.kind()))?;
                let stream = tokio::net::UnixStream::connect(path)
                    .await
                    .with_context(|| format!("connect to unix socket {}", path.display()))?;
                Ok(Conn::Unix(stream))
            }
            #[cfg(unix)]
            Network::Unix(eyeball_net::UnixType::Datagram) => {
                connect_unixgram(&addr, &opts).map(Conn::UnixDatagram)
            }
            Network::Unix(_) => Err(UnsupportedNetworkError(network.clone()).into()),
        }
    }
}

/// Error returned by the [`SystemConnector`] for networks it cannot connect on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedNetworkError(Network);

impl UnsupportedNetworkError {
    /// The network that is not supported.
    #[must_use]
    pub fn network(&self) -> &Network {
        &self.0
    }
}

impl fmt::Display for UnsupportedNetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported network {}", self.0)
    }
}

impl std::error::Error for UnsupportedNetworkError {}

static_str_error! {
    #[doc = "missing ip protocol"]
    pub struct MissingProtocolError;
}

fn remote_socket_addr(addr: &NetAddr) -> Result<SocketAddr, AddrKindMismatch> {
    addr.to_socket_addr()
        .ok_or(AddrKindMismatch::new(AddrKind::Stream, addr.kind()))
}

fn local_socket_addr(opts: &ConnectOptions) -> Result<Option<SocketAddr>, AddrKindMismatch> {
    opts.local_addr
        .as_ref()
        .map(|addr| {
            addr.to_socket_addr()
                .ok_or(AddrKindMismatch::new(AddrKind::Stream, addr.kind()))
        })
        .transpose()
}

fn keep_alive(opts: &ConnectOptions) -> Option<Duration> {
    opts.keep_alive.filter(|period| !period.is_zero())
}

/// Idle time before the first probe and time between probes are both `period`.
fn tcp_keepalive(period: Duration) -> socket2::TcpKeepalive {
    let keepalive = socket2::TcpKeepalive::new().with_time(period);
    #[cfg(any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "fuchsia",
        target_os = "illumos",
        target_os = "ios",
        target_os = "linux",
        target_os = "macos",
        target_os = "netbsd",
        target_os = "tvos",
        target_os = "watchos",
        target_os = "windows",
    ))]
    let keepalive = keepalive.with_interval(period);
    keepalive
}

async fn connect_tcp(addr: &NetAddr, opts: &ConnectOptions) -> Result<TcpStream, BoxError> {
    let remote = remote_socket_addr(addr)?;
    let socket = if remote.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .context("create tcp socket")?;

    if let Some(local) = local_socket_addr(opts)? {
        socket
            .bind(local)
            .with_context(|| format!("bind tcp socket to {local}"))?;
    }

    let stream = socket.connect(remote).await?;

    if let Some(period) = keep_alive(opts) {
        socket2::SockRef::from(&stream)
            .set_tcp_keepalive(&tcp_keepalive(period))
            .context("set tcp keep-alive")?;
    }
    Ok(stream)
}

async fn connect_udp(addr: &NetAddr, opts: &ConnectOptions) -> Result<UdpSocket, BoxError> {
    let remote = remote_socket_addr(addr)?;
    let local = match local_socket_addr(opts)? {
        Some(local) => local,
        None if remote.is_ipv4() => (Ipv4Addr::UNSPECIFIED, 0).into(),
        None => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(local)
        .await
        .with_context(|| format!("bind udp socket to {local}"))?;
    socket.connect(remote).await?;
    Ok(socket)
}

fn connect_ip(
    network: &Network,
    addr: &NetAddr,
    opts: &ConnectOptions,
) -> Result<socket2::Socket, BoxError> {
    let remote = remote_socket_addr(addr)?;
    let protocol = network.protocol_number()?.ok_or(MissingProtocolError)?;
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(remote),
        socket2::Type::RAW,
        Some(socket2::Protocol::from(i32::from(protocol))),
    )
    .context("create raw ip socket")?;

    if let Some(local) = local_socket_addr(opts)? {
        socket
            .bind(&local.into())
            .with_context(|| format!("bind raw ip socket to {local}"))?;
    }
    // connecting a raw socket only sets its peer, it does not block
    socket.connect(&remote.into())?;
    socket.set_nonblocking(true)?;
    Ok(socket)
}

#[cfg(unix)]
fn connect_unixgram(
    addr: &NetAddr,
    opts: &ConnectOptions,
) -> Result<tokio::net::UnixDatagram, BoxError> {
    let path = addr
        .path()
        .ok_or(AddrKindMismatch::new(AddrKind::Local, addr.kind()))?;
    let socket = match &opts.local_addr {
        Some(local) => {
            let local = local
                .path()
                .ok_or(AddrKindMismatch::new(AddrKind::Local, local.kind()))?;
            tokio::net::UnixDatagram::bind(local)
                .with_context(|| format!("bind unix datagram socket to {}", local.display()))?
        }
        None => tokio::net::UnixDatagram::unbound().context("create unix datagram socket")?,
    };
    socket
        .connect(path)
        .with_context(|| format!("connect to unix socket {}", path.display()))?;
    Ok(socket)
}

static_str_error! {
    #[doc = "connect denied"]
    pub struct ConnectDeniedError;
}

#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
/// A [`Connector`] which denies every connection attempt,
/// useful to make sure code paths do not touch the network.
pub struct DenyConnector;

impl DenyConnector {
    /// Create a new [`DenyConnector`].
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Connector for DenyConnector {
    type Conn = Conn;
    type Error = ConnectDeniedError;

    fn connect(
        &self,
        _network: Network,
        _addr: NetAddr,
        _opts: ConnectOptions,
    ) -> impl Future<Output = Result<Self::Conn, Self::Error>> + Send + '_ {
        std::future::ready(Err(ConnectDeniedError))
    }
}
