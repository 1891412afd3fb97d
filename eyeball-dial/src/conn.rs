use eyeball_net::address::{NetAddr, ScopedIp};
use std::{
    io,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::{
    io::{AsyncRead, AsyncWrite, ReadBuf},
    net::{TcpStream, UdpSocket},
};

/// A connection established by the [`SystemConnector`](crate::SystemConnector).
///
/// Stream and datagram connections can be used through [`AsyncRead`]
/// and [`AsyncWrite`]; for datagram sockets every read receives a single
/// datagram and every write sends one. Raw IP sockets do not support
/// async I/O and are meant to be taken out with [`Conn::into_raw_ip`].
#[derive(Debug)]
#[non_exhaustive]
pub enum Conn {
    /// `tcp`, `tcp4`, `tcp6`
    Tcp(TcpStream),
    /// `udp`, `udp4`, `udp6`
    Udp(UdpSocket),
    /// `ip`, `ip4`, `ip6`, in non-blocking mode
    Ip(socket2::Socket),
    #[cfg(unix)]
    /// `unix`
    Unix(tokio::net::UnixStream),
    #[cfg(unix)]
    /// `unixgram`
    UnixDatagram(tokio::net::UnixDatagram),
}

fn stream_addr(addr: SocketAddr) -> NetAddr {
    NetAddr::from(addr)
}

fn datagram_addr(addr: SocketAddr) -> NetAddr {
    NetAddr::Datagram {
        ip: ScopedIp::new(addr.ip()),
        port: addr.port(),
    }
}

fn raw_ip_addr(addr: socket2::SockAddr) -> io::Result<NetAddr> {
    let addr = addr
        .as_socket()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "not an ip socket address"))?;
    Ok(NetAddr::RawIp {
        ip: ScopedIp::new(addr.ip()),
    })
}

#[cfg(unix)]
fn local_addr(addr: tokio::net::unix::SocketAddr) -> NetAddr {
    // unnamed sockets have no path
    NetAddr::local(addr.as_pathname().unwrap_or_else(|| std::path::Path::new("")))
}

impl Conn {
    /// The local address of the connection.
    pub fn local_addr(&self) -> io::Result<NetAddr> {
        match self {
            Self::Tcp(stream) => stream.local_addr().map(stream_addr),
            Self::Udp(socket) => socket.local_addr().map(datagram_addr),
            Self::Ip(socket) => raw_ip_addr(socket.local_addr()?),
            #[cfg(unix)]
            Self::Unix(stream) => stream.local_addr().map(local_addr),
            #[cfg(unix)]
            Self::UnixDatagram(socket) => socket.local_addr().map(local_addr),
        }
    }

    /// The address of the remote end of the connection.
    pub fn peer_addr(&self) -> io::Result<NetAddr> {
        match self {
            Self::Tcp(stream) => stream.peer_addr().map(stream_addr),
            Self::Udp(socket) => socket.peer_addr().map(datagram_addr),
            Self::Ip(socket) => raw_ip_addr(socket.peer_addr()?),
            #[cfg(unix)]
            Self::Unix(stream) => stream.peer_addr().map(local_addr),
            #[cfg(unix)]
            Self::UnixDatagram(socket) => socket.peer_addr().map(local_addr),
        }
    }

    /// A reference to the TCP stream, if this is a TCP connection.
    #[must_use]
    pub fn as_tcp(&self) -> Option<&TcpStream> {
        match self {
            Self::Tcp(stream) => Some(stream),
            _ => None,
        }
    }

    /// The TCP stream, if this is a TCP connection.
    pub fn into_tcp(self) -> Result<TcpStream, Self> {
        match self {
            Self::Tcp(stream) => Ok(stream),
            other => Err(other),
        }
    }

    /// The UDP socket, if this is a UDP connection.
    pub fn into_udp(self) -> Result<UdpSocket, Self> {
        match self {
            Self::Udp(socket) => Ok(socket),
            other => Err(other),
        }
    }

    /// The raw IP socket, if this is an IP connection.
    pub fn into_raw_ip(self) -> Result<socket2::Socket, Self> {
        match self {
            Self::Ip(socket) => Ok(socket),
            other => Err(other),
        }
    }
}

fn raw_ip_unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "async i/o is not supported on raw ip sockets",
    )
}

impl AsyncRead for Conn {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Udp(socket) => socket.poll_recv(cx, buf),
            Self::Ip(_) => Poll::Ready(Err(raw_ip_unsupported())),
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
            #[cfg(unix)]
            Self::UnixDatagram(socket) => socket.poll_recv(cx, buf),
        }
    }
}

impl AsyncWrite for Conn {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Udp(socket) => socket.poll_send(cx, buf),
            Self::Ip(_) => Poll::Ready(Err(raw_ip_unsupported())),
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_write(cx, buf),
            #[cfg(unix)]
            Self::UnixDatagram(socket) => socket.poll_send(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_flush(cx),
            _ => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            #[cfg(unix)]
            Self::Unix(stream) => Pin::new(stream).poll_shutdown(cx),
            _ => Poll::Ready(Ok(())),
        }
    }
}

impl From<TcpStream> for Conn {
    fn from(stream: TcpStream) -> Self {
        Self::Tcp(stream)
    }
}

impl From<UdpSocket> for Conn {
    fn from(socket: UdpSocket) -> Self {
        Self::Udp(socket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn test_into_variants() {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
        let conn = Conn::from(socket);
        assert!(conn.as_tcp().is_none());
        let addr = conn.local_addr().unwrap();
        assert_eq!(addr.ip(), Some(Ipv4Addr::LOCALHOST.into()));
        let conn = conn.into_tcp().unwrap_err();
        assert!(conn.into_udp().is_ok());
    }
}
