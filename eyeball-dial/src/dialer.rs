use crate::{
    ConnectOptions, Connector, SystemConnector,
    error::{DialError, DialErrorKind, ResolveError, TimeoutError},
    filter::{AddrFilter, BoxAddrFilter, DefaultFilter},
    resolve::ResolveContext,
};
use eyeball_dns::{DialEvent, Resolver, SystemResolver};
use eyeball_error::BoxError;
use eyeball_net::{
    IpStackCapability, Network,
    address::{AddrList, NetAddr, ServiceLookup, WellKnownServices},
};
use std::{fmt, sync::Arc, time::Duration};
use tokio::{
    sync::mpsc::{self, error::SendError},
    time::Instant,
};
use tracing::Instrument;

/// Connects to `(network, address)` pairs, racing the resolved addresses.
///
/// A dial resolves the address with its [`Resolver`], narrows the result
/// to the IP stacks the platform supports, picks the addresses to try with
/// its [`AddrFilter`] and connects using its [`Connector`].
///
/// When more than one address is left on a TCP network, all of them are
/// dialed at once: the first connection established is returned and every
/// other connection is closed as soon as it is established. If all
/// attempts fail, the error of the last one to finish is returned.
/// Other networks only dial the first address.
///
/// Known networks are `tcp`, `tcp4`, `tcp6`, `udp`, `udp4`, `udp6`,
/// `ip`, `ip4`, `ip6` (optionally followed by `:protocol`), `unix`,
/// `unixgram` and `unixpacket`.
///
/// # Example
///
/// ```no_run
/// use eyeball_dial::{Dialer, filter::DualStackFilter};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), eyeball_dial::DialError> {
/// let dialer = Dialer::new()
///     .with_filter(DualStackFilter)
///     .with_timeout(Duration::from_secs(5));
/// let conn = dialer.dial("tcp", "example.com:https").await?;
/// # drop(conn);
/// # Ok(())
/// # }
/// ```
pub struct Dialer<R = SystemResolver, C = SystemConnector> {
    resolver: Arc<R>,
    connector: C,
    filter: BoxAddrFilter,
    capability: IpStackCapability,
    services: Arc<dyn ServiceLookup>,
    timeout: Option<Duration>,
    deadline: Option<Instant>,
    local_addr: Option<NetAddr>,
    keep_alive: Option<Duration>,
}

impl Dialer {
    /// Create a new [`Dialer`] using the system resolver and sockets,
    /// the [`DefaultFilter`] and the IP stacks detected on this host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: Arc::new(SystemResolver::new()),
            connector: SystemConnector::new(),
            filter: DefaultFilter.boxed(),
            capability: IpStackCapability::system(),
            services: Arc::new(WellKnownServices::new()),
            timeout: None,
            deadline: None,
            local_addr: None,
            keep_alive: None,
        }
    }
}

impl Default for Dialer {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, C: Clone> Clone for Dialer<R, C> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            connector: self.connector.clone(),
            filter: self.filter.clone(),
            capability: self.capability,
            services: self.services.clone(),
            timeout: self.timeout,
            deadline: self.deadline,
            local_addr: self.local_addr.clone(),
            keep_alive: self.keep_alive,
        }
    }
}

impl<R: fmt::Debug, C: fmt::Debug> fmt::Debug for Dialer<R, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialer")
            .field("resolver", &self.resolver)
            .field("connector", &self.connector)
            .field("capability", &self.capability)
            .field("timeout", &self.timeout)
            .field("deadline", &self.deadline)
            .field("local_addr", &self.local_addr)
            .field("keep_alive", &self.keep_alive)
            .finish_non_exhaustive()
    }
}

impl<R, C> Dialer<R, C> {
    /// Use `resolver` to resolve host names.
    pub fn with_resolver<T: Resolver>(self, resolver: T) -> Dialer<T, C> {
        Dialer {
            resolver: Arc::new(resolver),
            connector: self.connector,
            filter: self.filter,
            capability: self.capability,
            services: self.services,
            timeout: self.timeout,
            deadline: self.deadline,
            local_addr: self.local_addr,
            keep_alive: self.keep_alive,
        }
    }

    /// Use `connector` to establish connections.
    pub fn with_connector<T: Connector>(self, connector: T) -> Dialer<R, T> {
        Dialer {
            resolver: self.resolver,
            connector,
            filter: self.filter,
            capability: self.capability,
            services: self.services,
            timeout: self.timeout,
            deadline: self.deadline,
            local_addr: self.local_addr,
            keep_alive: self.keep_alive,
        }
    }

    /// Select the addresses to dial with `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: impl AddrFilter) -> Self {
        self.filter = filter.boxed();
        self
    }

    /// Narrow resolved addresses to the given IP stacks
    /// instead of the ones detected on this host.
    #[must_use]
    pub fn with_capability(mut self, capability: IpStackCapability) -> Self {
        self.capability = capability;
        self
    }

    /// Look up named ports such as `http` with `services`.
    #[must_use]
    pub fn with_services(mut self, services: impl ServiceLookup) -> Self {
        self.services = Arc::new(services);
        self
    }

    /// Give up on a dial, resolution included, once `timeout` has passed.
    ///
    /// A zero timeout means no timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Give up on any dial once `deadline` has passed.
    ///
    /// When a timeout is set as well, the earliest of both applies.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Bind connections to `addr` before connecting.
    #[must_use]
    pub fn with_local_addr(mut self, addr: NetAddr) -> Self {
        self.local_addr = Some(addr);
        self
    }

    /// Enable keep-alive with the given period on stream connections.
    #[must_use]
    pub fn with_keep_alive(mut self, period: Duration) -> Self {
        self.keep_alive = Some(period);
        self
    }

    /// The resolver used by this dialer.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// The connector used by this dialer.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// The IP stacks addresses are narrowed to.
    pub fn capability(&self) -> IpStackCapability {
        self.capability
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The configured deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The local address connections are bound to, if any.
    pub fn local_addr(&self) -> Option<&NetAddr> {
        self.local_addr.as_ref()
    }

    /// The keep-alive period, if any.
    pub fn keep_alive(&self) -> Option<Duration> {
        self.keep_alive
    }

    /// The deadline of a dial starting now: the earliest of
    /// now + timeout and the configured deadline.
    fn effective_deadline(&self) -> Option<Instant> {
        let timeout = self
            .timeout
            .filter(|timeout| !timeout.is_zero())
            .and_then(|timeout| Instant::now().checked_add(timeout));
        match (timeout, self.deadline) {
            (Some(timeout), Some(deadline)) => Some(timeout.min(deadline)),
            (timeout, deadline) => timeout.or(deadline),
        }
    }
}

impl<R: Resolver, C: Connector> Dialer<R, C> {
    fn resolve_context(&self, deadline: Option<Instant>) -> ResolveContext<'_, R> {
        ResolveContext {
            resolver: &self.resolver,
            capability: self.capability,
            services: &*self.services,
            deadline,
        }
    }

    /// Resolve `address` on `network` the way [`Dialer::dial`] does,
    /// without filtering or connecting.
    ///
    /// Resolution is bounded by the timeout and deadline of the dialer.
    pub async fn resolve(&self, network: &str, address: &str) -> Result<AddrList, DialError> {
        let parsed: Network = network
            .parse()
            .map_err(|err| DialError::new(DialErrorKind::MalformedInput, network, None, err))?;
        self.resolve_context(self.effective_deadline())
            .resolve(&parsed, address)
            .await
            .map_err(|err| DialError::from_resolve(network, err))
    }

    /// Connect to `address` on the named `network`.
    ///
    /// For TCP and UDP networks the address has the form `host:port`,
    /// where an IPv6 host is enclosed in brackets (`[::1]:80`, `[fe80::1%eth0]:80`)
    /// and the port may be a service name (`example.com:https`).
    /// IP networks take a bare host, unix networks a file system path.
    pub async fn dial(&self, network: &str, address: &str) -> Result<C::Conn, DialError> {
        let deadline = self.effective_deadline();
        if deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(DialError::new(
                DialErrorKind::Timeout,
                network,
                None,
                TimeoutError::new(),
            ));
        }

        let parsed: Network = network
            .parse()
            .map_err(|err| DialError::new(DialErrorKind::MalformedInput, network, None, err))?;
        let addrs = self
            .resolve_context(deadline)
            .resolve(&parsed, address)
            .await
            .map_err(|err| DialError::from_resolve(network, err))?;

        let addrs = self.filter.filter_addrs(&addrs);
        tracing::trace!(network = %parsed, %addrs, "addresses selected to dial");

        let opts = ConnectOptions {
            deadline,
            local_addr: self.local_addr.clone(),
            keep_alive: self.keep_alive,
        };

        if addrs.len() > 1 && parsed.is_stream() {
            return self.dial_race(network, parsed, addrs, opts).await;
        }

        let Some(addr) = addrs.into_iter().next() else {
            return Err(DialError::from_resolve(
                network,
                ResolveError::no_suitable_address(),
            ));
        };
        let (addr, result) = attempt(
            self.resolver.clone(),
            self.connector.clone(),
            parsed,
            addr,
            opts,
        )
        .await;
        result.map_err(|err| DialError::from_connect(network, addr.to_string(), err))
    }

    /// Dial all `addrs` at once, returning the first connection established.
    async fn dial_race(
        &self,
        network: &str,
        parsed: Network,
        addrs: AddrList,
        opts: ConnectOptions,
    ) -> Result<C::Conn, DialError> {
        let (tx, mut rx) = mpsc::channel(addrs.len());

        for (index, addr) in addrs.into_iter().enumerate() {
            let span = tracing::trace_span!(
                "dial::attempt",
                network.protocol.name = %parsed,
                network.peer.address = %addr,
                index,
            );
            let attempt = attempt(
                self.resolver.clone(),
                self.connector.clone(),
                parsed.clone(),
                addr,
                opts.clone(),
            );
            let tx = tx.clone();
            tokio::spawn(
                async move {
                    // once the race is decided the receiver is gone,
                    // a late connection is closed by dropping it
                    if let Err(SendError((addr, Ok(conn)))) = tx.send(attempt.await).await {
                        tracing::trace!(%addr, "race already decided: close connection");
                        drop(conn);
                    }
                }
                .instrument(span),
            );
        }
        drop(tx);

        let mut last_err = None;
        while let Some((addr, result)) = rx.recv().await {
            match result {
                Ok(conn) => {
                    tracing::trace!(%addr, "connection won the race");
                    return Ok(conn);
                }
                Err(err) => last_err = Some((addr, err)),
            }
        }

        Err(match last_err {
            Some((addr, err)) => DialError::from_connect(network, addr.to_string(), err),
            None => DialError::new(DialErrorKind::Timeout, network, None, TimeoutError::new()),
        })
    }
}

/// A single connection attempt, bounded by the deadline of `opts`.
///
/// Reports the outcome to [`Resolver::on_dial`].
async fn attempt<R: Resolver, C: Connector>(
    resolver: Arc<R>,
    connector: C,
    network: Network,
    addr: NetAddr,
    opts: ConnectOptions,
) -> (NetAddr, Result<C::Conn, BoxError>) {
    let start = Instant::now();
    let deadline = opts.deadline;
    let connect = connector.connect(network.clone(), addr.clone(), opts);
    let result: Result<C::Conn, BoxError> = match deadline {
        Some(deadline) => match tokio::time::timeout_at(deadline, connect).await {
            Ok(result) => result.map_err(Into::into),
            Err(_) => Err(TimeoutError::new().into()),
        },
        None => connect.await.map_err(Into::into),
    };

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => tracing::trace!(%addr, ?elapsed, "connection established"),
        Err(err) => tracing::trace!(%addr, ?elapsed, "connection attempt failed: {err}"),
    }
    let error = result.as_ref().err().map(|err| &**err);
    resolver.on_dial(&DialEvent::new(&network, &addr, elapsed, error));

    (addr, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NoSuitableAddressError;
    use crate::filter::NoFilter;
    use eyeball_dns::{Domain, StaticResolver};
    use eyeball_net::address::ScopedIp;
    use parking_lot::Mutex;
    use std::{
        io,
        net::{IpAddr, Ipv4Addr, Ipv6Addr},
        sync::atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug)]
    struct MockConn {
        addr: NetAddr,
        closed: Arc<AtomicUsize>,
    }

    impl Drop for MockConn {
        fn drop(&mut self) {
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// How the mock connector treats an address: delay and outcome.
    type Plan = Vec<(IpAddr, Duration, bool)>;

    #[derive(Debug, Clone, Default)]
    struct Counters {
        attempts: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
    }

    impl Counters {
        fn attempts(&self) -> usize {
            self.attempts.load(Ordering::SeqCst)
        }

        fn closed(&self) -> usize {
            self.closed.load(Ordering::SeqCst)
        }
    }

    fn mock_connector(
        plan: Plan,
        counters: Counters,
    ) -> impl Connector<Conn = MockConn, Error = io::Error> {
        let plan = Arc::new(plan);
        move |_network: Network, addr: NetAddr, _opts: ConnectOptions| {
            let plan = plan.clone();
            let counters = counters.clone();
            async move {
                counters.attempts.fetch_add(1, Ordering::SeqCst);
                let Some((_, delay, ok)) = plan.iter().find(|(ip, ..)| Some(*ip) == addr.ip())
                else {
                    return Err(io::Error::from(io::ErrorKind::AddrNotAvailable));
                };
                tokio::time::sleep(*delay).await;
                if *ok {
                    Ok(MockConn {
                        addr,
                        closed: counters.closed.clone(),
                    })
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::ConnectionRefused,
                        format!("refused by {addr}"),
                    ))
                }
            }
        }
    }

    fn v4(n: u8) -> IpAddr {
        Ipv4Addr::new(10, 0, 0, n).into()
    }

    fn v6(n: u16) -> IpAddr {
        Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, n).into()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn race_dialer(
        plan: Plan,
        counters: Counters,
    ) -> Dialer<StaticResolver, impl Connector<Conn = MockConn, Error = io::Error>> {
        let ips: Vec<_> = plan.iter().map(|(ip, ..)| *ip).collect();
        Dialer::new()
            .with_resolver(StaticResolver::new().with_host(Domain::from_static("race.test"), ips))
            .with_connector(mock_connector(plan, counters))
            .with_capability(IpStackCapability::dual_stack())
            .with_filter(NoFilter)
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_single_connectable() {
        let counters = Counters::default();
        let dialer = race_dialer(
            vec![
                (v4(1), ms(10), false),
                (v4(2), ms(50), true),
                (v6(1), ms(20), false),
            ],
            counters.clone(),
        );

        let conn = dialer.dial("tcp", "race.test:80").await.unwrap();
        assert_eq!(conn.addr.ip(), Some(v4(2)));
        assert_eq!(counters.attempts(), 3);
        assert_eq!(counters.closed(), 0);

        drop(conn);
        assert_eq!(counters.closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    #[tracing_test::traced_test]
    async fn test_race_closes_losers() {
        let counters = Counters::default();
        let dialer = race_dialer(
            vec![
                (v4(1), ms(30), true),
                (v6(1), ms(10), true),
                (v4(2), ms(20), true),
                (v6(2), ms(5), false),
            ],
            counters.clone(),
        );

        let conn = dialer.dial("tcp", "race.test:80").await.unwrap();
        assert_eq!(conn.addr.ip(), Some(v6(1)));

        // let the other attempts finish
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counters.attempts(), 4);
        assert_eq!(counters.closed(), 2);
        assert!(logs_contain("race already decided: close connection"));

        drop(conn);
        assert_eq!(counters.closed(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_returns_last_error() {
        let counters = Counters::default();
        let dialer = race_dialer(
            vec![
                (v4(1), ms(30), false),
                (v6(1), ms(10), false),
                (v4(2), ms(20), false),
            ],
            counters.clone(),
        );

        let err = dialer.dial("tcp", "race.test:80").await.unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::Connect);
        assert_eq!(err.addr(), Some("10.0.0.1:80"));
        assert_eq!(err.network(), "tcp");
        assert_eq!(err.to_string(), "dial tcp 10.0.0.1:80: refused by 10.0.0.1:80");
        assert!(!err.is_temporary());
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_deadline() {
        let counters = Counters::default();
        let dialer = race_dialer(
            vec![(v4(1), ms(5_000), true), (v6(1), ms(8_000), true)],
            counters.clone(),
        )
        .with_timeout(Duration::from_secs(1));

        let start = Instant::now();
        let err = dialer.dial("tcp", "race.test:80").await.unwrap_err();
        assert!(err.is_timeout(), "{err}");
        assert!(err.is_temporary());
        assert!(start.elapsed() < Duration::from_secs(2));

        // timed out attempts never hand out a connection
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counters.closed(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_never_connects() {
        let counters = Counters::default();
        let dialer = race_dialer(vec![(v4(1), ms(1), true)], counters.clone())
            .with_deadline(Instant::now());
        tokio::time::advance(ms(1)).await;

        let err = dialer.dial("tcp", "10.0.0.1:80").await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "dial tcp: i/o timeout");
        assert_eq!(counters.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_earliest_of_timeout_and_deadline() {
        let dialer = Dialer::new()
            .with_timeout(Duration::from_secs(10))
            .with_deadline(Instant::now() + Duration::from_secs(3));
        assert_eq!(
            dialer.effective_deadline(),
            Some(Instant::now() + Duration::from_secs(3))
        );

        let dialer = dialer.with_timeout(Duration::from_secs(1));
        assert_eq!(
            dialer.effective_deadline(),
            Some(Instant::now() + Duration::from_secs(1))
        );

        assert_eq!(Dialer::new().effective_deadline(), None);
        assert_eq!(
            Dialer::new()
                .with_timeout(Duration::ZERO)
                .effective_deadline(),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_filter_dials_single_address() {
        let counters = Counters::default();
        let dialer = race_dialer(
            vec![(v6(1), ms(1), true), (v4(1), ms(1), true)],
            counters.clone(),
        )
        .with_filter(DefaultFilter);

        let conn = dialer.dial("tcp", "race.test:80").await.unwrap();
        assert_eq!(conn.addr.ip(), Some(v4(1)));
        assert_eq!(counters.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_datagram_networks_are_not_raced() {
        let counters = Counters::default();
        let dialer = race_dialer(
            vec![(v6(1), ms(10), false), (v4(1), ms(1), true)],
            counters.clone(),
        );

        let err = dialer.dial("udp", "race.test:53").await.unwrap_err();
        assert_eq!(err.addr(), Some("[2001:db8::1]:53"));
        assert_eq!(counters.attempts(), 1);
    }

    #[tokio::test]
    async fn test_dial_errors_before_connecting() {
        let counters = Counters::default();
        let dialer = race_dialer(vec![(v6(1), ms(1), true)], counters.clone())
            .with_capability(IpStackCapability::new(true, false));

        let err = dialer.dial("sctp", "race.test:80").await.unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::MalformedInput);
        assert_eq!(err.to_string(), "dial sctp: unknown network sctp");

        let err = dialer.dial("tcp", "race.test:80").await.unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::NoSuitableAddress);
        assert!(eyeball_error::has::<NoSuitableAddressError>(&err));

        let err = dialer.dial("tcp", "unknown.test:80").await.unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::Resolution);
        assert!(err.addr().is_none());

        let err = dialer.dial("tcp", "").await.unwrap_err();
        assert_eq!(err.to_string(), "dial tcp: missing address");

        let err = dialer
            .with_filter(|_: &[Option<IpAddr>]| -> Vec<usize> { Vec::new() })
            .dial("tcp", "10.0.0.1:80")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), DialErrorKind::NoSuitableAddress);

        assert_eq!(counters.attempts(), 0);
    }

    #[derive(Debug, Default)]
    struct RecordingResolver {
        inner: StaticResolver,
        events: Mutex<Vec<(String, bool)>>,
    }

    impl Resolver for RecordingResolver {
        type Error = <StaticResolver as Resolver>::Error;

        fn resolve(
            &self,
            host: Domain,
        ) -> impl Future<Output = Result<Vec<IpAddr>, Self::Error>> + Send + '_ {
            self.inner.resolve(host)
        }

        fn on_dial(&self, event: &DialEvent<'_>) {
            assert_eq!(event.network().to_string(), "tcp6");
            self.events
                .lock()
                .push((event.addr().to_string(), event.error().is_none()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_dial_sees_every_attempt() {
        let counters = Counters::default();
        let plan = vec![(v6(1), ms(20), true), (v6(2), ms(10), false), (v6(3), ms(30), true)];
        let resolver = Arc::new(RecordingResolver {
            inner: StaticResolver::new()
                .with_host(Domain::from_static("race.test"), [v6(1), v6(2), v6(3)]),
            ..Default::default()
        });
        let dialer = Dialer::new()
            .with_resolver(resolver.clone())
            .with_connector(mock_connector(plan, counters.clone()))
            .with_capability(IpStackCapability::dual_stack())
            .with_filter(NoFilter);

        let conn = dialer.dial("tcp6", "race.test:443").await.unwrap();
        assert_eq!(conn.addr.ip(), Some(v6(1)));
        tokio::time::sleep(Duration::from_secs(1)).await;

        let mut events = resolver.events.lock().clone();
        events.sort();
        assert_eq!(
            events,
            vec![
                ("[2001:db8::1]:443".to_owned(), true),
                ("[2001:db8::2]:443".to_owned(), false),
                ("[2001:db8::3]:443".to_owned(), true),
            ]
        );
        assert_eq!(counters.closed(), 1);
    }

    #[tokio::test]
    async fn test_resolve_uses_dialer_settings() {
        let dialer = race_dialer(vec![(v4(1), ms(1), true), (v6(1), ms(1), true)], Counters::default());
        let addrs = dialer.resolve("tcp4", "race.test:https").await.unwrap();
        assert_eq!(addrs.len(), 1);
        assert_eq!(
            addrs.addr(0),
            Some(&NetAddr::Stream {
                ip: ScopedIp::new(v4(1)),
                port: 443
            })
        );
        // filters are not applied when only resolving
        let addrs = dialer.resolve("tcp", "race.test:https").await.unwrap();
        assert_eq!(addrs.len(), 2);
    }
}
