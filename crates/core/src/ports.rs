//! TCP port allocation for the process launchers.
//!
//! Ports are found by attempting to bind each candidate on the loopback
//! interface in ascending order. The probe socket is closed immediately, so
//! another process may still grab the port before the caller binds it.

use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
use std::ops::RangeInclusive;

/// Range scanned when no service-specific range applies.
pub const DEFAULT_PORT_RANGE: RangeInclusive<u16> = 8000..=9000;

/// Per-service ranges used when a multi-port scan of the default range fails.
pub const BACKEND_PORT_RANGE: RangeInclusive<u16> = 8000..=8100;
pub const UI_PORT_RANGE: RangeInclusive<u16> = 8501..=8600;
pub const ADMIN_PORT_RANGE: RangeInclusive<u16> = 8601..=8700;

const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("No free ports found in range {start}-{end}")]
    Exhausted { start: u16, end: u16 },

    #[error("Only found {found} free ports out of {requested} requested in range {start}-{end}")]
    Insufficient {
        found: usize,
        requested: usize,
        start: u16,
        end: u16,
    },
}

/// Returns `true` if `port` can currently be bound on `host`.
pub fn is_port_free(host: IpAddr, port: u16) -> bool {
    TcpListener::bind(SocketAddr::new(host, port)).is_ok()
}

/// First bindable loopback port in `range`.
pub fn find_free_port(range: RangeInclusive<u16>) -> Result<u16, PortError> {
    let (start, end) = (*range.start(), *range.end());
    range
        .into_iter()
        .find(|&port| is_port_free(LOOPBACK, port))
        .ok_or(PortError::Exhausted { start, end })
}

/// The first `count` bindable loopback ports in `range`, ascending.
pub fn find_free_ports(count: usize, range: RangeInclusive<u16>) -> Result<Vec<u16>, PortError> {
    let (start, end) = (*range.start(), *range.end());
    let ports: Vec<u16> = range
        .into_iter()
        .filter(|&port| is_port_free(LOOPBACK, port))
        .take(count)
        .collect();

    if ports.len() < count {
        return Err(PortError::Insufficient {
            found: ports.len(),
            requested: count,
            start,
            end,
        });
    }
    Ok(ports)
}

/// Resolve the port for a service from an environment variable.
///
/// A preset value is used when it parses and is free; otherwise the default
/// range is scanned. `env_var` is only consulted, never written.
pub fn resolve_port(env_var: &str) -> Result<u16, PortError> {
    match std::env::var(env_var).ok().map(|v| v.parse::<u16>()) {
        Some(Ok(port)) if is_port_free(LOOPBACK, port) => Ok(port),
        Some(Ok(port)) => {
            tracing::warn!(env_var, port, "Configured port is in use, scanning for another");
            find_free_port(DEFAULT_PORT_RANGE)
        }
        Some(Err(e)) => {
            tracing::warn!(env_var, error = %e, "Configured port is not a valid u16, scanning");
            find_free_port(DEFAULT_PORT_RANGE)
        }
        None => find_free_port(DEFAULT_PORT_RANGE),
    }
}
