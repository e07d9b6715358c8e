use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::{config_error, Error};

const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
        }
    }
}

impl Config {
    /// Reads `QUOTE_SERVER_HOST` and `QUOTE_SERVER_PORT`, loading a `.env`
    /// file first when one is present.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_vars(
            env::var("QUOTE_SERVER_HOST").ok(),
            env::var("QUOTE_SERVER_PORT").ok(),
        )
    }

    fn from_vars(host: Option<String>, port: Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();

        if let Some(host) = host {
            let ip: IpAddr = host.trim().parse().map_err(config_error)?;
            config.addr.set_ip(ip);
        }

        if let Some(port) = port {
            let port: u16 = port.trim().parse().map_err(config_error)?;
            config.addr.set_port(port);
        }

        Ok(config)
    }
}

#[test]
fn defaults_to_localhost_3000() {
    let config = Config::from_vars(None, None).unwrap();

    assert_eq!(config.addr.to_string(), "127.0.0.1:3000");
}

#[test]
fn overrides_host_and_port() {
    let config = Config::from_vars(Some("0.0.0.0".into()), Some("8080".into())).unwrap();

    assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
}

#[test]
fn rejects_bad_port() {
    let err = Config::from_vars(None, Some("eighty".into())).unwrap_err();

    assert_eq!(err.code, 2);
}
