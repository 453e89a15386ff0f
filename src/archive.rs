//! Open PGN archives.
//!
//! Monthly archives of a player's games are fetched from the public
//! chess.com API. Local files can be scanned as well.

use std::{fmt, fs::File, path::Path};

use tracing::info;

use crate::errors::{Error, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Month of a game archive.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Period {
    year: u16,
    month: u8,
}

impl Period {
    /// First year of archived games.
    pub const MIN_YEAR: u16 = 2000;

    pub fn new(year: u16, month: u8) -> Result<Period> {
        if year < Period::MIN_YEAR {
            return Err(Error::Parameter {
                name: "year",
                reason: format!("{year} is before {}", Period::MIN_YEAR),
            });
        }
        if !(1..=12).contains(&month) {
            return Err(Error::Parameter {
                name: "month",
                reason: format!("{month} is not between 1 and 12"),
            });
        }
        Ok(Period { year, month })
    }

    /// Parses a period from decimal year and month, like `b"2023"` and
    /// `b"3"` or `b"03"`.
    pub fn from_ascii(year: &[u8], month: &[u8]) -> Result<Period> {
        let year = btoi::btou(year).map_err(|_| Error::Parameter {
            name: "year",
            reason: format!("{:?} is not a number", String::from_utf8_lossy(year)),
        })?;
        let month = btoi::btou(month).map_err(|_| Error::Parameter {
            name: "month",
            reason: format!("{:?} is not a number", String::from_utf8_lossy(month)),
        })?;
        Period::new(year, month)
    }

    pub fn year(self) -> u16 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

/// URL of the PGN archive of `player` for the given month.
pub fn archive_url(player: &str, period: Period) -> String {
    format!("https://api.chess.com/pub/player/{player}/games/{period}/pgn")
}

/// Fetches the monthly archive of `player`. The body is streamed while
/// it is scanned.
pub fn fetch(player: &str, period: Period) -> Result<reqwest::blocking::Response> {
    fetch_url(&archive_url(player, period))
}

/// Fetches a PGN archive from `url`. Connection failures and responses
/// other than success are [`Error::SourceUnavailable`].
pub fn fetch_url(url: &str) -> Result<reqwest::blocking::Response> {
    info!(%url, "fetching archive");

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(Error::source_unavailable)?;

    client
        .get(url)
        .send()
        .and_then(|res| res.error_for_status())
        .map_err(Error::source_unavailable)
}

/// Opens a PGN file.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    info!(path = %path.display(), "opening archive");
    File::open(path).map_err(Error::source_unavailable)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    use super::*;

    /// Answers a single request with `response` and returns the request.
    fn serve_once(response: &'static [u8]) -> (String, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut request = Vec::new();
            let mut buf = [0; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf).expect("read request") {
                    0 => break,
                    n => request.extend_from_slice(&buf[..n]),
                }
            }
            stream.write_all(response).expect("write response");
            request
        });
        (format!("http://{addr}"), server)
    }

    #[test]
    fn test_period() {
        let period = Period::from_ascii(b"2023", b"3").expect("valid period");
        assert_eq!(period.year(), 2023);
        assert_eq!(period.month(), 3);
        assert_eq!(period.to_string(), "2023/03");
        assert_eq!(
            Period::from_ascii(b"2023", b"03").expect("valid period"),
            period
        );
    }

    #[test]
    fn test_invalid_period() {
        for (year, month) in [
            ("twenty", "3"),
            ("2023", "march"),
            ("2023", ""),
            ("-2023", "3"),
            ("1999", "3"),
            ("2023", "0"),
            ("2023", "13"),
            ("2023", "300"),
        ] {
            assert!(
                matches!(
                    Period::from_ascii(year.as_bytes(), month.as_bytes()),
                    Err(Error::Parameter { .. })
                ),
                "{year} {month}"
            );
        }
    }

    #[test]
    fn test_archive_url() {
        let period = Period::new(2023, 3).expect("valid period");
        assert_eq!(
            archive_url("gothamchess", period),
            "https://api.chess.com/pub/player/gothamchess/games/2023/03/pgn"
        );
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            open_file("tests/data/does-not-exist.pgn"),
            Err(Error::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_fetch() {
        let (base, server) = serve_once(
            b"HTTP/1.1 200 OK\r\ncontent-length: 10\r\nconnection: close\r\n\r\n1. e4 e5 *",
        );
        let mut body = String::new();
        fetch_url(&format!("{base}/pub/player/someone/games/2023/03/pgn"))
            .expect("archive available")
            .read_to_string(&mut body)
            .expect("body");
        assert_eq!(body, "1. e4 e5 *");

        let request = server.join().expect("server");
        let request_line = b"GET /pub/player/someone/games/2023/03/pgn HTTP/1.1\r\n";
        assert!(request.starts_with(request_line));
    }

    #[test]
    fn test_fetch_not_found() {
        let (base, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        );
        assert!(matches!(
            fetch_url(&format!("{base}/pub/player/nobody/games/2023/03/pgn")),
            Err(Error::SourceUnavailable { .. })
        ));
        server.join().expect("server");
    }

    #[test]
    fn test_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        assert!(matches!(
            fetch_url(&format!("http://{addr}/pub/player/nobody/games/2023/03/pgn")),
            Err(Error::SourceUnavailable { .. })
        ));
    }
}
