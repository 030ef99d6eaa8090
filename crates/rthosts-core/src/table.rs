//! Host override table
//!
//! An ordered mapping from normalized hostname to an override entry
//! (address + family). Tables are built by parsing hosts-format documents,
//! combined with a right-biased merge, and swapped into the active
//! resolution state wholesale, never edited in place.
//!
//! ## Hosts format
//!
//! One record per line: `<address> [alias...] <hostname>`. Blank lines and
//! lines whose first non-whitespace character is `#` are ignored. The first
//! token is the address candidate, the last token the hostname candidate.
//! Lines that fail validation are skipped silently; a document that yields
//! zero entries is not an error at this layer.

use std::collections::BTreeMap;
use std::net::IpAddr;

/// Address family of an override entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Derive the family from an address
    pub fn of(ip: IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }
}

/// A single hostname override
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideEntry {
    /// The address to resolve to
    pub ip: IpAddr,
    /// Address family, always consistent with `ip`
    pub family: AddressFamily,
}

impl OverrideEntry {
    /// Create an entry, deriving the family from the address
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            family: AddressFamily::of(ip),
        }
    }
}

/// Ordered hostname → override mapping
///
/// Keys are normalized (ASCII lowercase, trailing dot stripped) and unique;
/// on merge the right-hand side wins on key collision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTable {
    entries: BTreeMap<String, OverrideEntry>,
}

impl HostTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a hosts-format document into a table
    ///
    /// Malformed lines (fewer than two tokens, invalid address literal,
    /// implausible hostname) are skipped without error.
    pub fn parse(document: &str) -> Self {
        let mut table = Self::new();

        for line in document.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let (Some(first), Some(last)) = (tokens.next(), tokens.next_back()) else {
                // A single token cannot form a record
                continue;
            };

            let Ok(ip) = first.parse::<IpAddr>() else {
                continue;
            };

            let hostname = normalize(last);
            if !is_plausible_hostname(&hostname) {
                continue;
            }

            table.entries.insert(hostname, OverrideEntry::new(ip));
        }

        table
    }

    /// Union of two tables; `overlay` wins on key collision
    ///
    /// Pure: neither input is mutated.
    pub fn merge(base: &HostTable, overlay: &HostTable) -> HostTable {
        let mut entries = base.entries.clone();
        entries.extend(overlay.entries.iter().map(|(k, v)| (k.clone(), *v)));
        HostTable { entries }
    }

    /// Case-insensitive exact-match lookup (no wildcard or suffix matching)
    pub fn lookup(&self, hostname: &str) -> Option<&OverrideEntry> {
        self.entries.get(&normalize(hostname))
    }

    /// Insert a single entry under the normalized hostname
    pub fn insert(&mut self, hostname: &str, ip: IpAddr) {
        self.entries.insert(normalize(hostname), OverrideEntry::new(ip));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Normalize a hostname for keying: ASCII lowercase, trailing dot stripped
fn normalize(hostname: &str) -> String {
    hostname.trim_end_matches('.').to_ascii_lowercase()
}

/// Basic plausibility check for a hostname candidate
///
/// Accepts alphanumeric labels with hyphens and underscores, each at most
/// 63 characters, 253 total. Not a full RFC 1035 validation; its job is to
/// keep obviously broken tokens out of the table.
fn is_plausible_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > 253 {
        return false;
    }

    hostname.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn parse_well_formed_lines() {
        let doc = "140.82.112.3 github.com\n185.199.108.133 raw.githubusercontent.com";
        let table = HostTable::parse(doc);

        assert_eq!(table.len(), 2);
        let entry = table.lookup("github.com").expect("entry present");
        assert_eq!(entry.ip, IpAddr::V4(Ipv4Addr::new(140, 82, 112, 3)));
        assert_eq!(entry.family, AddressFamily::V4);
    }

    #[test]
    fn parse_lowercases_hostnames() {
        let table = HostTable::parse("1.2.3.4 GitHub.COM");
        assert!(table.lookup("github.com").is_some());
        assert!(table.lookup("GITHUB.COM").is_some());
    }

    #[test]
    fn parse_takes_first_and_last_tokens() {
        // Aliases in the middle are ignored; last token is the hostname
        let table = HostTable::parse("1.2.3.4 alias.example.com real.example.com");
        assert_eq!(table.len(), 1);
        assert!(table.lookup("real.example.com").is_some());
        assert!(table.lookup("alias.example.com").is_none());
    }

    #[test]
    fn parse_infers_v6_family() {
        let table = HostTable::parse("2606:50c0:8000::153 assets.github.com");
        let entry = table.lookup("assets.github.com").expect("entry present");
        assert_eq!(entry.family, AddressFamily::V6);
        assert_eq!(
            entry.ip,
            IpAddr::V6("2606:50c0:8000::153".parse::<Ipv6Addr>().unwrap())
        );
    }

    #[test]
    fn parse_skips_comments_blanks_and_malformed_lines() {
        let doc = "\
# comment line
   # indented comment

not-an-ip github.com
1.2.3.4
999.1.1.1 bad.example.com
5.6.7.8 ok.example.com";
        let table = HostTable::parse(doc);

        assert_eq!(table.len(), 1);
        assert!(table.lookup("ok.example.com").is_some());
    }

    #[test]
    fn parse_skips_implausible_hostnames() {
        let doc = "1.2.3.4 bad..name\n1.2.3.4 -leading.example.com\n1.2.3.4 fine.example.com";
        let table = HostTable::parse(doc);

        assert_eq!(table.len(), 1);
        assert!(table.lookup("fine.example.com").is_some());
    }

    #[test]
    fn parse_strips_trailing_dot() {
        let table = HostTable::parse("1.2.3.4 example.com.");
        assert!(table.lookup("example.com").is_some());
    }

    #[test]
    fn parse_empty_document_yields_empty_table() {
        assert!(HostTable::parse("").is_empty());
        assert!(HostTable::parse("# nothing here\n\n").is_empty());
    }

    #[test]
    fn merge_is_right_biased() {
        let mut base = HostTable::new();
        base.insert("shared.example.com", "1.1.1.1".parse().unwrap());
        base.insert("base-only.example.com", "2.2.2.2".parse().unwrap());

        let mut overlay = HostTable::new();
        overlay.insert("shared.example.com", "9.9.9.9".parse().unwrap());
        overlay.insert("overlay-only.example.com", "3.3.3.3".parse().unwrap());

        let merged = HostTable::merge(&base, &overlay);

        assert_eq!(merged.len(), 3);
        assert_eq!(
            merged.lookup("shared.example.com").unwrap().ip,
            "9.9.9.9".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            merged.lookup("base-only.example.com").unwrap().ip,
            "2.2.2.2".parse::<IpAddr>().unwrap()
        );
        assert_eq!(
            merged.lookup("overlay-only.example.com").unwrap().ip,
            "3.3.3.3".parse::<IpAddr>().unwrap()
        );
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let mut base = HostTable::new();
        base.insert("a.example.com", "1.1.1.1".parse().unwrap());
        let mut overlay = HostTable::new();
        overlay.insert("a.example.com", "2.2.2.2".parse().unwrap());

        let _ = HostTable::merge(&base, &overlay);

        assert_eq!(
            base.lookup("a.example.com").unwrap().ip,
            "1.1.1.1".parse::<IpAddr>().unwrap()
        );
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn lookup_is_exact_match_only() {
        let mut table = HostTable::new();
        table.insert("github.com", "1.2.3.4".parse().unwrap());

        assert!(table.lookup("api.github.com").is_none());
        assert!(table.lookup("github.com.evil.example").is_none());
    }
}
