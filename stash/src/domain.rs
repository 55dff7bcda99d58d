use shared::Error;
use std::fmt;
use std::str::FromStr;

/// Identifier of a storage backend behind the facade.
///
/// Callers select a backend by name; names are matched case-insensitively on
/// every operation and anything unrecognized is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendId {
    Disk,
    Remote,
}

impl BackendId {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Disk => "disk",
            BackendId::Remote => "remote",
        }
    }
}

impl FromStr for BackendId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("disk") {
            Ok(BackendId::Disk)
        } else if value.eq_ignore_ascii_case("remote") {
            Ok(BackendId::Remote)
        } else {
            Err(Error::UnknownBackend(value.to_string()))
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an explicit expiry request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpireOutcome {
    /// An entry existed and was deleted.
    Removed,
    /// No entry was found under the key.
    Missing,
    /// The selected backend does not support explicit expiry, or the backend
    /// identifier was not recognized.
    Unsupported,
}

impl ExpireOutcome {
    pub fn removed(&self) -> bool {
        matches!(self, ExpireOutcome::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_id_parses_case_insensitively() {
        for name in ["disk", "DISK", "Disk"] {
            assert_eq!(name.parse::<BackendId>().unwrap(), BackendId::Disk);
        }
        for name in ["remote", "REMOTE", "Remote"] {
            assert_eq!(name.parse::<BackendId>().unwrap(), BackendId::Remote);
        }
    }

    #[test]
    fn test_backend_id_rejects_unknown_names() {
        let result = "memcached".parse::<BackendId>();
        assert!(matches!(result, Err(Error::UnknownBackend(name)) if name == "memcached"));

        assert!("".parse::<BackendId>().is_err());
    }

    #[test]
    fn test_backend_id_display_round_trips() {
        for id in [BackendId::Disk, BackendId::Remote] {
            assert_eq!(id.to_string().parse::<BackendId>().unwrap(), id);
        }
    }
}
