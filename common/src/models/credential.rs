use std::fmt;

/// Domain account used to authenticate enrichment queries for one scan.
///
/// Lives only as long as the scan invocation. It is deliberately not
/// `Serialize`, and its `Debug` output never contains the password.
#[derive(Clone, PartialEq, Eq)]
pub struct DomainCredential {
    pub username: String,
    password: String,
    /// Directory server (domain controller) as an IP address or FQDN.
    pub directory_server: Option<String>,
}

impl DomainCredential {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        directory_server: Option<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            directory_server: directory_server.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// The DNS domain implied by an FQDN directory server (`dc01.corp.example` -> `corp.example`).
    pub fn domain_suffix(&self) -> Option<&str> {
        let server = self.directory_server.as_deref()?;
        if server.parse::<std::net::IpAddr>().is_ok() {
            return None;
        }
        let (_, suffix) = server.split_once('.')?;
        suffix.contains('.').then_some(suffix)
    }

    /// Username in the form a remote management endpoint expects.
    ///
    /// Already-qualified names (`user@domain`, `DOMAIN\user`) are kept as-is.
    pub fn qualified_username(&self) -> String {
        if self.username.contains('@') || self.username.contains('\\') {
            return self.username.clone();
        }
        match self.domain_suffix() {
            Some(domain) => format!("{}@{}", self.username, domain),
            None => self.username.clone(),
        }
    }
}

impl fmt::Debug for DomainCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("directory_server", &self.directory_server)
            .finish()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
