use std::fmt;

pub const SCHEME: &str = "neo4j+ssc://";
pub const BOLT_PORT: u16 = 7687;

const KNOWN_SCHEMES: [&str; 6] = [
    "neo4j+ssc://",
    "neo4j+s://",
    "neo4j://",
    "bolt+ssc://",
    "bolt+s://",
    "bolt://",
];

/// Password kept out of `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

#[derive(Debug, Clone)]
pub struct ConnectionParameters {
    pub uri: String,
    pub user: String,
    pub password: Secret,
    pub database_id: String,
}

impl ConnectionParameters {
    pub fn new(raw_uri: &str, user: &str, password: Secret) -> Self {
        Self {
            uri: normalize_uri(raw_uri),
            user: user.trim().to_string(),
            password,
            database_id: database_id(&bare_host(raw_uri)),
        }
    }
}

/// Strips any known scheme, the default port and a trailing slash.
pub fn bare_host(input: &str) -> String {
    let mut host = input.trim().to_lowercase();
    while let Some(scheme) = KNOWN_SCHEMES.iter().find(|s| host.starts_with(*s)) {
        host.replace_range(..scheme.len(), "");
    }
    let host = host.trim_end_matches('/');
    let port_suffix = format!(":{BOLT_PORT}");
    host.strip_suffix(port_suffix.as_str())
        .unwrap_or(host)
        .to_string()
}

pub fn normalize_uri(input: &str) -> String {
    format!("{SCHEME}{}:{BOLT_PORT}", bare_host(input))
}

/// First DNS label of the host, e.g. `a1b2c3d4` for an Aura instance.
pub fn database_id(host: &str) -> String {
    host.split('.').next().unwrap_or_default().to_string()
}
