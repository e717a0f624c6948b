use std::io;

use thiserror::Error;

use crate::sink::{EventSink, Tone};
use crate::target::{bare_host, database_id, ConnectionParameters, Secret};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to read {field}: {source}")]
    Prompt {
        field: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Source of connection credentials, usually an interactive terminal.
pub trait CredentialProvider {
    fn ask(&mut self, prompt: &str) -> io::Result<String>;
    /// Like `ask`, without echoing the input.
    fn ask_secret(&mut self, prompt: &str) -> io::Result<String>;
}

/// Values already supplied on the command line; their prompts are skipped.
#[derive(Debug, Clone, Default)]
pub struct Preset {
    pub uri: Option<String>,
    pub user: Option<String>,
}

pub fn collect<P, S>(
    provider: &mut P,
    preset: Preset,
    sink: &mut S,
) -> Result<ConnectionParameters, CredentialError>
where
    P: CredentialProvider + ?Sized,
    S: EventSink + ?Sized,
{
    let raw_uri = match preset.uri {
        Some(uri) => uri,
        None => provider
            .ask("Please enter the Connection URI for the instance as seen in the Aura Console:")
            .map_err(|source| CredentialError::Prompt {
                field: "connection URI",
                source,
            })?,
    };
    sink.log(Tone::Neutral, &format!("URI entered by the user : {raw_uri}"), false);

    let id = database_id(&bare_host(&raw_uri));
    sink.log(Tone::Neutral, &format!("DBID : {id}"), false);

    let user = match preset.user {
        Some(user) => user,
        None => provider
            .ask(&format!("Please enter your username for {id}:"))
            .map_err(|source| CredentialError::Prompt {
                field: "username",
                source,
            })?,
    };
    let user = user.trim().to_string();

    let password = provider
        .ask_secret(&format!(
            "Please enter the password for user {user} for {id} (Hidden):"
        ))
        .map_err(|source| CredentialError::Prompt {
            field: "password",
            source,
        })?;

    Ok(ConnectionParameters::new(
        &raw_uri,
        &user,
        Secret::new(password.trim()),
    ))
}
