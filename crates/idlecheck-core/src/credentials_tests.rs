use std::collections::VecDeque;
use std::io;

use crate::credentials::{collect, CredentialError, CredentialProvider, Preset};
use crate::testing::MemorySink;

#[derive(Default)]
struct ScriptedPrompt {
    answers: VecDeque<String>,
    secret: Option<String>,
    asked: Vec<String>,
    asked_secret: Vec<String>,
}

impl ScriptedPrompt {
    fn new(answers: &[&str], secret: Option<&str>) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            secret: secret.map(str::to_string),
            ..Self::default()
        }
    }
}

impl CredentialProvider for ScriptedPrompt {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.asked.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no answer"))
    }

    fn ask_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.asked_secret.push(prompt.to_string());
        self.secret
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no secret"))
    }
}

#[test]
fn collect_prompts_for_everything_and_normalizes() {
    // Arrange
    let mut prompt = ScriptedPrompt::new(
        &["neo4j+s://A1B2C3D4.databases.neo4j.io", " neo4j "],
        Some(" s3cret \n"),
    );
    let mut sink = MemorySink::default();

    // Act
    let params = collect(&mut prompt, Preset::default(), &mut sink).expect("collect");

    // Assert
    assert_eq!(params.uri, "neo4j+ssc://a1b2c3d4.databases.neo4j.io:7687");
    assert_eq!(params.user, "neo4j");
    assert_eq!(params.password.expose(), "s3cret");
    assert_eq!(params.database_id, "a1b2c3d4");
    assert_eq!(prompt.asked.len(), 2);
    assert!(prompt.asked[1].contains("a1b2c3d4"));
    assert!(prompt.asked_secret[0].contains("user neo4j for a1b2c3d4"));

    let raw = sink
        .entries
        .iter()
        .find(|e| e.message.starts_with("URI entered by the user"))
        .expect("raw uri logged");
    assert!(!raw.echo, "raw uri is written to the file only");
    assert!(sink.contains("DBID : a1b2c3d4"));
    assert!(!sink.contains("s3cret"), "password must never be logged");
}

#[test]
fn collect_skips_prompts_for_preset_values() {
    // Arrange
    let mut prompt = ScriptedPrompt::new(&[], Some("pw"));
    let mut sink = MemorySink::default();
    let preset = Preset {
        uri: Some("x9y8z7.databases.neo4j.io".to_string()),
        user: Some("reader".to_string()),
    };

    // Act
    let params = collect(&mut prompt, preset, &mut sink).expect("collect");

    // Assert
    assert!(prompt.asked.is_empty());
    assert_eq!(prompt.asked_secret.len(), 1);
    assert_eq!(params.user, "reader");
    assert_eq!(params.database_id, "x9y8z7");
}

#[test]
fn collect_reports_which_prompt_failed() {
    let mut prompt = ScriptedPrompt::new(&["a1b2c3d4.databases.neo4j.io", "neo4j"], None);
    let mut sink = MemorySink::default();

    let err = collect(&mut prompt, Preset::default(), &mut sink).expect_err("missing password");

    let CredentialError::Prompt { field, .. } = err;
    assert_eq!(field, "password");
}
