use serde::Serialize;

/// Relay payload. An empty `from` is filled in by the mailer from config.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SendEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
