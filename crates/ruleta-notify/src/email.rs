//! Assignment email sender (async lettre over STARTTLS).

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use ruleta_core::config::SmtpConfig;
use ruleta_core::error::{Result, RuletaError};
use ruleta_core::{Assignment, Person};
use std::time::Duration;

/// Subject line for an assignment.
pub fn assignment_subject(month: &str) -> String {
    format!("🍴 ¡Te toca cocinar! - Asignación de {month}")
}

/// Plain-text body for an assignment.
pub fn assignment_body(assignment: &Assignment) -> String {
    format!(
        "Hola {name},\n\n\
         ¡La ruleta ha hablado! 🎡\n\n\
         Te ha correspondido la tarea de preparar la comida para el mes de {month}.\n\n\
         ¡Que disfrutes cocinando! 👨‍🍳👩‍🍳\n",
        name = assignment.person.name,
        month = assignment.month,
    )
}

/// Sends assignment emails through the configured relay.
#[derive(Debug, Clone)]
pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Whether credentials are configured.
    pub fn is_enabled(&self) -> bool {
        self.config.credentials().is_some()
    }

    /// Email `person` that they cook in `month`.
    ///
    /// Returns `false` when email is disabled, the person has no address, or
    /// delivery fails for any reason. Never retries. The attempt is capped at
    /// `timeout_secs`.
    pub async fn send_assignment_email(&self, person: &Person, month: &str) -> bool {
        let Some((user, password)) = self.config.credentials() else {
            tracing::info!("SMTP credentials not set, skipping email to {}", person.name);
            return false;
        };

        let assignment = Assignment::new(person.clone(), month);
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let send = self.deliver(&assignment, user, password);

        match tokio::time::timeout(timeout, send).await {
            Ok(Ok(())) => {
                tracing::info!("📤 Assignment email sent to {} ({month})", person.name);
                true
            }
            Ok(Err(e)) => {
                tracing::warn!("Error sending email to {}: {e}", person.name);
                false
            }
            Err(_) => {
                tracing::warn!(
                    "Email to {} timed out after {}s",
                    person.name,
                    self.config.timeout_secs
                );
                false
            }
        }
    }

    async fn deliver(&self, assignment: &Assignment, user: &str, password: &str) -> Result<()> {
        let email = build_message(user, assignment)?;
        let creds = Credentials::new(user.to_string(), password.to_string());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)
            .map_err(|e| RuletaError::Notify(format!("SMTP relay: {e}")))?
            .port(self.config.port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(self.config.timeout_secs)))
            .build();

        mailer
            .send(email)
            .await
            .map_err(|e| RuletaError::Notify(format!("SMTP send: {e}")))?;
        Ok(())
    }
}

/// Build the assignment message sent from `from`.
pub fn build_message(from: &str, assignment: &Assignment) -> Result<Message> {
    let to = assignment
        .person
        .email
        .as_deref()
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| {
            RuletaError::Notify(format!("{} has no email address", assignment.person.name))
        })?;

    let from_mailbox: Mailbox = from
        .parse()
        .map_err(|e| RuletaError::Notify(format!("Invalid from: {e}")))?;
    let to_mailbox: Mailbox = to
        .parse()
        .map_err(|e| RuletaError::Notify(format!("Invalid to: {e}")))?;

    Message::builder()
        .from(from_mailbox)
        .to(to_mailbox)
        .subject(assignment_subject(&assignment.month))
        .header(ContentType::TEXT_PLAIN)
        .body(assignment_body(assignment))
        .map_err(|e| RuletaError::Notify(format!("Build email: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Person {
        Person::new("Ana", Some("ana@example.com".into()))
    }

    #[tokio::test]
    async fn test_disabled_without_credentials() {
        let mailer = Mailer::new(SmtpConfig::default());
        assert!(!mailer.is_enabled());
        assert!(!mailer.send_assignment_email(&ana(), "Enero").await);
    }

    #[tokio::test]
    async fn test_password_alone_is_not_enough() {
        let mailer = Mailer::new(SmtpConfig {
            password: Some("secret".into()),
            ..SmtpConfig::default()
        });
        assert!(!mailer.is_enabled());
        assert!(!mailer.send_assignment_email(&ana(), "Enero").await);
    }

    #[tokio::test]
    async fn test_unreachable_relay_returns_false() {
        let mailer = Mailer::new(SmtpConfig {
            host: "127.0.0.1".into(),
            port: 1,
            username: Some("bot@example.com".into()),
            password: Some("secret".into()),
            timeout_secs: 2,
        });
        assert!(mailer.is_enabled());
        assert!(!mailer.send_assignment_email(&ana(), "Enero").await);
    }

    #[tokio::test]
    async fn test_missing_recipient_returns_false() {
        let mailer = Mailer::new(SmtpConfig {
            host: "127.0.0.1".into(),
            port: 1,
            username: Some("bot@example.com".into()),
            password: Some("secret".into()),
            timeout_secs: 2,
        });
        let nobody = Person::new("Sin correo", None);
        assert!(!mailer.send_assignment_email(&nobody, "Enero").await);
    }

    #[test]
    fn test_message_content() {
        let assignment = Assignment::new(ana(), "Marzo");
        assert_eq!(
            assignment_subject("Marzo"),
            "🍴 ¡Te toca cocinar! - Asignación de Marzo"
        );
        let body = assignment_body(&assignment);
        assert!(body.starts_with("Hola Ana,"));
        assert!(body.contains("para el mes de Marzo."));
        assert!(build_message("bot@example.com", &assignment).is_ok());
    }

    #[test]
    fn test_message_requires_recipient() {
        let assignment = Assignment::new(Person::new("Ana", None), "Marzo");
        let err = build_message("bot@example.com", &assignment).unwrap_err();
        assert!(err.to_string().contains("no email address"));
    }
}
