//! Email delivery via AWS SES
//!
//! OTP delivery is synchronous within the request; callers decide whether a
//! send failure fails the request (registration) or is swallowed
//! (forgot-password, to avoid account enumeration).

use aws_sdk_sesv2::Client as SesClient;
use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Email delivery service
#[derive(Clone)]
pub struct EmailService {
    ses: SesClient,
    from: String,
}

impl EmailService {
    pub fn new(ses: SesClient, from: String) -> Self {
        Self { ses, from }
    }

    async fn send(&self, to: &str, subject: &str, body_text: String) -> Result<(), BoxError> {
        let subject = Content::builder().data(subject).build()?;

        let body = Body::builder()
            .text(Content::builder().data(body_text).build()?)
            .build();

        let message = Message::builder().subject(subject).body(body).build();

        self.ses
            .send_email()
            .from_email_address(&self.from)
            .destination(Destination::builder().to_addresses(to).build())
            .content(EmailContent::builder().simple(message).build())
            .send()
            .await?;

        Ok(())
    }

    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), BoxError> {
        let body_text = format!(
            "Your verification code is: {code}\n\
             Valid for 15 minutes."
        );

        self.send(to, "Canteen Portal - Email Verification", body_text)
            .await?;

        tracing::info!(to = to, "Verification code sent");
        Ok(())
    }

    pub async fn send_password_reset_code(&self, to: &str, code: &str) -> Result<(), BoxError> {
        let body_text = format!(
            "Your password reset code is: {code}\n\
             Valid for 15 minutes.\n\n\
             If you did not request a password reset, you can ignore this email."
        );

        self.send(to, "Canteen Portal - Password Reset", body_text)
            .await?;

        tracing::info!(to = to, "Password reset code sent");
        Ok(())
    }
}
