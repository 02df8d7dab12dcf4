pub mod captcha;
pub mod mailer;
pub mod template;

pub use captcha::CaptchaService;
pub use mailer::{EmailAttachment, LogMailer, MailError, Mailer, OutgoingEmail, SmtpMailer};
