//! Application services

pub mod mailer;

pub use mailer::{LogMailer, Mailer, RecordingMailer};
