pub mod db;
pub mod mailer;

pub use db::DbAdapter;
pub use mailer::SmtpMailer;
