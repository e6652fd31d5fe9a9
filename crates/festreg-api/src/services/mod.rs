// Business logic between the route handlers and the repositories

pub mod account;
pub mod event;
pub mod export;
pub mod mailer;
pub mod registration;
pub mod shortlist;

pub use account::AccountService;
pub use event::EventService;
pub use mailer::{MailConfig, Mailer};
pub use registration::RegistrationService;
