pub mod email;
pub mod pending;
pub mod view;

pub use email::{EmailPatch, EmailRecord};
pub use pending::{EditField, PendingEdit};
pub use view::EmailView;
