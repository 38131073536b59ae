pub mod date;
pub mod envelope;
pub mod i18n;
pub mod locale;
pub mod pagination;
pub mod schema;
pub mod status;
pub mod validation;

pub use envelope::{Affected, Envelope, EnvelopeStatus};
pub use i18n::{MessageBundle, Translator};
pub use locale::Locale;
pub use pagination::{Cursor, CursorPage};
pub use status::{FcmPlatform, FcmTarget, OrderStatus, UserRole, UserStatus};
pub use validation::{FieldError, Rule, Schema};
