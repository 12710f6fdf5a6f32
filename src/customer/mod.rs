pub mod record;
pub mod user_type;

pub use record::{CustomerRecord, OrganisationDetails, StudentDetails, resolve_canonical_id};
pub use user_type::UserType;
