pub mod types;

pub use types::{
    ALL_REQUEST_TYPES, FieldChange, NewRequest, Priority, RequestDetails, RequestForm,
    RequestPayload, RequestStatus, RequestType, SupportRequest,
};
