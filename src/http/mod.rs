pub(crate) mod profile;
pub(crate) mod request;
pub(crate) mod response;

pub use profile::BrowserProfile;
pub use request::HttpRequest;
pub use response::{HttpResponse, ResponseType};
