pub mod admin;
pub mod course;
pub mod forms;

pub use admin::{AdminUser, Credentials, LoginRequest};
pub use course::{Course, CourseFields, CourseUpsertRequest, PriceInput};
pub use forms::{CareerApplication, CareerFormRequest, ContactFormRequest, ContactSubmission};
