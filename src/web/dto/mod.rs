//! Request and response DTOs for the Web API.

pub mod request;
pub mod response;
pub mod validation;

pub use request::{
    AddLectureRequest, ChangePasswordRequest, CreateCourseRequest, ForgotPasswordRequest,
    LoginRequest, RegisterRequest, ResetPasswordRequest, UpdateCourseRequest,
};
pub use response::{MessageResponse, UserInfo, UserResponse};
pub use validation::ValidatedJson;
