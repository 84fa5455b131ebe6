//! Page components for the application.

pub mod home;
pub mod login;
pub mod register;
pub mod section;
pub mod unauthorized;

pub use home::HomePage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use section::{Section, SectionPage};
pub use unauthorized::UnauthorizedPage;
