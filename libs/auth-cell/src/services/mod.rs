pub mod gate;
pub mod login;
pub mod token;

pub use gate::AuthorizationGate;
pub use login::LoginService;
pub use token::TokenService;
