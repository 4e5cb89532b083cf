pub mod claims;
pub mod codec;
pub mod generator;
pub mod issuer;
pub mod validator;

pub use claims::{Claims, TokenType};
pub use codec::{TokenCodec, TokenError};
pub use issuer::{TokenIssuer, TokenPair};
pub use validator::TokenValidator;
