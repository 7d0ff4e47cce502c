pub mod types;
pub mod zipcrypto;
pub mod winzip_aes;
pub mod filter;

pub use types::*;
pub use zipcrypto::*;
pub use winzip_aes::*;
pub use filter::*;
