//! Schema-typed signed tokens
//!
//! This crate issues and verifies JWS compact tokens whose claims are
//! checked against a declared schema:
//! - Typed claim values (boolean, integer, long, double, timestamp, string)
//! - Required and optional fields, with undeclared claims rejected by default
//! - HS256/384/512, RS256/384/512 and ES256 signing behind one trait
//! - Issuer, expiry and not-before enforcement with an injectable clock
//!
//! ```no_run
//! use cryypt_token::{ClaimSchema, ClaimSet, FieldType, StaticProvider, TokenManager};
//!
//! # fn main() -> cryypt_token::TokenResult<()> {
//! let schema = ClaimSchema::builder()
//!     .required("sub", FieldType::String)
//!     .optional("admin", FieldType::Boolean)
//!     .build()?;
//! let manager = TokenManager::builder("access_token", schema)
//!     .provider(StaticProvider::hs256(b"a-shared-secret-of-32-bytes-min!".to_vec())?)
//!     .build()?;
//!
//! let token = manager.create(&ClaimSet::new().with("sub", "user-1").with("admin", true))?;
//! let claims = manager.verify_and_parse_payload(&token)?;
//! assert_eq!(claims.get("sub").and_then(|v| v.as_str()), Some("user-1"));
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod claims;
mod clock;
mod config;
mod error;
mod jws;
mod manager;
mod provider;
pub mod schema;
mod token;

pub use algorithms::{AlgorithmHandle, EcdsaAlgorithm, HmacAlgorithm, RsaAlgorithm, SigningAlgorithm};
pub use claims::{ClaimSet, ClaimValue, FieldType};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TokenManagerConfig;
pub use error::*;
pub use manager::{DEFAULT_EXPIRES_IN_MINUTES, TokenManager, TokenManagerBuilder};
pub use provider::{AlgorithmProvider, FnProvider, StaticProvider};
pub use schema::{ClaimSchema, ClaimSchemaBuilder, FieldSpec, RESERVED_CLAIMS};
pub use token::{DecodedToken, TokenHeader};
