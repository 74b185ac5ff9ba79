// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Encrypted bearer tokens for the admin API.
//!
//! ## Auth Flow
//!
//! 1. Admin logs in with email and password (`POST /v1/auth/login`)
//! 2. Server issues an access token (60 min) and a refresh token (7 days)
//! 3. Client sends `Authorization: Bearer <access token>`
//! 4. Server:
//!    - Decrypts the token under the configured secret
//!    - Checks token kind and expiry
//!    - Attaches the subject id to the request as a [`Principal`]
//! 5. Protected route groups reject requests without a principal
//!
//! ## Limitations
//!
//! - Tokens are stateless and cannot be revoked before expiry
//! - Refreshing does not invalidate the previous refresh token

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod tokens;

pub use claims::{Principal, TokenKind};
pub use codec::{CodecError, TokenCodec};
pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::{authenticate, require_principal};
pub use password::{hash_password, verify_password, PasswordError};
pub use tokens::{TokenError, TokenManager, TokenPair};
