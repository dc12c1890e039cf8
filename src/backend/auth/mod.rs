//! Authentication Module
//!
//! This module handles user registration, login and session management, and
//! owns the stored user document.
//!
//! # Architecture
//!
//! - **`users`** - User document and database operations
//! - **`sessions`** - JWT token generation/validation and the session cookie
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Authentication Flow
//!
//! 1. **Signup**: Name, email and password → User created → token + cookie returned
//! 2. **Login**: Email and password → Credentials verified → token + cookie returned
//! 3. **Requests**: Token (header or cookie) → verified → user resolved by email
//! 4. **Logout**: Cookie expired
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens expire after the configured number of days
//! - Invalid credentials return 401 (no information leakage)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{AuthResponse, LoginRequest, SignupRequest, UserResponse};
pub use handlers::{get_me, login, logout, signup};
pub use users::User;
