//! User profiles and favourite regions.
//!
//! All routes require a bearer token; the profile row is created from the
//! token claims the first time a user calls any of them.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/users/profile` | Get profile |
//! | PUT | `/api/v1/users/profile` | Update name and email |
//! | GET | `/api/v1/users/favorites` | List favourite regions |
//! | POST | `/api/v1/users/favorites` | Add a favourite region |
//! | DELETE | `/api/v1/users/favorites/{regionCode}` | Remove a favourite region |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::UserService;
