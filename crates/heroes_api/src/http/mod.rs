//! REST surface over the roster service.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/` | 200 welcome page |
//! | GET | `/health` | 200 `{"status": "ok"}` |
//! | GET | `/heroes` | 200 heroes without relationships |
//! | POST | `/heroes` | 201 created hero |
//! | GET | `/heroes/:id` | 200 hero with nested `hero_powers` |
//! | DELETE | `/heroes/:id` | 204 |
//! | GET | `/powers` | 200 powers without relationships |
//! | POST | `/powers` | 201 created power |
//! | GET | `/powers/:id` | 200 power |
//! | PATCH | `/powers/:id` | 200 updated power |
//! | DELETE | `/powers/:id` | 204 |
//! | POST | `/hero_powers` | 201 link with nested hero and power |
//!
//! Failures use the bodies documented on [`ApiError`].

pub mod error;
pub mod extract;
pub mod routes;


pub use error::ApiError;
pub use routes::{create_router, create_router_with_body_limit, DEFAULT_BODY_LIMIT};
