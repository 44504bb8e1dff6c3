/// Router Module Index
///
/// Organizes the routing surface by resource family. A path lives in exactly
/// one module; where read and write access differ on the same path, the read
/// handler is open and the write handler applies the permission rules.
/// The users router is additionally wrapped in the authentication middleware
/// in `create_router`, since every `/users` operation requires a principal.

/// Registration, token exchange, and the health probe.
pub mod auth;

/// Categories, genres, and titles: public reads, admin writes.
pub mod catalog;

/// Reviews and their comments, nested under titles.
pub mod reviews;

/// User management plus the `"me"` alias; authenticated only.
pub mod users;
