//! URL handling module for Site-Audit
//!
//! Visitors type addresses by hand, so everything submitted for a scan goes
//! through [`normalize_scan_url`] before any request is made.

mod normalize;

pub use normalize::{has_https_scheme, normalize_scan_url};
