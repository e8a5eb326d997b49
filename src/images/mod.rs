//! Image relay URL construction.
//!
//! Cover art is never fetched or decoded here. When an image relay is
//! configured, upstream URLs are rewritten so the catalog downloads them
//! through the relay instead of hitting provider CDNs directly.

mod proxy;

pub use proxy::build_proxy_url;
