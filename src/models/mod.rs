mod link;

pub use link::{CreateLinkRequest, Link, UpdateLinkRequest};
