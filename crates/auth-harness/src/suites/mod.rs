//! The concrete test suites for the hosted sign-in/sign-up application
//!
//! Everything in here is test *content*: ordered cases expressed through the
//! harness. Selectors, URLs, credentials and validation conventions come from
//! the suite configuration, never from literals in this module.

pub mod sign_in;
pub mod sign_up;
