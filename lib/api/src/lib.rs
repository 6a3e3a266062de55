//! REST surface for the recommender: catalog listing and similar-game
//! queries over a shared [`playrec_core::Engine`].

mod rest;

pub use rest::{configure, RestApi};
