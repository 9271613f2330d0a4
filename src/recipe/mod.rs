// src/recipe/mod.rs

//! Generated container recipes
//!
//! A recipe here is the Dockerfile text returned by the generator. It is
//! never trusted: [`ArtifactValidator`] cleans and gates it before it
//! reaches the build context.
//!
//! The README is also mined for an example invocation, which determines
//! the arguments the container is run with.

mod example;
mod validate;

pub use example::{default_example, extract_readme_example, resolve_example};
pub use validate::{has_base_image, strip_fences, ArtifactValidator, RECIPE_FILENAME};
