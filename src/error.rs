// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The one place this crate surfaces a `Result`: scene assembly. The hot path (raycasts,
//! the recursive integrator) never fails — misses are `bool`/`Option`, and degenerate
//! inputs are treated as "always miss" rather than rejected.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneBuildError {
    #[error("no material registered under the name {0:?}")]
    UnknownMaterial(String),

    #[error("no texture registered under the name {0:?}")]
    UnknownTexture(String),

    #[error("no medium registered under the name {0:?}")]
    UnknownMedium(String),

    #[error("degenerate {shape_kind} shape: {reason}")]
    DegenerateShape { shape_kind: &'static str, reason: String },
}
