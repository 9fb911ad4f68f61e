// Copyright 2026 the raytracer authors under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Dense per-shape-type storage and the heterogeneous blob that ties it together.

mod array;
mod blob;

pub use array::{AnyShapeArray, HomogeneousObjectArray, LocalHit, ResolvableHit, ResolvedHit, ResolvingArray, UnboundedAnyShapeArray};
pub use blob::{SceneBlob, ShapeKind};
