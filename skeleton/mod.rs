#![allow(clippy::module_inception)]

mod normalize;
mod skeleton;
mod space;

pub use crate::skeleton::skeleton::Skeleton;
pub use crate::skeleton::space::AssignmentSpace;
