//! Domain components attached to entities
//!
//! Plain data only: behavior lives in the systems. `Body` is the one
//! component written by an external collaborator (the physics layer); the
//! simulation reads it and never moves it.

pub mod body;
pub mod breathing;
pub mod ion;
pub mod potential;
pub mod renderable;
pub mod spline;
pub mod target;

pub use body::Body;
pub use breathing::Breathing;
pub use ion::{Ion, IonKind};
pub use potential::Potential;
pub use renderable::{LayerMask, RenderLayer, Renderable};
pub use spline::SplineEdge;
pub use target::{GateState, ReceptorKind, Target};
