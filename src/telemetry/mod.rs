//! Host-independent telemetry visualization engine.
//!
//! Nothing in here touches the DOM: the canvas component supplies a
//! [`render::RenderSurface`] and a [`scheduler::FrameHost`], everything else
//! is plain data and can be exercised natively.

pub mod color;
pub mod config;
pub mod engine;
pub mod hash;
pub mod hit_test;
pub mod layout;
pub mod particles;
pub mod render;
pub mod scheduler;
pub mod types;
pub mod view;

pub use color::{Rgba, risk_color, trust_color};
pub use config::{ConfigError, EngineConfig, HitRadii};
pub use engine::{FrameOutcome, TelemetryEngine};
pub use hit_test::{HitKind, HitTarget};
pub use layout::LayoutStrategy;
pub use scheduler::{AnimationScheduler, FrameHandle, FrameHost, FrameTicket, Holds};
pub use types::{Edge, Entity, EntityRole, EntityStatus, Point, Snapshot, TelemetryEvent};
pub use view::ViewTransform;
