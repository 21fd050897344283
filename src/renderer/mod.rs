//! Rendering
//!
//! `view`, `scene`, `shapes` and `vertex` are pure and run anywhere; only
//! `pipeline` talks to the GPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod view;

pub use pipeline::RenderState;
pub use scene::build;
pub use vertex::Vertex;
pub use view::Projection;
