pub mod bounds;
pub mod error;
pub mod input;
pub mod messages;
pub mod model;
pub mod orchestrator;
pub mod placement;
pub mod protocol;
pub mod raster;
pub mod service;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod surface;
pub mod variables;

pub use error::SubmitError;
pub use input::PointerEvent;
pub use model::{Color, Point};
pub use placement::{PlacedResult, ResultRenderer};
pub use service::{HttpRecognitionService, RecognitionService};
pub use session::{SessionConfig, SketchSession};
pub use state::SessionState;
