pub mod errors;
pub mod ops;
pub mod record;
pub mod simplify;
pub mod store;

pub use errors::GraphError;
pub use ops::{Direction, Segment};
pub use record::{GapKind, Orientation, Payload, Record, RecordId};
pub use store::AgpGraph;
