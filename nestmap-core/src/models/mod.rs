pub mod edge;
pub mod frame;
pub mod interval;
pub mod orientation;
pub mod sequence;

// re-export for cleaner imports
pub use self::edge::{AlignedPair, AlignmentEdge, LengthRatio};
pub use self::frame::{Frame, TranslatedInterval};
pub use self::interval::Interval;
pub use self::orientation::Orientation;
pub use self::sequence::{SeqView, Sequence, Translation};
