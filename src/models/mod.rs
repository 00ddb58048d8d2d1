pub mod coordinates;
pub mod route;
pub mod segment;

pub use coordinates::{Coordinates, LocationInput};
pub use route::{
    Complexity, ElevationSummary, FinalRoute, Pace, RouteCandidate, RoutePreferences,
    RouteStrategy, SearchAttemptResult, SearchOptions, TargetSpec,
};
pub use segment::{Segment, SegmentClassification};
