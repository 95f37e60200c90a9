pub mod coordinator;
pub mod interpolation;

// Re-export commonly used types and functions for convenience
pub use coordinator::{
    AnimationCallback, AnimationCoordinator, AnimationOutcome, AnimationSink, ConsumerGroup,
    ConsumerGroups, FeedContext, Quantity,
};
pub use interpolation::{
    normalize_bearing, shortest_rotation, EasingType, Evaluator, Interpolatable, Interpolation,
    TrackedValue,
};
