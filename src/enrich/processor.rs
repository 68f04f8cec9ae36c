use crate::metric::MetricPoint;

/// A pipeline stage that receives a batch and hands back the same batch,
/// possibly with fields added to its points.
///
/// Implementations must return every point they were given, in order.
pub trait Processor<P: MetricPoint>: Send + Sync {
    fn apply(&self, points: Vec<P>) -> Vec<P>;
}
