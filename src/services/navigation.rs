use serde::Serialize;

use crate::models::{FeedbackSignal, Layer};

/// Result of applying one feedback signal to the current layer
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Transition {
    pub signal: FeedbackSignal,
    pub from: Layer,
    pub to: Layer,
    /// The signal asked to move past the first or last layer and was absorbed
    pub clamped: bool,
}

/// Applies a feedback signal to the layer being read
///
/// `too_complex` steps down and `too_simple` steps up, both clamped to the
/// layer range. `understood` never moves. Every call yields a transition,
/// clamped or not, so the caller can log each attempt as a feedback event.
pub fn navigate(current: Layer, signal: FeedbackSignal) -> Transition {
    let target = match signal {
        FeedbackSignal::TooComplex => current.simpler(),
        FeedbackSignal::TooSimple => current.harder(),
        FeedbackSignal::Understood => Some(current),
    };

    Transition {
        signal,
        from: current,
        to: target.unwrap_or(current),
        clamped: target.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(i: u8) -> Layer {
        Layer::new(i).unwrap()
    }

    #[test]
    fn test_too_complex_at_floor_is_clamped() {
        let t = navigate(Layer::SIMPLEST, FeedbackSignal::TooComplex);
        assert_eq!(t.to, Layer::SIMPLEST);
        assert!(t.clamped);
    }

    #[test]
    fn test_too_simple_at_ceiling_is_clamped() {
        let t = navigate(Layer::EXPERT, FeedbackSignal::TooSimple);
        assert_eq!(t.to, Layer::EXPERT);
        assert!(t.clamped);
    }

    #[test]
    fn test_steps_move_one_layer() {
        let up = navigate(layer(1), FeedbackSignal::TooSimple);
        assert_eq!((up.from, up.to, up.clamped), (layer(1), layer(2), false));

        let down = navigate(layer(2), FeedbackSignal::TooComplex);
        assert_eq!((down.from, down.to, down.clamped), (layer(2), layer(1), false));
    }

    #[test]
    fn test_understood_keeps_layer() {
        for l in Layer::all() {
            let t = navigate(l, FeedbackSignal::Understood);
            assert_eq!(t.to, l);
            assert!(!t.clamped);
        }
    }

    #[test]
    fn test_layer_never_leaves_range_under_repeated_signals() {
        let mut current = Layer::SIMPLEST;
        for _ in 0..10 {
            current = navigate(current, FeedbackSignal::TooSimple).to;
        }
        assert_eq!(current, Layer::EXPERT);

        for _ in 0..10 {
            current = navigate(current, FeedbackSignal::TooComplex).to;
        }
        assert_eq!(current, Layer::SIMPLEST);
    }
}
