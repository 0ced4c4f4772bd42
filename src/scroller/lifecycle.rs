/// Lifecycle of a windowed view
///
/// A single enum instead of separate `initialized` / `disposed` flags, so a
/// view can only be in one phase at a time:
///
/// ```text
/// Constructed -> Initializing -> Ready -> Disposed
/// ```
///
/// Loading further pages happens inside `Ready` and is tracked by the
/// loading flag, not by a phase change. A reset returns to an empty `Ready`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    /// Listeners wired, no data requested yet
    #[default]
    Constructed,

    /// First page in flight
    Initializing,

    /// Steady-state render/scroll/paginate loop
    Ready,

    /// Torn down; every operation is a no-op
    Disposed,
}

impl ViewPhase {
    pub fn is_constructed(&self) -> bool {
        matches!(self, ViewPhase::Constructed)
    }

    pub fn is_initializing(&self) -> bool {
        matches!(self, ViewPhase::Initializing)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewPhase::Ready)
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self, ViewPhase::Disposed)
    }

    /// Phase after the first page settles, successfully or not
    pub fn settle(self) -> ViewPhase {
        match self {
            ViewPhase::Disposed => ViewPhase::Disposed,
            _ => ViewPhase::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_predicates() {
        assert!(ViewPhase::default().is_constructed());
        assert!(ViewPhase::Initializing.is_initializing());
        assert!(ViewPhase::Ready.is_ready());
        assert!(ViewPhase::Disposed.is_disposed());
    }

    #[test]
    fn test_settle() {
        assert_eq!(ViewPhase::Initializing.settle(), ViewPhase::Ready);
        assert_eq!(ViewPhase::Constructed.settle(), ViewPhase::Ready);
        assert_eq!(ViewPhase::Disposed.settle(), ViewPhase::Disposed);
    }
}
