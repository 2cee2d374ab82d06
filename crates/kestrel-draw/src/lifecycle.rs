use crate::{DrawError, Result};

/// Two-phase lifecycle shared by objects with an explicit teardown.
///
/// Owners check [`Lifecycle::ensure_live`] at the top of every public
/// operation and call [`Lifecycle::dispose`] from their teardown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Live,
    Disposed,
}

impl Lifecycle {
    pub fn is_disposed(self) -> bool {
        self == Lifecycle::Disposed
    }

    /// Fail with [`DrawError::Disposed`] naming `what` once torn down.
    pub fn ensure_live(self, what: &'static str) -> Result<()> {
        match self {
            Lifecycle::Live => Ok(()),
            Lifecycle::Disposed => Err(DrawError::Disposed(what)),
        }
    }

    /// Move to `Disposed`. Returns false if it already was.
    pub fn dispose(&mut self) -> bool {
        let was_live = *self == Lifecycle::Live;
        *self = Lifecycle::Disposed;
        was_live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispose_once() {
        let mut lifecycle = Lifecycle::default();
        assert!(lifecycle.ensure_live("engine").is_ok());

        assert!(lifecycle.dispose());
        assert!(!lifecycle.dispose());
        assert_eq!(
            lifecycle.ensure_live("engine"),
            Err(DrawError::Disposed("engine"))
        );
    }
}
