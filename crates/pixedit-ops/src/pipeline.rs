//! Ordered application of filters and adjustments to one working buffer.
//!
//! A [`Pipeline`] owns the buffer for an edit session. Each operation reads
//! the current buffer, produces a new one and, only on success, replaces
//! the working buffer with it. A failed operation leaves the buffer as it
//! was, and [`Pipeline::run`] stops at the first failure.
//!
//! # Example
//!
//! ```rust
//! use pixedit_core::{ChannelMode, PixelBuffer};
//! use pixedit_ops::{Adjustment, Filter, Operation, Pipeline};
//!
//! let src = PixelBuffer::filled(8, 8, ChannelMode::Rgb, &[100, 100, 100]).unwrap();
//! let mut pipeline = Pipeline::new(src);
//!
//! pipeline
//!     .run(&[
//!         Operation::Filter { filter: Filter::Blur, strength: 2 },
//!         Operation::Adjust { adjustment: Adjustment::Brightness, value: 20.0 },
//!     ])
//!     .unwrap();
//! assert!(pipeline.buffer().data().iter().all(|&v| v == 120));
//!
//! // String dispatch for untyped input.
//! assert!(pipeline.apply_filter("emboss", 1).is_err());
//! ```

use crate::{Adjustment, Filter, OpsError, OpsResult};
use pixedit_core::PixelBuffer;
use std::fmt;
use tracing::{debug, trace};

/// One step of an edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Run `filter` `strength` times.
    Filter {
        /// Which filter
        filter: Filter,
        /// Repeat count, at least 1
        strength: u32,
    },
    /// Apply `adjustment` with `value`.
    Adjust {
        /// Which adjustment
        adjustment: Adjustment,
        /// Offset or factor, depending on the adjustment
        value: f64,
    },
}

impl Operation {
    /// Builds a filter step from a wire name and signed strength.
    ///
    /// # Errors
    ///
    /// [`OpsError::UnsupportedFilter`] for unknown names,
    /// [`OpsError::InvalidParameter`] for `strength <= 0`.
    pub fn filter(name: &str, strength: i64) -> OpsResult<Self> {
        let filter: Filter = name.parse()?;
        let strength = filter.strength(strength)?;
        Ok(Self::Filter { filter, strength })
    }

    /// Builds an adjustment step from a wire name and value.
    ///
    /// # Errors
    ///
    /// [`OpsError::UnsupportedAdjustment`] for unknown kinds,
    /// [`OpsError::InvalidParameter`] for out-of-domain values.
    pub fn adjust(kind: &str, value: f64) -> OpsResult<Self> {
        let adjustment: Adjustment = kind.parse()?;
        adjustment.validate(value)?;
        Ok(Self::Adjust { adjustment, value })
    }

    /// Wire name of the filter or adjustment.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Filter { filter, .. } => filter.name(),
            Self::Adjust { adjustment, .. } => adjustment.name(),
        }
    }

    /// Runs the step against `buffer` and returns the result.
    pub fn apply(&self, buffer: &PixelBuffer) -> OpsResult<PixelBuffer> {
        match *self {
            Self::Filter { filter, strength } => filter.apply_n(buffer, strength),
            Self::Adjust { adjustment, value } => adjustment.apply(buffer, value),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter { filter, strength } => write!(f, "{filter} x{strength}"),
            Self::Adjust { adjustment, value } => write!(f, "{adjustment} {value}"),
        }
    }
}

/// Owns the working buffer of one edit session.
#[derive(Debug, Clone)]
pub struct Pipeline {
    buffer: PixelBuffer,
    applied: usize,
}

impl Pipeline {
    /// Starts a session on `buffer`.
    pub fn new(buffer: PixelBuffer) -> Self {
        Self { buffer, applied: 0 }
    }

    /// Current working buffer.
    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Ends the session and hands back the buffer.
    #[inline]
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Number of operations committed so far.
    #[inline]
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Applies a filter looked up by wire name.
    pub fn apply_filter(&mut self, name: &str, strength: i64) -> OpsResult<()> {
        let op = Operation::filter(name, strength)?;
        self.apply(&op)
    }

    /// Applies an adjustment looked up by wire name.
    pub fn adjust(&mut self, kind: &str, value: f64) -> OpsResult<()> {
        let op = Operation::adjust(kind, value)?;
        self.apply(&op)
    }

    /// Applies one operation, replacing the buffer only on success.
    pub fn apply(&mut self, op: &Operation) -> OpsResult<()> {
        trace!(%op, "pipeline::apply");
        let out = op.apply(&self.buffer)?;
        debug_assert_eq!(out.dimensions(), self.buffer.dimensions());
        self.buffer = out;
        self.applied += 1;
        debug!(%op, mode = %self.buffer.mode(), "operation committed");
        Ok(())
    }

    /// Applies `ops` in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// [`OpsError::Step`] wrapping the failing operation's error. Steps
    /// before it stay committed.
    pub fn run(&mut self, ops: &[Operation]) -> OpsResult<()> {
        debug!(steps = ops.len(), "pipeline::run");
        for (index, op) in ops.iter().enumerate() {
            self.apply(op).map_err(|source| OpsError::Step {
                index,
                operation: op.to_string(),
                source: Box::new(source),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixedit_core::ChannelMode;

    fn sample() -> PixelBuffer {
        let data = (0..6 * 5 * 3).map(|i| (i * 13 % 256) as u8).collect();
        PixelBuffer::from_data(6, 5, ChannelMode::Rgb, data).unwrap()
    }

    #[test]
    fn test_operation_from_names() {
        assert_eq!(
            Operation::filter("sharpen", 2).unwrap(),
            Operation::Filter { filter: Filter::Sharpen, strength: 2 }
        );
        assert_eq!(
            Operation::adjust("contrast", 1.5).unwrap(),
            Operation::Adjust { adjustment: Adjustment::Contrast, value: 1.5 }
        );
        assert_eq!(
            Operation::filter("invalid_filter", 1),
            Err(OpsError::UnsupportedFilter("invalid_filter".into()))
        );
        assert_eq!(
            Operation::adjust("invalid_adjustment", 1.5),
            Err(OpsError::UnsupportedAdjustment("invalid_adjustment".into()))
        );
        assert!(matches!(Operation::filter("blur", 0), Err(OpsError::InvalidParameter(_))));
        assert!(matches!(Operation::filter("blur", -3), Err(OpsError::InvalidParameter(_))));
    }

    #[test]
    fn test_display() {
        let op = Operation::Filter { filter: Filter::EdgeDetection, strength: 3 };
        assert_eq!(op.to_string(), "edge_detection x3");
        let op = Operation::Adjust { adjustment: Adjustment::Brightness, value: -20.0 };
        assert_eq!(op.to_string(), "brightness -20");
        assert_eq!(op.name(), "brightness");
    }

    #[test]
    fn test_string_dispatch_matches_typed() {
        let mut by_name = Pipeline::new(sample());
        by_name.apply_filter("blur", 2).unwrap();
        by_name.adjust("saturation", 0.5).unwrap();

        let mut typed = Pipeline::new(sample());
        typed
            .run(&[
                Operation::Filter { filter: Filter::Blur, strength: 2 },
                Operation::Adjust { adjustment: Adjustment::Saturation, value: 0.5 },
            ])
            .unwrap();

        assert_eq!(by_name.buffer(), typed.buffer());
        assert_eq!(typed.applied(), 2);
    }

    #[test]
    fn test_order_matters() {
        let mut a = Pipeline::new(sample());
        a.run(&[
            Operation::filter("edge_detection", 1).unwrap(),
            Operation::adjust("brightness", 40.0).unwrap(),
        ])
        .unwrap();

        let mut b = Pipeline::new(sample());
        b.run(&[
            Operation::adjust("brightness", 40.0).unwrap(),
            Operation::filter("edge_detection", 1).unwrap(),
        ])
        .unwrap();

        assert_eq!(a.buffer().mode(), ChannelMode::Rgb);
        assert_eq!(b.buffer().mode(), ChannelMode::Gray);
        assert_ne!(a.buffer(), b.buffer());
    }

    #[test]
    fn test_unknown_name_leaves_buffer() {
        let mut p = Pipeline::new(sample());
        let before = p.buffer().clone();
        assert!(matches!(p.apply_filter("emboss", 1), Err(OpsError::UnsupportedFilter(_))));
        assert!(matches!(p.adjust("gamma", 2.2), Err(OpsError::UnsupportedAdjustment(_))));
        assert_eq!(p.buffer(), &before);
        assert_eq!(p.applied(), 0);
    }

    #[test]
    fn test_run_halts_at_first_failure() {
        let mut p = Pipeline::new(sample());
        let ops = [
            Operation::Adjust { adjustment: Adjustment::Brightness, value: 10.0 },
            Operation::Adjust { adjustment: Adjustment::Contrast, value: -1.0 },
            Operation::Filter { filter: Filter::Blur, strength: 1 },
        ];
        let err = p.run(&ops).unwrap_err();
        match &err {
            OpsError::Step { index, operation, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(operation, "contrast -1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(err.root(), OpsError::InvalidParameter(_)));

        // Only the first step committed.
        let expected = Adjustment::Brightness.apply(&sample(), 10.0).unwrap();
        assert_eq!(p.buffer(), &expected);
        assert_eq!(p.applied(), 1);
    }

    #[test]
    fn test_failed_filter_on_tiny_image() {
        let tiny = PixelBuffer::new(2, 2, ChannelMode::Rgb);
        let mut p = Pipeline::new(tiny.clone());
        assert!(matches!(p.apply_filter("sharpen", 1), Err(OpsError::InvalidKernel(_))));
        assert_eq!(p.into_buffer(), tiny);
    }
}
