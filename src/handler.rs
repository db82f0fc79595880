//! Logging-handler collaborators: mode dispatch and call-frequency gating.
//!
//! These are thin adapters around the codec, not part of it. A caller emits a
//! record whose top-level keys name rendering [`Mode`]s on an external
//! visualization backend; each entry's keyword arguments are run through the
//! encoder and forwarded when the per-mode [`FrequencyGate`] fires. The codec
//! itself is indifferent to mode names.
//!
//! ## Examples
//!
//! ```rust
//! use tagson::{tagson, Frequencies, Mode, TagMap, VisBackend, VisHandler};
//!
//! #[derive(Default)]
//! struct Sink(Vec<Mode>);
//!
//! impl VisBackend for Sink {
//!     fn add(&mut self, mode: Mode, _kwargs: &TagMap) {
//!         self.0.push(mode);
//!     }
//! }
//!
//! let mut handler = VisHandler::new(Sink::default(), &Frequencies::EveryCall).unwrap();
//! handler.emit(&tagson!({"scalar": {"tag": "loss", "value": 0.5}})).unwrap();
//! assert_eq!(handler.backend().0, vec![Mode::Scalar]);
//! ```

use crate::{EncodeOptions, Encoder, Error, Result, TagMap, Value};
use indexmap::IndexMap;

/// A rendering operation on the visualization backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Scalar,
    Image,
    Figure,
    Histogram,
    Audio,
    Text,
    Graph,
    OnnxGraph,
    Embedding,
    PrCurve,
    Video,
}

impl Mode {
    /// All supported modes, in the order a [`Frequencies::Ordered`] list
    /// aligns to.
    pub const ALL: [Mode; 11] = [
        Mode::Scalar,
        Mode::Image,
        Mode::Figure,
        Mode::Histogram,
        Mode::Audio,
        Mode::Text,
        Mode::Graph,
        Mode::OnnxGraph,
        Mode::Embedding,
        Mode::PrCurve,
        Mode::Video,
    ];

    /// The record key naming this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Scalar => "scalar",
            Mode::Image => "image",
            Mode::Figure => "figure",
            Mode::Histogram => "histogram",
            Mode::Audio => "audio",
            Mode::Text => "text",
            Mode::Graph => "graph",
            Mode::OnnxGraph => "onnx_graph",
            Mode::Embedding => "embedding",
            Mode::PrCurve => "pr_curve",
            Mode::Video => "video",
        }
    }

    /// Looks a mode up by its record key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Mode> {
        Mode::ALL.iter().copied().find(|m| m.as_str() == key)
    }
}

/// Per-mode call-period configuration.
///
/// A mode with period `f` fires every `f`-th call. Periods may be given
/// globally, as an ordered list aligned to [`Mode::ALL`] (short lists are
/// padded with 1, long lists truncated, either mismatch warned), or by
/// explicit mode-to-period mapping (missing modes default to 1).
#[derive(Clone, Debug, Default)]
pub enum Frequencies {
    /// Every mode fires on every call (all periods 1).
    #[default]
    EveryCall,
    /// One period for all modes.
    Global(u64),
    /// Periods in [`Mode::ALL`] order.
    Ordered(Vec<u64>),
    /// Explicit per-mode periods.
    PerMode(IndexMap<Mode, u64>),
}

impl Frequencies {
    /// Expands the configuration into a full per-mode period table.
    ///
    /// # Errors
    ///
    /// Fails on a zero period, which would never fire and divides by zero in
    /// the gate's modulo.
    pub fn build(&self) -> Result<IndexMap<Mode, u64>> {
        let table: IndexMap<Mode, u64> = match self {
            Frequencies::EveryCall => Mode::ALL.iter().map(|m| (*m, 1)).collect(),
            Frequencies::Global(f) => Mode::ALL.iter().map(|m| (*m, *f)).collect(),
            Frequencies::Ordered(periods) => {
                if periods.len() != Mode::ALL.len() {
                    log::warn!(
                        "got {} logging periods for {} modes, padding with 1s or truncating",
                        periods.len(),
                        Mode::ALL.len()
                    );
                }
                Mode::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, m)| (*m, periods.get(i).copied().unwrap_or(1)))
                    .collect()
            }
            Frequencies::PerMode(periods) => {
                if Mode::ALL.iter().any(|m| !periods.contains_key(m)) {
                    log::warn!("not all modes have a logging period, missing ones default to 1");
                }
                Mode::ALL
                    .iter()
                    .map(|m| (*m, periods.get(m).copied().unwrap_or(1)))
                    .collect()
            }
        };
        if let Some((mode, _)) = table.iter().find(|(_, f)| **f == 0) {
            return Err(Error::custom(format!(
                "logging period for mode '{}' must be nonzero",
                mode.as_str()
            )));
        }
        Ok(table)
    }
}

/// A per-mode modulo counter.
///
/// [`tick`](FrequencyGate::tick) increments the mode's counter and reports
/// whether the operation fires on this call: with period `f`, calls
/// `f, 2f, 3f, ..` fire.
#[derive(Clone, Debug)]
pub struct FrequencyGate {
    periods: IndexMap<Mode, u64>,
    counters: IndexMap<Mode, u64>,
}

impl FrequencyGate {
    pub fn new(frequencies: &Frequencies) -> Result<Self> {
        let periods = frequencies.build()?;
        let counters = Mode::ALL.iter().map(|m| (*m, 0)).collect();
        Ok(FrequencyGate { periods, counters })
    }

    /// Counts a call against `mode` and returns whether it fires.
    pub fn tick(&mut self, mode: Mode) -> bool {
        let counter = self.counters.entry(mode).or_insert(0);
        *counter += 1;
        *counter % self.periods[&mode] == 0
    }

    /// The number of calls counted against `mode` so far.
    #[must_use]
    pub fn count(&self, mode: Mode) -> u64 {
        self.counters.get(&mode).copied().unwrap_or(0)
    }
}

/// The rendering backend the handler dispatches to.
///
/// One entry point instead of one method per mode; implementations switch on
/// `mode` the way the original backend switched on method name.
pub trait VisBackend {
    fn add(&mut self, mode: Mode, kwargs: &TagMap);
}

/// Routes record maps through the codec and the frequency gate to a backend.
pub struct VisHandler<B: VisBackend> {
    backend: B,
    gate: FrequencyGate,
    encoder: Encoder,
}

impl<B: VisBackend> VisHandler<B> {
    pub fn new(backend: B, frequencies: &Frequencies) -> Result<Self> {
        Ok(VisHandler {
            backend,
            gate: FrequencyGate::new(frequencies)?,
            encoder: Encoder::new(EncodeOptions::new()),
        })
    }

    /// Processes one record.
    ///
    /// The record must be an object whose keys name modes and whose values
    /// are the keyword arguments for the backend call; anything else is
    /// silently ignored (nothing to log). Unknown keys and non-object
    /// argument values are skipped. Each matched entry counts against its
    /// mode's gate and, when the gate fires, is encoded and forwarded.
    pub fn emit(&mut self, record: &Value) -> Result<()> {
        let Value::Object(entries) = record else {
            return Ok(());
        };
        for (key, args) in entries.iter() {
            let Some(mode) = key.as_str().and_then(Mode::from_key) else {
                continue;
            };
            if !self.gate.tick(mode) {
                continue;
            }
            if let Value::Object(kwargs) = self.encoder.encode(args)? {
                self.backend.add(mode, &kwargs);
            }
        }
        Ok(())
    }

    /// The gate, for inspecting call counts.
    #[must_use]
    pub fn gate(&self) -> &FrequencyGate {
        &self.gate
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tagson, Scalar};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Mode, TagMap)>,
    }

    impl VisBackend for Recorder {
        fn add(&mut self, mode: Mode, kwargs: &TagMap) {
            self.calls.push((mode, kwargs.clone()));
        }
    }

    #[test]
    fn test_gate_fires_on_multiples() {
        let mut gate = FrequencyGate::new(&Frequencies::Global(3)).unwrap();
        let fired: Vec<bool> = (0..6).map(|_| gate.tick(Mode::Scalar)).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true]);
        assert_eq!(gate.count(Mode::Scalar), 6);
    }

    #[test]
    fn test_every_call_fires_always() {
        let mut gate = FrequencyGate::new(&Frequencies::EveryCall).unwrap();
        assert!(gate.tick(Mode::Image));
        assert!(gate.tick(Mode::Image));
    }

    #[test]
    fn test_ordered_list_padded_and_truncated() {
        // shorter than the mode list: the rest default to 1
        let table = Frequencies::Ordered(vec![2, 3]).build().unwrap();
        assert_eq!(table[&Mode::Scalar], 2);
        assert_eq!(table[&Mode::Image], 3);
        assert_eq!(table[&Mode::Figure], 1);

        // longer: the surplus is ignored
        let long: Vec<u64> = (0..20).map(|i| i + 1).collect();
        let table = Frequencies::Ordered(long).build().unwrap();
        assert_eq!(table.len(), Mode::ALL.len());
        assert_eq!(table[&Mode::Video], 11);
    }

    #[test]
    fn test_per_mode_map_defaults_missing_to_one() {
        let mut periods = IndexMap::new();
        periods.insert(Mode::Histogram, 5);
        let table = Frequencies::PerMode(periods).build().unwrap();
        assert_eq!(table[&Mode::Histogram], 5);
        assert_eq!(table[&Mode::Audio], 1);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(Frequencies::Global(0).build().is_err());
        assert!(Frequencies::Ordered(vec![1, 0]).build().is_err());
    }

    #[test]
    fn test_emit_routes_by_mode() {
        let mut handler = VisHandler::new(Recorder::default(), &Frequencies::EveryCall).unwrap();
        handler
            .emit(&tagson!({
                "scalar": {"tag": "loss", "value": 0.25},
                "unknown_mode": {"x": 1},
                "image": {"tag": "input"}
            }))
            .unwrap();

        let calls = &handler.backend().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, Mode::Scalar);
        assert_eq!(
            calls[0].1.get(&Value::from("value")),
            Some(&Value::from(0.25))
        );
        assert_eq!(calls[1].0, Mode::Image);
    }

    #[test]
    fn test_emit_ignores_non_object_records() {
        let mut handler = VisHandler::new(Recorder::default(), &Frequencies::EveryCall).unwrap();
        handler.emit(&Value::from("not a record")).unwrap();
        assert!(handler.backend().calls.is_empty());
    }

    #[test]
    fn test_emit_respects_gate() {
        let mut handler = VisHandler::new(Recorder::default(), &Frequencies::Global(2)).unwrap();
        for _ in 0..4 {
            handler.emit(&tagson!({"scalar": {"v": 1}})).unwrap();
        }
        assert_eq!(handler.backend().calls.len(), 2);
        assert_eq!(handler.gate().count(Mode::Scalar), 4);
    }

    #[test]
    fn test_emit_encodes_kwargs() {
        let mut handler = VisHandler::new(Recorder::default(), &Frequencies::EveryCall).unwrap();
        let mut kwargs = TagMap::new();
        kwargs.insert(Value::from("step"), Value::Scalar(Scalar::I32(3)));
        let mut record = TagMap::new();
        record.insert(Value::from("scalar"), Value::Object(kwargs));

        handler.emit(&Value::Object(record)).unwrap();
        let (_, forwarded) = &handler.backend().calls[0];
        assert_eq!(
            forwarded.get(&Value::from("step")),
            Some(&Value::from("__int__(3)"))
        );
    }
}
