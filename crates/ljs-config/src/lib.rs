#![deny(missing_docs)]
#![doc = "Run and sweep configuration records and their on-disk text format."]

/// Canonical JSON used for reports and plan hashes.
///
/// Object keys are emitted in sorted order at every depth, so equal values
/// always produce identical bytes and therefore identical hashes.
pub mod canonical;
/// Text codec for sectioned configuration records.
pub mod codec;
/// Per-run configuration record.
pub mod run;
/// Sweep configuration record.
pub mod sweep;
/// Placeholder substitution for directory and phase name templates.
///
/// A template is plain text with `{field}` placeholders. Numeric fields accept
/// a format suffix: `{field:f}` renders six decimals, `{field:.3f}` three.
/// Literal braces are written `{{` and `}}`.
pub mod template;

pub use canonical::{from_json_slice, stable_hash_string, to_canonical_json_bytes};
pub use codec::{decode, decode_table, encode, read_config, write_config};
pub use run::{EquilibrationSection, Filepaths, ObservationSection, RunConfig, SystemSection};
pub use sweep::{AxisSpec, GridSpec, SweepConfig, SweepSystem, Templates};
pub use template::{render, Field};
