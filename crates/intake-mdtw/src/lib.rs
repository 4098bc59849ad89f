//! Modified-DTW distance engine for sparse eating-event sequences.
//!
//! Pure math library with zero I/O. Quantifies similarity between people's
//! daily nutrient-intake patterns: person preparation and normalization,
//! a gap-aware local cost, two equivalent DP alignment kernels, pairwise
//! distance matrices, and largest-event extraction.

mod cost;
mod distance;
mod error;
mod event;
mod largest;
mod matrix;
mod mdtw;
mod prepare;

pub use cost::{CostParams, LocalEvent, local_cost};
pub use distance::MdtwDistance;
pub use error::MdtwError;
pub use event::{EventRecord, EventSeries, Person};
pub use largest::{LargestEvent, largest_event};
pub use matrix::DistanceMatrix;
pub use mdtw::{Alignment, DpKernel, Mdtw};
pub use prepare::{NormalizedPerson, prepare_person};
