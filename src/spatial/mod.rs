pub mod geodesic;

pub use geodesic::{circle_ring, densify};
