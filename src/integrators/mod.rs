// Copyright @yucwang 2026

pub mod photon_mapping;
pub mod photon_tracer;
pub mod photon_viewer;
pub mod radiance;
