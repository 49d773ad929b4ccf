// Copyright @yucwang 2021

pub mod bsdf;
pub mod bvh;
pub mod config;
pub mod integrator;
pub mod interaction;
pub mod intersector;
pub mod kd_tree;
pub mod light;
pub mod material;
pub mod photon;
pub mod photon_map;
pub mod rng;
pub mod sensor;
pub mod scene;
pub mod scene_loader;
