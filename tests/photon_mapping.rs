// Copyright @yucwang 2026

use praline::core::bsdf::ScatterEvent;
use praline::core::config::PhotonMappingConfig;
use praline::core::light::Light;
use praline::core::material::Material;
use praline::core::photon_map::PhotonMap;
use praline::core::rng::LcgRng;
use praline::core::scene::Scene;
use praline::core::scene_loader::parse_scene;
use praline::integrators::photon_mapping::PhotonMappingIntegrator;
use praline::integrators::photon_tracer::PhotonTracer;
use praline::integrators::radiance::RadianceEstimator;
use praline::math::constants::{Float, Vector3f};
use praline::math::spectrum::RGBSpectrum;
use praline::renderers::simple::{Renderer, SimpleRenderer};
use praline::shapes::rectangle::Rectangle;

use std::path::Path;

fn lit_floor(power: Float) -> Scene {
    let mut scene = Scene::new();
    let white = scene.add_material(Material::lambertian(RGBSpectrum::splat(1.0)));
    scene.add_triangles(Rectangle::horizontal(Vector3f::zeros(), 20.0).triangles().to_vec(), white);
    scene.add_light(Light::point(Vector3f::new(0.0, 5.0, 0.0), power, RGBSpectrum::splat(1.0)));
    scene.build_bvh();
    scene
}

fn estimate_at_origin(power: Float, config: &PhotonMappingConfig) -> RGBSpectrum {
    let mut scene = lit_floor(power);
    scene.assign_photon_quotas(config.photon_count);
    let (buffer, stats) = PhotonTracer::from_config(config).trace(&scene, scene.lights());
    assert_eq!(stats.emitted, config.photon_count);
    assert!(!buffer.is_empty());

    let map = PhotonMap::build(&buffer, config.nearest_neighbours, config.max_search_radius);
    RadianceEstimator::new(config.cone_filter).estimate(&map, &Vector3f::zeros(), RGBSpectrum::splat(1.0))
}

#[test]
fn radiance_scales_linearly_with_light_power() {
    let config = PhotonMappingConfig::default().with_photon_count(20_000);
    let single = estimate_at_origin(10.0, &config);
    let double = estimate_at_origin(20.0, &config);

    assert!(single.r() > 0.0);
    assert!(single.is_non_negative());
    for c in 0..3 {
        let (a, b) = (single.to_vector()[c], double.to_vector()[c]);
        assert!((b - 2.0 * a).abs() <= 1e-4 * a.max(1e-6));
    }
}

#[test]
fn photon_quotas_follow_power_share() {
    let mut scene = lit_floor(1.0);
    scene.add_light(Light::point(Vector3f::new(3.0, 5.0, 0.0), 3.0, RGBSpectrum::splat(1.0)));
    let assigned = scene.assign_photon_quotas(1001);

    let quotas: Vec<usize> = scene.lights().iter().map(|l| l.num_photons()).collect();
    assert!(assigned <= 1001);
    assert_eq!(quotas.iter().sum::<usize>(), assigned);
    assert_eq!(quotas, vec![250, 750]);
}

#[test]
fn mirror_and_index_matched_glass() {
    let mut rng = LcgRng::new(3);
    let normal = Vector3f::new(0.0, 1.0, 0.0);

    let mirror = Material::specular(RGBSpectrum::splat(1.0), 1.0);
    let result = mirror.scatter(&Vector3f::new(0.0, -1.0, 0.0), &normal, &mut rng);
    assert_eq!(result.event, ScatterEvent::ReflectedSpecular);
    assert_eq!(result.direction, Vector3f::new(0.0, 1.0, 0.0));

    let glass = Material::dielectric(RGBSpectrum::splat(1.0), 1.0);
    let incident = Vector3f::new(0.6, -0.8, 0.0);
    for _ in 0..256 {
        let result = glass.scatter(&incident, &normal, &mut rng);
        assert_eq!(result.event, ScatterEvent::Refraction);
        assert!((result.direction - incident).norm() < 1e-4);
    }
}

const SHOWCASE: &str = r#"
<scene>
    <integrator type="photon_mapping">
        <integer name="photon_count" value="4000"/>
        <integer name="nearest_neighbours" value="8"/>
        <integer name="seed" value="11"/>
    </integrator>
    <sensor type="perspective">
        <float name="fov" value="50"/>
        <transform name="to_world">
            <lookat origin="0, 3, 4" target="0, 0, 0" up="0, 1, 0"/>
        </transform>
        <film>
            <integer name="width" value="24"/>
            <integer name="height" value="16"/>
        </film>
    </sensor>
    <bsdf type="diffuse" id="floor">
        <rgb name="reflectance" value="0.7, 0.6, 0.5"/>
    </bsdf>
    <bsdf type="specular" id="mirror">
        <rgb name="reflectance" value="0.9"/>
    </bsdf>
    <bsdf type="dielectric" id="glass">
        <float name="ior" value="1.5"/>
    </bsdf>
    <shape type="rectangle">
        <point name="center" value="0, 0, 0"/>
        <vector name="edge_u" value="6, 0, 0"/>
        <vector name="edge_v" value="0, 0, -6"/>
        <ref id="floor"/>
    </shape>
    <shape type="rectangle">
        <point name="center" value="-1, 1, -1"/>
        <vector name="edge_u" value="1, 0, 0"/>
        <vector name="edge_v" value="0, 2, 0"/>
        <ref id="mirror"/>
    </shape>
    <shape type="triangle">
        <point name="p0" value="0.5, 0.2, 0.5"/>
        <point name="p1" value="1.5, 0.2, 0.5"/>
        <point name="p2" value="1.0, 1.5, 0.5"/>
        <ref id="glass"/>
    </shape>
    <emitter type="square">
        <point name="position" value="0, 4, 0"/>
        <vector name="normal" value="0, -1, 0"/>
        <float name="side_length" value="1"/>
        <float name="power" value="50"/>
    </emitter>
</scene>
"#;

fn render_showcase() -> Vec<(Float, Float, Float)> {
    let loaded = parse_scene(SHOWCASE, Path::new(".")).expect("scene should parse");
    let mut scene = loaded.scene;
    let config = loaded.config;
    scene.assign_photon_quotas(config.photon_count);

    let (buffer, _) = PhotonTracer::from_config(&config).trace(&scene, scene.lights());
    let map = PhotonMap::build(&buffer, config.nearest_neighbours, config.max_search_radius);
    let integrator = PhotonMappingIntegrator::from_config(map, &config);
    let image = SimpleRenderer::new(Box::new(integrator), 0, config.seed)
        .render(&scene)
        .expect("render should succeed");
    assert_eq!((image.width(), image.height()), (24, 16));
    image.raw_copy()
}

#[test]
fn full_pipeline_is_non_negative_and_reproducible() {
    let first = render_showcase();
    let second = render_showcase();
    assert_eq!(first, second);

    for &(r, g, b) in &first {
        assert!(r.is_finite() && g.is_finite() && b.is_finite());
        assert!(r >= 0.0 && g >= 0.0 && b >= 0.0);
    }
    assert!(first.iter().any(|&(r, _, _)| r > 0.0));
}
