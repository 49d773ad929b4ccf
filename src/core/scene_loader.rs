// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::config::{ConfigError, PhotonMappingConfig};
use crate::core::light::Light;
use crate::core::material::Material;
use crate::core::scene::Scene;
use crate::io::obj_utils::ObjLoadError;
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::spectrum::RGBSpectrum;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::rectangle::Rectangle;
use crate::shapes::triangle::Triangle;
use crate::shapes::triangle_mesh::TriangleMesh;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
    UnknownBsdf(String),
    Unsupported(String),
    Obj(ObjLoadError),
    Config(ConfigError),
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<ObjLoadError> for SceneLoadError {
    fn from(err: ObjLoadError) -> Self {
        SceneLoadError::Obj(err)
    }
}

impl From<ConfigError> for SceneLoadError {
    fn from(err: ConfigError) -> Self {
        SceneLoadError::Config(err)
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(err) => write!(f, "io error: {}", err),
            SceneLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
            SceneLoadError::UnknownBsdf(id) => write!(f, "missing bsdf ref: {}", id),
            SceneLoadError::Unsupported(what) => write!(f, "unsupported {}", what),
            SceneLoadError::Obj(err) => write!(f, "obj load failed: {}", err),
            SceneLoadError::Config(err) => write!(f, "invalid integrator settings: {}", err),
        }
    }
}

impl std::error::Error for SceneLoadError {}

pub struct SceneLoadResult {
    pub scene: Scene,
    pub config: PhotonMappingConfig,
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<Scene, SceneLoadError> {
    let result = load_scene_with_settings(path)?;
    Ok(result.scene)
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    log::info!("Loading scene: {}.", path.display());
    let xml = fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_scene(&xml, base_dir)
}

/// Parse a scene document. Relative mesh paths resolve against `base_dir`.
pub fn parse_scene(xml: &str, base_dir: &Path) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut loader = SceneBuilder::new(base_dir);

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => loader.start(&e)?,
            Ok(Event::Empty(e)) => {
                loader.start(&e)?;
                loader.end(e.name().as_ref())?;
            }
            Ok(Event::End(e)) => loader.end(e.name().as_ref())?,
            Err(e) => {
                return Err(SceneLoadError::Parse(e.to_string()));
            }
            _ => {}
        }

        buf.clear();
    }

    loader.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Root,
    Integrator,
    Sensor,
    Bsdf,
    Shape,
    Emitter,
}

#[derive(Default)]
struct SensorParams {
    fov_deg: Option<Float>,
    origin: Option<Vector3f>,
    target: Option<Vector3f>,
    up: Option<Vector3f>,
    width: Option<usize>,
    height: Option<usize>,
}

#[derive(Default)]
struct BsdfParams {
    kind: String,
    id: Option<String>,
    reflectance: Option<RGBSpectrum>,
    floats: HashMap<String, Float>,
}

struct ShapeParams {
    kind: String,
    filename: Option<String>,
    bsdf_ref: Option<String>,
    points: HashMap<String, Vector3f>,
    translate: Vector3f,
    scale: Vector3f,
}

impl ShapeParams {
    fn new(kind: String) -> Self {
        Self {
            kind,
            filename: None,
            bsdf_ref: None,
            points: HashMap::new(),
            translate: Vector3f::zeros(),
            scale: Vector3f::new(1.0, 1.0, 1.0),
        }
    }
}

#[derive(Default)]
struct EmitterParams {
    kind: String,
    points: HashMap<String, Vector3f>,
    floats: HashMap<String, Float>,
    rgb: Option<RGBSpectrum>,
}

struct SceneBuilder {
    base_dir: PathBuf,
    scene: Scene,
    config: PhotonMappingConfig,
    defaults: HashMap<String, String>,
    materials: HashMap<String, usize>,

    block: Block,
    in_film: bool,
    in_transform: bool,
    sensor: SensorParams,
    bsdf: BsdfParams,
    shape: ShapeParams,
    emitter: EmitterParams,
}

impl SceneBuilder {
    fn new(base_dir: &Path) -> Self {
        let mut scene = Scene::new();
        scene.set_base_dir(base_dir.to_path_buf());
        Self {
            base_dir: base_dir.to_path_buf(),
            scene,
            config: PhotonMappingConfig::default(),
            defaults: HashMap::new(),
            materials: HashMap::new(),
            block: Block::Root,
            in_film: false,
            in_transform: false,
            sensor: SensorParams::default(),
            bsdf: BsdfParams::default(),
            shape: ShapeParams::new(String::new()),
            emitter: EmitterParams::default(),
        }
    }

    fn attribute(&self, e: &BytesStart, key: &[u8]) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|attr| attr.key.as_ref() == key)
            .map(|attr| resolve_value(&attr.unescape_value().unwrap_or_default(), &self.defaults))
    }

    fn name_value(&self, e: &BytesStart) -> Option<(String, String)> {
        match (self.attribute(e, b"name"), self.attribute(e, b"value")) {
            (Some(name), Some(value)) => Some((name, value)),
            _ => None,
        }
    }

    fn start(&mut self, e: &BytesStart) -> Result<(), SceneLoadError> {
        match e.name().as_ref() {
            b"scene" => {}
            b"default" => {
                if let Some((key, value)) = self.name_value(e) {
                    self.defaults.insert(key, value);
                }
            }
            b"integrator" => {
                let kind = self.attribute(e, b"type").unwrap_or_default();
                if kind != "photon_mapping" {
                    return Err(SceneLoadError::Unsupported(format!("integrator: {}", kind)));
                }
                self.block = Block::Integrator;
            }
            b"sensor" => {
                let kind = self.attribute(e, b"type").unwrap_or_default();
                if kind != "perspective" {
                    return Err(SceneLoadError::Unsupported(format!("sensor: {}", kind)));
                }
                self.block = Block::Sensor;
                self.sensor = SensorParams::default();
            }
            b"film" => {
                self.in_film = self.block == Block::Sensor;
            }
            b"transform" => {
                self.in_transform = self.attribute(e, b"name").as_deref() == Some("to_world");
            }
            b"lookat" => {
                if self.block == Block::Sensor && self.in_transform {
                    for (key, slot) in [("origin", &mut self.sensor.origin),
                                        ("target", &mut self.sensor.target),
                                        ("up", &mut self.sensor.up)] {
                        let value = e.attributes()
                            .flatten()
                            .find(|attr| attr.key.as_ref() == key.as_bytes())
                            .map(|attr| attr.unescape_value().unwrap_or_default().to_string());
                        if let Some(value) = value {
                            *slot = Some(parse_vec3(&value)?);
                        }
                    }
                }
            }
            b"translate" => {
                if self.block == Block::Shape && self.in_transform {
                    let offset = Vector3f::new(self.float_attribute(e, b"x", 0.0)?,
                                               self.float_attribute(e, b"y", 0.0)?,
                                               self.float_attribute(e, b"z", 0.0)?);
                    self.shape.translate += offset;
                }
            }
            b"scale" => {
                if self.block == Block::Shape && self.in_transform {
                    let s = match self.attribute(e, b"value") {
                        Some(value) => Vector3f::repeat(parse_float(&value)?),
                        None => Vector3f::new(self.float_attribute(e, b"x", 1.0)?,
                                              self.float_attribute(e, b"y", 1.0)?,
                                              self.float_attribute(e, b"z", 1.0)?),
                    };
                    self.shape.scale = self.shape.scale.component_mul(&s);
                }
            }
            b"integer" => {
                if let Some((name, value)) = self.name_value(e) {
                    self.integer_property(&name, &value)?;
                }
            }
            b"float" => {
                if let Some((name, value)) = self.name_value(e) {
                    self.float_property(&name, parse_float(&value)?);
                }
            }
            b"rgb" => {
                if let Some((name, value)) = self.name_value(e) {
                    let rgb = parse_spectrum(&value)?;
                    match (self.block, name.as_str()) {
                        (Block::Integrator, "background") => self.config.background = rgb,
                        (Block::Bsdf, "reflectance") | (Block::Bsdf, "albedo") => self.bsdf.reflectance = Some(rgb),
                        (Block::Emitter, "rgb") | (Block::Emitter, "color") => self.emitter.rgb = Some(rgb),
                        _ => log::warn!("Ignoring rgb property '{}'.", name),
                    }
                }
            }
            b"string" => {
                if let Some((name, value)) = self.name_value(e) {
                    if self.block == Block::Shape && name == "filename" {
                        self.shape.filename = Some(value);
                    }
                }
            }
            b"point" | b"vector" => {
                if let Some((name, value)) = self.name_value(e) {
                    let v = parse_vec3(&value)?;
                    match self.block {
                        Block::Shape => { self.shape.points.insert(name, v); }
                        Block::Emitter => { self.emitter.points.insert(name, v); }
                        _ => log::warn!("Ignoring vector property '{}'.", name),
                    }
                }
            }
            b"bsdf" => {
                self.block = Block::Bsdf;
                self.bsdf = BsdfParams {
                    kind: self.attribute(e, b"type").unwrap_or_default(),
                    id: self.attribute(e, b"id"),
                    ..Default::default()
                };
            }
            b"shape" => {
                self.block = Block::Shape;
                self.shape = ShapeParams::new(self.attribute(e, b"type").unwrap_or_default());
            }
            b"ref" => {
                if self.block == Block::Shape {
                    self.shape.bsdf_ref = self.attribute(e, b"id");
                }
            }
            b"emitter" => {
                self.block = Block::Emitter;
                self.emitter = EmitterParams {
                    kind: self.attribute(e, b"type").unwrap_or_default(),
                    ..Default::default()
                };
            }
            other => {
                log::warn!("Ignoring unknown scene element <{}>.", String::from_utf8_lossy(other));
            }
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) -> Result<(), SceneLoadError> {
        match name {
            b"integrator" => self.block = Block::Root,
            b"film" => self.in_film = false,
            b"transform" => self.in_transform = false,
            b"sensor" => {
                if self.block == Block::Sensor {
                    self.finish_sensor()?;
                }
                self.block = Block::Root;
            }
            b"bsdf" => {
                if self.block == Block::Bsdf {
                    self.finish_bsdf()?;
                }
                self.block = Block::Root;
            }
            b"shape" => {
                if self.block == Block::Shape {
                    self.finish_shape()?;
                }
                self.block = Block::Root;
            }
            b"emitter" => {
                if self.block == Block::Emitter {
                    self.finish_emitter()?;
                }
                self.block = Block::Root;
            }
            _ => {}
        }
        Ok(())
    }

    fn float_attribute(&self, e: &BytesStart, key: &[u8], fallback: Float) -> Result<Float, SceneLoadError> {
        match self.attribute(e, key) {
            Some(value) => parse_float(&value),
            None => Ok(fallback),
        }
    }

    fn integer_property(&mut self, name: &str, value: &str) -> Result<(), SceneLoadError> {
        match self.block {
            Block::Sensor if self.in_film => match name {
                "width" => self.sensor.width = Some(parse_integer(value)?),
                "height" => self.sensor.height = Some(parse_integer(value)?),
                _ => log::warn!("Ignoring film property '{}'.", name),
            },
            Block::Integrator => match name {
                "photon_count" => {
                    let count = parse_integer(value)?;
                    self.config = std::mem::take(&mut self.config).with_photon_count(count);
                }
                "photon_capacity" => {
                    let capacity = parse_integer(value)?;
                    self.config = std::mem::take(&mut self.config).with_photon_capacity(capacity);
                }
                "max_photon_bounces" => self.config.max_photon_bounces = parse_integer(value)?,
                "max_depth" => self.config.max_depth = parse_integer(value)?,
                "nearest_neighbours" => self.config.nearest_neighbours = parse_integer(value)?,
                "samples_per_pixel" | "sample_count" => self.config.samples_per_pixel = parse_integer(value)?,
                "seed" => self.config.seed = parse_integer(value)?,
                _ => log::warn!("Ignoring integrator property '{}'.", name),
            },
            _ => log::warn!("Ignoring integer property '{}'.", name),
        }
        Ok(())
    }

    fn float_property(&mut self, name: &str, value: Float) {
        match (self.block, name) {
            (Block::Integrator, "max_search_radius") => self.config.max_search_radius = value,
            (Block::Integrator, "cone_filter") => self.config.cone_filter = value,
            (Block::Sensor, "fov") => self.sensor.fov_deg = Some(value),
            (Block::Bsdf, _) => { self.bsdf.floats.insert(name.to_string(), value); }
            (Block::Emitter, _) => { self.emitter.floats.insert(name.to_string(), value); }
            _ => log::warn!("Ignoring float property '{}'.", name),
        }
    }

    fn finish_sensor(&mut self) -> Result<(), SceneLoadError> {
        let params = std::mem::take(&mut self.sensor);
        let fov_deg = params.fov_deg.ok_or(SceneLoadError::MissingField("sensor.fov"))?;
        let origin = params.origin.ok_or(SceneLoadError::MissingField("sensor.origin"))?;
        let target = params.target.ok_or(SceneLoadError::MissingField("sensor.target"))?;
        let up = params.up.ok_or(SceneLoadError::MissingField("sensor.up"))?;
        let width = params.width.ok_or(SceneLoadError::MissingField("film.width"))?;
        let height = params.height.ok_or(SceneLoadError::MissingField("film.height"))?;

        let camera = PerspectiveCamera::new(origin, target, up, fov_deg * PI / 180.0, width, height);
        self.scene.add_sensor(Box::new(camera));
        Ok(())
    }

    fn finish_bsdf(&mut self) -> Result<(), SceneLoadError> {
        let params = std::mem::take(&mut self.bsdf);
        let float = |name: &str, fallback: Float| params.floats.get(name).copied().unwrap_or(fallback);

        let material = match params.kind.as_str() {
            "diffuse" => Material::lambertian(params.reflectance.unwrap_or(RGBSpectrum::splat(0.5))),
            "specular" | "conductor" => Material::specular(params.reflectance.unwrap_or(RGBSpectrum::splat(1.0)),
                                                           float("reflectivity", 1.0)),
            "dielectric" => Material::dielectric(params.reflectance.unwrap_or(RGBSpectrum::splat(1.0)),
                                                 float("ior", 1.5)),
            "coefficients" => Material::from_coefficients(params.reflectance.unwrap_or(RGBSpectrum::splat(1.0)),
                                                          float("diffuse", 0.0),
                                                          float("specular", 0.0),
                                                          float("transmission", 0.0),
                                                          float("ior", 1.0)),
            other => return Err(SceneLoadError::Unsupported(format!("bsdf: {}", other))),
        };

        let id = params.id.ok_or(SceneLoadError::MissingField("bsdf.id"))?;
        let index = self.scene.add_material(material);
        log::debug!("Material '{}' -> #{} ({:?}).", id, index, material.kind);
        self.materials.insert(id, index);
        Ok(())
    }

    fn finish_shape(&mut self) -> Result<(), SceneLoadError> {
        let params = std::mem::replace(&mut self.shape, ShapeParams::new(String::new()));
        let point = |name: &'static str| params.points.get(name).copied().ok_or(SceneLoadError::MissingField(name));

        let needs_transform = params.scale != Vector3f::new(1.0, 1.0, 1.0) || params.translate != Vector3f::zeros();
        let mut triangles: Vec<Triangle> = match params.kind.as_str() {
            "obj" => {
                let filename = params.filename.as_deref().ok_or(SceneLoadError::MissingField("shape.filename"))?;
                let mut mesh = TriangleMesh::from_obj(self.resolve_path(filename))?;
                if needs_transform {
                    mesh.apply_transform(&params.scale, &params.translate);
                }
                let bounds = mesh.bounding_box();
                log::info!("Mesh '{}': {} triangles, area {:.3}, bounds {:?} to {:?}.",
                           filename, mesh.len(), mesh.surface_area(), bounds.lo, bounds.hi);
                return self.attach_shape(mesh.into_triangles(), &params);
            }
            "rectangle" => Rectangle::new(point("center")?, point("edge_u")?, point("edge_v")?)
                .triangles()
                .to_vec(),
            "triangle" => vec![Triangle::new(point("p0")?, point("p1")?, point("p2")?)],
            other => {
                log::warn!("Skipping unsupported shape type '{}'.", other);
                return Ok(());
            }
        };

        if needs_transform {
            for triangle in triangles.iter_mut() {
                triangle.apply_transform(&params.scale, &params.translate);
            }
        }
        self.attach_shape(triangles, &params)
    }

    fn attach_shape(&mut self, triangles: Vec<Triangle>, params: &ShapeParams) -> Result<(), SceneLoadError> {
        let bsdf_id = params.bsdf_ref.as_deref().ok_or(SceneLoadError::MissingField("shape.ref"))?;
        let material = *self.materials
            .get(bsdf_id)
            .ok_or_else(|| SceneLoadError::UnknownBsdf(bsdf_id.to_string()))?;
        self.scene.add_triangles(triangles, material);
        Ok(())
    }

    fn finish_emitter(&mut self) -> Result<(), SceneLoadError> {
        let params = std::mem::take(&mut self.emitter);
        let position = params.points.get("position").copied().ok_or(SceneLoadError::MissingField("emitter.position"))?;
        let power = params.floats.get("power").copied().ok_or(SceneLoadError::MissingField("emitter.power"))?;
        let rgb = params.rgb.unwrap_or(RGBSpectrum::splat(1.0));

        let light = match params.kind.as_str() {
            "point" => Light::point(position, power, rgb),
            "square" => {
                let normal = params.points.get("normal").copied().unwrap_or(Vector3f::new(0.0, -1.0, 0.0));
                let side = params.floats.get("side_length").copied().ok_or(SceneLoadError::MissingField("emitter.side_length"))?;
                Light::square(position, normal, side, power, rgb)
            }
            other => return Err(SceneLoadError::Unsupported(format!("emitter: {}", other))),
        };
        self.scene.add_light(light);
        Ok(())
    }

    fn resolve_path(&self, filename: &str) -> PathBuf {
        if Path::new(filename).is_absolute() {
            PathBuf::from(filename)
        } else {
            self.base_dir.join(filename)
        }
    }

    fn finish(mut self) -> Result<SceneLoadResult, SceneLoadError> {
        self.config.validate()?;
        if self.scene.lights().is_empty() {
            log::warn!("Scene has no lights; the photon map will be empty.");
        }
        self.scene.build_bvh();
        log::info!("Scene loaded: {} triangles, {} materials, {} lights, {} cameras.",
                   self.scene.len(),
                   self.scene.materials().len(),
                   self.scene.lights().len(),
                   self.scene.sensor_count());

        Ok(SceneLoadResult {
            scene: self.scene,
            config: self.config,
        })
    }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_integer<T: std::str::FromStr>(value: &str) -> Result<T, SceneLoadError> {
    value.trim().parse::<T>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    let parts: Vec<&str> = value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if parts.len() != 3 {
        return Err(SceneLoadError::Parse(format!("invalid vec3: {}", value)));
    }
    Ok(Vector3f::new(parse_float(parts[0])?, parse_float(parts[1])?, parse_float(parts[2])?))
}

/// Either a single grey value or an `r, g, b` triple.
fn parse_spectrum(value: &str) -> Result<RGBSpectrum, SceneLoadError> {
    if value.contains(',') {
        Ok(RGBSpectrum::from_vector(parse_vec3(value)?))
    } else {
        Ok(RGBSpectrum::splat(parse_float(value)?))
    }
}
