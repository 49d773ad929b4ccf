// Copyright @yucwang 2026

use std::fmt;
use std::fs;
use std::path::Path;

use wavefront_obj::{obj, ParseError};

#[derive(Debug)]
pub enum ObjLoadError {
    Io(std::io::Error),
    Parse(ParseError),
}

impl From<std::io::Error> for ObjLoadError {
    fn from(err: std::io::Error) -> Self {
        ObjLoadError::Io(err)
    }
}

impl From<ParseError> for ObjLoadError {
    fn from(err: ParseError) -> Self {
        ObjLoadError::Parse(err)
    }
}

impl fmt::Display for ObjLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjLoadError::Io(err) => write!(f, "io error: {}", err),
            ObjLoadError::Parse(err) => write!(f, "obj parse error: {}", err),
        }
    }
}

impl std::error::Error for ObjLoadError {}

/// Parse OBJ text, fan-triangulating polygons with more than three corners.
pub fn load_obj_from_str<S: AsRef<str>>(input: S) -> Result<obj::ObjSet, ObjLoadError> {
    let triangulated = fan_triangulate(input.as_ref());
    Ok(obj::parse(triangulated)?)
}

pub fn load_obj_from_file<P: AsRef<Path>>(path: P) -> Result<obj::ObjSet, ObjLoadError> {
    let path = path.as_ref();
    log::info!("Loading OBJ mesh: {}.", path.display());
    let data = fs::read_to_string(path)?;
    load_obj_from_str(data)
}

fn fan_triangulate(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 4);
    for line in input.lines() {
        let mut parts = line.split_whitespace();
        if parts.next() == Some("f") {
            let corners: Vec<&str> = parts.collect();
            if corners.len() > 3 {
                for i in 1..(corners.len() - 1) {
                    out.push_str(&format!("f {} {} {}\n", corners[0], corners[i], corners[i + 1]));
                }
                continue;
            }
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
