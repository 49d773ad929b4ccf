// Copyright @yucwang 2026

use crate::core::photon::{Photon, PhotonBuffer};
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const FIELDS_PER_LINE: usize = 9;

#[derive(Debug)]
pub enum PhotonIoError {
    Io(std::io::Error),
    Malformed { line: usize, reason: String },
}

impl From<std::io::Error> for PhotonIoError {
    fn from(err: std::io::Error) -> Self {
        PhotonIoError::Io(err)
    }
}

impl fmt::Display for PhotonIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotonIoError::Io(err) => write!(f, "io error: {}", err),
            PhotonIoError::Malformed { line, reason } => write!(f, "line {}: {}", line, reason),
        }
    }
}

impl std::error::Error for PhotonIoError {}

/// One photon per line: `px py pz dx dy dz r g b`.
pub fn write_photons<W: Write>(photons: &PhotonBuffer, out: W) -> Result<usize, PhotonIoError> {
    let mut writer = BufWriter::new(out);
    let mut count = 0;
    for photon in photons.iter() {
        let (p, d, c) = (photon.position, photon.direction, photon.power);
        writeln!(writer, "{} {} {} {} {} {} {} {} {}",
                 p.x, p.y, p.z, d.x, d.y, d.z, c.r(), c.g(), c.b())?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

pub fn write_photons_to_file<P: AsRef<Path>>(photons: &PhotonBuffer, path: P) -> Result<usize, PhotonIoError> {
    let path = path.as_ref();
    let count = write_photons(photons, File::create(path)?)?;
    log::info!("Wrote {} photons to {}.", count, path.display());
    Ok(count)
}

/// Blank lines and lines starting with `#` are skipped.
pub fn read_photons<R: BufRead>(input: R) -> Result<PhotonBuffer, PhotonIoError> {
    let mut photons = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        photons.push(parse_photon(trimmed, index + 1)?);
    }
    Ok(PhotonBuffer::from_photons(photons))
}

pub fn read_photons_from_file<P: AsRef<Path>>(path: P) -> Result<PhotonBuffer, PhotonIoError> {
    let path = path.as_ref();
    let buffer = read_photons(BufReader::new(File::open(path)?))?;
    log::info!("Read {} photons from {}.", buffer.len(), path.display());
    Ok(buffer)
}

fn parse_photon(line: &str, line_number: usize) -> Result<Photon, PhotonIoError> {
    let values = line
        .split_whitespace()
        .map(|token| token.parse::<Float>())
        .collect::<Result<Vec<Float>, _>>()
        .map_err(|err| PhotonIoError::Malformed { line: line_number, reason: err.to_string() })?;

    if values.len() != FIELDS_PER_LINE {
        return Err(PhotonIoError::Malformed {
            line: line_number,
            reason: format!("expected {} values, found {}", FIELDS_PER_LINE, values.len()),
        });
    }

    Ok(Photon::new(Vector3f::new(values[0], values[1], values[2]),
                   Vector3f::new(values[3], values[4], values[5]),
                   RGBSpectrum::new(values[6], values[7], values[8])))
}
