// Copyright @yucwang 2026

use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

/// Energy sample left behind on a diffuse surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Photon {
    pub position: Vector3f,
    /// Direction of travel when the photon arrived.
    pub direction: Vector3f,
    pub power: RGBSpectrum,
}

impl Photon {
    pub fn new(position: Vector3f, direction: Vector3f, power: RGBSpectrum) -> Self {
        Self { position, direction, power }
    }
}

/// Fixed-capacity photon storage. Slots past the stored count stay `None`;
/// photons offered once the buffer is full are counted and discarded.
#[derive(Debug, Clone)]
pub struct PhotonBuffer {
    slots: Vec<Option<Photon>>,
    len: usize,
    dropped: usize,
}

impl PhotonBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: vec![None; capacity], len: 0, dropped: 0 }
    }

    pub fn from_photons(photons: Vec<Photon>) -> Self {
        let len = photons.len();
        Self { slots: photons.into_iter().map(Some).collect(), len, dropped: 0 }
    }

    /// Returns `false` when the photon was dropped for lack of room.
    pub fn push(&mut self, photon: Photon) -> bool {
        if self.len >= self.slots.len() {
            self.dropped += 1;
            return false;
        }
        self.slots[self.len] = Some(photon);
        self.len += 1;
        true
    }

    pub fn extend<I: IntoIterator<Item = Photon>>(&mut self, photons: I) {
        for photon in photons {
            self.push(photon);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Room left before photons start being dropped.
    pub fn room(&self) -> usize {
        self.slots.len() - self.len
    }

    /// Count photons that were discarded before reaching the buffer.
    pub fn add_dropped(&mut self, count: usize) {
        self.dropped += count;
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn slots(&self) -> &[Option<Photon>] {
        &self.slots
    }

    /// Filled slots only, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Photon> + '_ {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }
}
