//! Core data types for the anchor store

use crate::identity::Factory;
use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

use super::constants::QUATERNION_LEN;

/// A placed geospatial marker as it is persisted on disk.
///
/// The geospatial fields are only meaningful once [`AnchorRecord::set_position`]
/// has been called; before that the record sits at the origin with no
/// orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRecord {
    id: u32,
    /// Logical resource tag, not unique
    pub resource_id: String,
    /// Display label
    pub name: String,
    /// WGS84 latitude in decimal degrees
    pub latitude: f64,
    /// Altitude in meters above the WGS84 ellipsoid
    pub altitude: f64,
    /// WGS84 longitude in decimal degrees
    pub longitude: f64,
    /// Orientation quaternion `(x, y, z, w)`, empty until positioned
    pub rotation: Vec<f32>,
}

impl AnchorRecord {
    /// Create a fresh record, taking its id from `ids`.
    pub fn new<F>(ids: &mut F, resource_id: impl Into<String>, name: impl Into<String>) -> Self
    where
        F: Factory<u32> + ?Sized,
    {
        Self::with_id(ids.produce(), resource_id, name)
    }

    /// Create a record carrying an id that was issued elsewhere.
    pub fn with_id(id: u32, resource_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            resource_id: resource_id.into(),
            name: name.into(),
            latitude: 0.0,
            altitude: 0.0,
            longitude: 0.0,
            rotation: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Set the geodetic position and orientation of this anchor.
    pub fn set_position(&mut self, latitude: f64, longitude: f64, altitude: f64, rotation: [f32; 4]) {
        self.latitude = latitude;
        self.longitude = longitude;
        self.altitude = altitude;
        self.rotation = rotation.to_vec();
    }

    /// Builder form of [`AnchorRecord::set_position`].
    pub fn positioned(mut self, latitude: f64, longitude: f64, altitude: f64, rotation: [f32; 4]) -> Self {
        self.set_position(latitude, longitude, altitude, rotation);
        self
    }

    /// Whether `set_position` has given this record an orientation.
    pub fn is_placed(&self) -> bool {
        !self.rotation.is_empty()
    }

    pub fn dx(&self) -> Option<f32> {
        self.rotation.first().copied()
    }

    pub fn dy(&self) -> Option<f32> {
        self.full_rotation().map(|q| q[1])
    }

    pub fn dz(&self) -> Option<f32> {
        self.full_rotation().map(|q| q[2])
    }

    pub fn dw(&self) -> Option<f32> {
        self.rotation.last().copied()
    }

    /// Orientation as a unit quaternion, if the rotation holds four components.
    ///
    /// The stored components are normalized; a zero quaternion yields `None`.
    pub fn orientation(&self) -> Option<UnitQuaternion<f32>> {
        let [x, y, z, w] = self.full_rotation()?;
        UnitQuaternion::try_new(Quaternion::new(w, x, y, z), f32::EPSILON)
    }

    fn full_rotation(&self) -> Option<[f32; 4]> {
        if self.rotation.len() != QUATERNION_LEN {
            return None;
        }
        Some([self.rotation[0], self.rotation[1], self.rotation[2], self.rotation[3]])
    }
}
