//! Gravitational field of a homogeneous sphere in spherical coordinates.
//!
//! Outside the sphere the field equals that of a point mass at its center,
//! so every component shares the tesseroid kernels' node geometry with the
//! Jacobian factor dropped. The same local frame applies: x -> North,
//! y -> East, z -> Down, including the tesseroid sign convention for gz.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::core::constants::G;
use crate::core::integration::kernels::{self, NodeGeom};
use crate::core::types::FieldComponent;

/// A homogeneous sphere positioned in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    /// Density (kg/m³)
    pub density: f64,
    /// Longitude of the center (degrees)
    pub lon: f64,
    /// Latitude of the center (degrees)
    pub lat: f64,
    /// Radial coordinate of the center (m from the origin)
    pub rc: f64,
    /// Sphere radius (m)
    pub radius: f64,
}

impl Sphere {
    /// Total mass (kg).
    pub fn mass(&self) -> f64 {
        self.density * 4.0 * PI * self.radius.powi(3) / 3.0
    }

    /// Any field component at an exterior point, in the component's
    /// conventional unit (SI, mGal or Eötvös).
    pub fn field(&self, component: FieldComponent, lonp: f64, latp: f64, rp: f64) -> f64 {
        let d2r = PI / 180.0;
        let (sinlatp, coslatp) = (d2r * latp).sin_cos();
        let (sinlatc, coslatc) = (d2r * self.lat).sin_cos();
        let (sinlon, coslon) = (d2r * (self.lon - lonp)).sin_cos();
        let cospsi = sinlatp * sinlatc + coslatp * coslatc * coslon;
        let kphi = coslatp * sinlatc - sinlatp * coslatc * coslon;
        // Point-mass geometry: the tesseroid node geometry with kappa = 1
        let geom = NodeGeom {
            l_sqr: rp * rp + self.rc * self.rc - 2.0 * rp * self.rc * cospsi,
            kappa: 1.0,
            dx: self.rc * kphi,
            dy: self.rc * coslatc * sinlon,
            dz: self.rc * cospsi - rp,
        };
        G * self.mass() * component.unit_conversion() * kernels::evaluate(component, &geom)
    }

    /// Gravitational potential (SI).
    pub fn pot(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Pot, lonp, latp, rp)
    }

    /// Northward acceleration (mGal).
    pub fn gx(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gx, lonp, latp, rp)
    }

    /// Eastward acceleration (mGal).
    pub fn gy(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gy, lonp, latp, rp)
    }

    /// Downward acceleration (mGal).
    pub fn gz(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gz, lonp, latp, rp)
    }

    /// North-North gradient (Eötvös).
    pub fn gxx(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gxx, lonp, latp, rp)
    }

    /// North-East gradient (Eötvös).
    pub fn gxy(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gxy, lonp, latp, rp)
    }

    /// North-Down gradient (Eötvös).
    pub fn gxz(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gxz, lonp, latp, rp)
    }

    /// East-East gradient (Eötvös).
    pub fn gyy(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gyy, lonp, latp, rp)
    }

    /// East-Down gradient (Eötvös).
    pub fn gyz(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gyz, lonp, latp, rp)
    }

    /// Down-Down gradient (Eötvös).
    pub fn gzz(&self, lonp: f64, latp: f64, rp: f64) -> f64 {
        self.field(FieldComponent::Gzz, lonp, latp, rp)
    }
}
