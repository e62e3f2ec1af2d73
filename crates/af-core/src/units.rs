// af-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, Length as UomLength, ThermodynamicTemperature as UomThermodynamicTemperature,
    Velocity as UomVelocity, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type Length = UomLength;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

/// Catalog flow rates are quoted in m³/h.
#[inline]
pub fn m3ph(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_hour;
    VolumeRate::new::<cubic_meter_per_hour>(v)
}

/// Catalog geometry is quoted in millimetres.
#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

/// Volume flow in m³/s.
#[inline]
pub fn to_m3ps(q: VolumeRate) -> f64 {
    use uom::si::volume_rate::cubic_meter_per_second;
    q.get::<cubic_meter_per_second>()
}

#[inline]
pub fn to_m(l: Length) -> f64 {
    use uom::si::length::meter;
    l.get::<meter>()
}

#[inline]
pub fn to_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

/// Mean velocity of a volume flow through an area, zero for a vanishing area.
#[inline]
pub fn mean_velocity(q: VolumeRate, area: Area) -> Velocity {
    use uom::si::velocity::meter_per_second;
    use uom::si::area::square_meter;
    let a = area.get::<square_meter>();
    Velocity::new::<meter_per_second>(crate::numeric::safe_div(to_m3ps(q), a))
}

pub mod constants {
    /// Standard gravity (m/s²)
    pub const G0_MPS2: f64 = 9.806_65;

    /// Offset between °C and K
    pub const ZERO_CELSIUS_K: f64 = 273.15;
}
