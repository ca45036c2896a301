//! Estimador de costes de ruta
//!
//! Modelo lineal: tarifa por kilómetro ajustada por tipo de vehículo, tarifa
//! por hora y una estimación de peajes proporcional a la distancia. Los
//! importes se calculan en `Decimal` y se redondean a céntimos.

use num_traits::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// 1.5 por kilómetro
pub const DISTANCE_RATE_PER_KM: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
/// 30 por hora
pub const TIME_RATE_PER_HOUR: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
/// Metros por unidad de peaje estimada
const TOLL_METERS_PER_UNIT: Decimal = Decimal::from_parts(50_000, 0, 0, false, 0);

const METERS_PER_KM: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3_600, 0, 0, false, 0);

/// Tipo de vehículo a efectos de consumo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType {
    Van,
    Refrigerated,
    Flatbed,
    Tanker,
    Standard,
}

impl VehicleType {
    /// Cualquier valor desconocido o ausente cuenta como estándar
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("van") => VehicleType::Van,
            Some("refrigerated") => VehicleType::Refrigerated,
            Some("flatbed") => VehicleType::Flatbed,
            Some("tanker") => VehicleType::Tanker,
            _ => VehicleType::Standard,
        }
    }

    /// Multiplicador aplicado solo al coste por distancia
    pub fn fuel_multiplier(&self) -> Decimal {
        match self {
            VehicleType::Van => Decimal::new(9, 1),
            VehicleType::Refrigerated => Decimal::new(13, 1),
            VehicleType::Flatbed => Decimal::new(12, 1),
            VehicleType::Tanker => Decimal::new(14, 1),
            VehicleType::Standard => Decimal::ONE,
        }
    }
}

/// Desglose del coste estimado
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub distance_cost: Decimal,
    pub time_cost: Decimal,
    pub toll_estimate: Decimal,
    pub fuel_multiplier: Decimal,
    pub total_cost: Decimal,
}

/// Magnitud máxima admitida para distancia (m) y duración (s). Por encima se
/// satura, así el coste sigue siendo no decreciente y las operaciones en
/// `Decimal` no desbordan.
pub const MAX_COST_INPUT: f64 = 1.0e15;

fn to_decimal(value: f64) -> Decimal {
    if value.is_nan() {
        return Decimal::ZERO;
    }
    let clamped = value.clamp(-MAX_COST_INPUT, MAX_COST_INPUT);
    Decimal::from_f64(clamped).unwrap_or(Decimal::ZERO)
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Calcula el desglose completo. No hay condiciones de error: valores
/// negativos o cero producen importes igualmente pequeños.
pub fn estimate_cost_breakdown(
    distance_meters: f64,
    duration_seconds: f64,
    vehicle_type: Option<&str>,
    avoid_tolls: Option<bool>,
) -> CostBreakdown {
    let distance = to_decimal(distance_meters);
    let duration = to_decimal(duration_seconds);
    let multiplier = VehicleType::parse(vehicle_type).fuel_multiplier();

    // multiplicar antes de dividir: 3 / 3600 no es exacto en Decimal
    let distance_cost = distance * DISTANCE_RATE_PER_KM * multiplier / METERS_PER_KM;
    let time_cost = duration * TIME_RATE_PER_HOUR / SECONDS_PER_HOUR;
    let toll_estimate = if avoid_tolls.unwrap_or(false) {
        Decimal::ZERO
    } else {
        distance / TOLL_METERS_PER_UNIT
    };

    CostBreakdown {
        distance_cost: round_cents(distance_cost),
        time_cost: round_cents(time_cost),
        toll_estimate: round_cents(toll_estimate),
        fuel_multiplier: multiplier,
        total_cost: round_cents(distance_cost + time_cost + toll_estimate),
    }
}

/// Coste total estimado en dólares, redondeado a dos decimales
pub fn estimate_cost(
    distance_meters: f64,
    duration_seconds: f64,
    vehicle_type: Option<&str>,
    avoid_tolls: Option<bool>,
) -> Decimal {
    estimate_cost_breakdown(distance_meters, duration_seconds, vehicle_type, avoid_tolls).total_cost
}
