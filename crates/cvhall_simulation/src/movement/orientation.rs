//! OrientationSmoother: сглаживание угла с shortest-path wraparound
//!
//! Используется и для facing персонажа, и для orbit angle камеры.

use std::f32::consts::{PI, TAU};

/// Wrap угла в (-π, π]
///
/// Эквивалент "добавлять/вычитать 2π пока не попадём в диапазон", но O(1)
/// для произвольно больших значений.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid даёт [-π, π): переносим левую границу на правую
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Кратчайшая signed дуга от `current` до `target` (|result| ≤ π)
pub fn shortest_arc(current: f32, target: f32) -> f32 {
    wrap_angle(target - current)
}

/// Сдвинуть `current` к `target` на долю `max_step` кратчайшей дуги
///
/// `max_step`: безразмерная progress fraction (обычно `rate * dt`),
/// clamp в [0, 1]: большой dt после stall не даёт overshoot.
/// Результат НЕ wrapped: вызывающий нормализует через [`wrap_angle`] при записи в state.
pub fn smooth_angle(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = shortest_arc(current, target);
    if !diff.is_finite() {
        return current;
    }
    let progress = if max_step.is_nan() {
        0.0
    } else {
        max_step.clamp(0.0, 1.0)
    };
    current + diff * progress
}
