//! Density x wait -> green-duration control surface.

use junction_types::{LaneState, SurfaceSample};

use crate::controller::{DENSITY_RANGE, TrafficController, WAIT_RANGE};
use crate::error::ControllerError;

/// Sample the non-emergency green duration over an evenly spaced grid.
///
/// Both axes include their end points (0 and 100 for density, 0 and 120
/// for wait). Samples are ordered wait-major: every density for the first
/// wait, then every density for the next. A zero step count on either axis
/// gives an empty surface.
///
/// # Errors
///
/// Propagates [`ControllerError`] from lane evaluation. Grid points never
/// leave the accepted input ranges.
pub fn control_surface(
    controller: &TrafficController,
    density_steps: usize,
    wait_steps: usize,
) -> Result<Vec<SurfaceSample>, ControllerError> {
    let densities = linspace(*DENSITY_RANGE.start(), *DENSITY_RANGE.end(), density_steps);
    let waits = linspace(*WAIT_RANGE.start(), *WAIT_RANGE.end(), wait_steps);

    let mut samples = Vec::with_capacity(densities.len().saturating_mul(waits.len()));
    for &wait in &waits {
        for &density in &densities {
            let result = controller.evaluate(&LaneState::new(density, wait, false))?;
            samples.push(SurfaceSample {
                density,
                wait,
                green_duration: result.green_duration,
            });
        }
    }
    Ok(samples)
}

/// `count` evenly spaced points from `start` to `end`, both included.
fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            #[allow(clippy::cast_precision_loss)]
            let intervals = count.saturating_sub(1) as f64;
            (0..count)
                .map(|i| {
                    #[allow(clippy::cast_precision_loss)]
                    let fraction = i as f64 / intervals;
                    (end - start).mul_add(fraction, start)
                })
                .collect()
        }
    }
}
